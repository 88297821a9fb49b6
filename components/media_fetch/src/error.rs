// components/media_fetch/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Required dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Download of {url} failed: {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("Download of {0} finished but no output file was reported")]
    MissingOutput(String),

    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Conversion of {} failed: {reason}", .input.display())]
    ConversionFailed { input: PathBuf, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Rejected command-line input, detected before any download starts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No URLs were given.")]
    NoUrls,

    #[error("The following URLs are not valid: {}", .0.join(", "))]
    InvalidUrls(Vec<String>),

    #[error("You must specify either video or audio download.")]
    NoMode,

    #[error("An output name can only be used with a single URL (got {0}).")]
    OutputNameWithManyUrls(usize),
}

impl ValidationError {
    /// Process exit code reported for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidationError::NoMode => 3,
            ValidationError::NoUrls
            | ValidationError::InvalidUrls(_)
            | ValidationError::OutputNameWithManyUrls(_) => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_urls_are_listed_in_message() {
        let error = ValidationError::InvalidUrls(vec!["foo".into(), "bar://".into()]);
        assert_eq!(
            error.to_string(),
            "The following URLs are not valid: foo, bar://"
        );
    }

    #[test]
    fn exit_codes() {
        assert_eq!(ValidationError::InvalidUrls(vec![]).exit_code(), 2);
        assert_eq!(ValidationError::NoMode.exit_code(), 3);
        assert_eq!(ValidationError::OutputNameWithManyUrls(2).exit_code(), 2);
    }
}
