// components/media_fetch/src/tools.rs
use crate::error::FetchError;
use std::path::{Path, PathBuf};

pub const YT_DLP: &str = "yt-dlp";
pub const FFMPEG: &str = "ffmpeg";

/// Resolve an external binary.
///
/// A configured value containing a path separator must point at an existing
/// file; a bare name (or no value) is looked up on `PATH`.
pub fn locate(name: &str, configured: Option<&Path>) -> Result<PathBuf, FetchError> {
    let candidate = configured.unwrap_or_else(|| Path::new(name));

    if candidate.components().count() > 1 {
        return if candidate.is_file() {
            Ok(candidate.to_path_buf())
        } else {
            Err(FetchError::DependencyNotFound(format!(
                "{name} (no such file: {})",
                candidate.display()
            )))
        };
    }

    which::which(candidate).map_err(|_| {
        FetchError::DependencyNotFound(format!("{name} ({} is not on PATH)", candidate.display()))
    })
}
