// components/media_fetch/src/validate.rs
use crate::error::ValidationError;
use crate::profile::Mode;
use url::{Host, Url};

const ALLOWED_SCHEMES: [&str; 4] = ["http", "https", "ftp", "ftps"];

/// Input that passed validation and is ready to be downloaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInput {
    pub urls: Vec<Url>,
    pub mode: Mode,
    pub output_name: Option<String>,
}

/// Parse a URL and check that it points at a remote host
pub fn validate_url(raw: &str) -> Result<Url, ValidationError> {
    let invalid = || ValidationError::InvalidUrls(vec![raw.to_string()]);

    let url = Url::parse(raw.trim()).map_err(|_| invalid())?;

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(invalid());
    }

    match url.host() {
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => Ok(url),
        Some(Host::Domain(domain)) if is_qualified_domain(domain) => Ok(url),
        _ => Err(invalid()),
    }
}

fn is_qualified_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.trim_end_matches('.').split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// Every input that is not a valid URL, in input order
pub fn invalid_urls<S: AsRef<str>>(urls: &[S]) -> Vec<String> {
    urls.iter()
        .map(|url| url.as_ref())
        .filter(|url| validate_url(url).is_err())
        .map(str::to_string)
        .collect()
}

/// Pick the download mode from the mode flags; audio wins when both are set
pub fn resolve_mode(audio: bool, video: bool) -> Result<Mode, ValidationError> {
    match (audio, video) {
        (true, _) => Ok(Mode::Audio),
        (false, true) => Ok(Mode::Video),
        (false, false) => Err(ValidationError::NoMode),
    }
}

/// Validate a full download request before any work is done
pub fn validate_request<S: AsRef<str>>(
    urls: &[S],
    audio: bool,
    video: bool,
    output_name: Option<&str>,
) -> Result<ValidatedInput, ValidationError> {
    if urls.is_empty() {
        return Err(ValidationError::NoUrls);
    }

    let invalid = invalid_urls(urls);
    if !invalid.is_empty() {
        return Err(ValidationError::InvalidUrls(invalid));
    }

    let mode = resolve_mode(audio, video)?;

    if output_name.is_some() && urls.len() > 1 {
        return Err(ValidationError::OutputNameWithManyUrls(urls.len()));
    }

    let urls = urls
        .iter()
        .map(|url| validate_url(url.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ValidatedInput {
        urls,
        mode,
        output_name: output_name.map(str::to_string),
    })
}
