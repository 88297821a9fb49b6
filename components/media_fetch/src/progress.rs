// components/media_fetch/src/progress.rs
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

/// Marker placed in front of every progress line yt-dlp prints for us
pub(crate) const PROGRESS_MARKER: &str = "grab-progress:";

/// CSI sequences, OSC sequences ended by BEL or ST, and two-byte escapes
static ANSI_ESCAPE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)|\x1b[@-_]").ok()
});

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressStatus {
    Downloading { percent: f64 },
    Finished { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub url: String,
    pub status: ProgressStatus,
}

/// Callback invoked for every progress update of a download
pub type ProgressHook = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;

/// A hook that drops every event
pub fn silent() -> ProgressHook {
    Arc::new(|_: &ProgressEvent| {})
}

/// Extract the percentage from a progress line, if it is one
pub fn parse_progress_line(line: &str) -> Option<f64> {
    let line = strip_ansi(line);
    let rest = line.trim().strip_prefix(PROGRESS_MARKER)?;
    let percent = rest.trim().trim_end_matches('%').trim();
    percent.parse::<f64>().ok().filter(|p| p.is_finite())
}

/// Remove terminal escape sequences yt-dlp may embed in its templates
fn strip_ansi(line: &str) -> Cow<'_, str> {
    match ANSI_ESCAPE.as_ref() {
        Some(pattern) => pattern.replace_all(line, ""),
        None => Cow::Borrowed(line),
    }
}
