// components/media_fetch/src/lib.rs
//! Download media with yt-dlp and extract audio with ffmpeg.
//!
//! Inputs are checked with [`validate_request`], turned into
//! [`FetchRequest`]s and handed to a [`MediaFetcher`], either one at a time
//! or through a [`BatchRunner`] that keeps a bounded number of downloads in
//! flight. [`Converter`] works on files that are already on disk.
mod batch;
mod config;
mod convert;
mod error;
mod fetcher;
mod options;
mod profile;
mod progress;
mod tools;
mod validate;
mod ytdlp;

pub use batch::{BatchReport, BatchRunner, BatchSummary, FailedDownload};
pub use config::{default_jobs, Settings};
pub use convert::Converter;
pub use error::{FetchError, ValidationError};
pub use fetcher::{DownloadOutcome, FetchRequest, MediaFetcher, TEMP_DIR_PREFIX};
pub use options::{
    output_template, DownloadOptions, ExtraOptions, DEFAULT_CONTAINER, DEFAULT_FRAGMENTS,
    VIDEO_CONTAINERS,
};
pub use profile::{AudioProfile, Mode, Quality, UnknownQuality, AUDIO_FORMAT};
pub use progress::{parse_progress_line, silent, ProgressEvent, ProgressHook, ProgressStatus};
pub use tools::locate;
pub use validate::{invalid_urls, resolve_mode, validate_request, validate_url, ValidatedInput};
pub use ytdlp::{DownloadJob, Downloader, YtDlp};
