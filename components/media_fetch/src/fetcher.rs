// components/media_fetch/src/fetcher.rs
use crate::config::Settings;
use crate::error::FetchError;
use crate::options::DownloadOptions;
use crate::profile::{Mode, Quality};
use crate::progress::ProgressHook;
use crate::tools::{self, FFMPEG};
use crate::ytdlp::{DownloadJob, Downloader, YtDlp};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Prefix of the per-download directories in the system temp dir
pub const TEMP_DIR_PREFIX: &str = "grab-";

/// One URL to download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: Url,
    pub mode: Mode,
    pub quality: Quality,
    pub output_name: Option<String>,
}

impl FetchRequest {
    pub fn new(url: Url, mode: Mode) -> Self {
        Self {
            url,
            mode,
            quality: Quality::default(),
            output_name: None,
        }
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_output_name(mut self, name: Option<String>) -> Self {
        self.output_name = name;
        self
    }
}

/// Result of a single download; failures are captured, never raised
#[derive(Debug)]
pub struct DownloadOutcome {
    pub url: String,
    pub output: Result<PathBuf, FetchError>,
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        self.output.is_ok()
    }

    /// 0 for a successful download, 1 for a failed one
    pub fn result_code(&self) -> u8 {
        u8::from(!self.is_success())
    }

    pub fn path(&self) -> Option<&Path> {
        self.output.as_deref().ok()
    }
}

pub struct MediaFetcher {
    settings: Settings,
    ffmpeg: Option<PathBuf>,
    downloader: Arc<dyn Downloader + Send + Sync>,
}

impl fmt::Debug for MediaFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaFetcher")
            .field("settings", &self.settings)
            .field("ffmpeg", &self.ffmpeg)
            .finish_non_exhaustive()
    }
}

impl MediaFetcher {
    /// Create a fetcher backed by the yt-dlp binary from `settings`
    pub async fn new(settings: Settings) -> Result<Self, FetchError> {
        let downloader = YtDlp::locate(settings.yt_dlp.as_deref())?;
        Self::new_with_downloader(settings, Arc::new(downloader)).await
    }

    /// Create a fetcher with a specific downloader implementation
    pub async fn new_with_downloader(
        settings: Settings,
        downloader: Arc<dyn Downloader + Send + Sync>,
    ) -> Result<Self, FetchError> {
        downloader.check_available().await?;

        // Without an explicit ffmpeg, yt-dlp searches PATH itself
        let ffmpeg = match settings.ffmpeg.as_deref() {
            Some(configured) => Some(tools::locate(FFMPEG, Some(configured))?),
            None => None,
        };

        Ok(Self {
            settings,
            ffmpeg,
            downloader,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// A request for `url` using the configured default quality
    pub fn request(&self, url: Url, mode: Mode) -> FetchRequest {
        FetchRequest::new(url, mode).with_quality(self.settings.quality)
    }

    /// Build the downloader job for a request
    pub fn job_for(&self, request: &FetchRequest, temp_dir: &Path) -> DownloadJob {
        let output_dir = self.settings.output_dir(request.mode);
        let name = request.output_name.as_deref();

        let options = match request.mode {
            Mode::Video => DownloadOptions::video(request.quality, output_dir, name)
                .with_container(&self.settings.container),
            Mode::Audio => DownloadOptions::audio(self.settings.audio.clone(), output_dir, name),
        };

        DownloadJob {
            url: request.url.clone(),
            options: options
                .with_ffmpeg_location(self.ffmpeg.clone())
                .with_temp_dir(temp_dir)
                .with_extras(self.settings.extras.clone()),
        }
    }

    /// Download a single URL, capturing any failure in the outcome
    pub async fn fetch(&self, request: &FetchRequest, progress: &ProgressHook) -> DownloadOutcome {
        tracing::debug!(url = %request.url, mode = %request.mode, quality = %request.quality, "starting download");

        let output = self.try_fetch(request, progress).await;
        match &output {
            Ok(path) => tracing::info!(url = %request.url, path = %path.display(), "download finished"),
            Err(error) => tracing::warn!(url = %request.url, %error, "download failed"),
        }

        DownloadOutcome {
            url: request.url.to_string(),
            output,
        }
    }

    async fn try_fetch(
        &self,
        request: &FetchRequest,
        progress: &ProgressHook,
    ) -> Result<PathBuf, FetchError> {
        // Removed when dropped, taking leftover fragments with it
        let temp_dir = tempfile::Builder::new()
            .prefix(TEMP_DIR_PREFIX)
            .tempdir()?;

        let job = self.job_for(request, temp_dir.path());
        self.downloader.download(&job, progress).await
    }
}
