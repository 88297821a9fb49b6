// components/media_fetch/src/ytdlp.rs
use crate::error::FetchError;
use crate::options::DownloadOptions;
use crate::progress::{parse_progress_line, ProgressEvent, ProgressHook, ProgressStatus};
use crate::tools::{self, YT_DLP};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use url::Url;

/// A single URL together with the options it is downloaded with
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub url: Url,
    pub options: DownloadOptions,
}

#[async_trait]
pub trait Downloader {
    /// Check that the downloader can be run at all
    async fn check_available(&self) -> Result<(), FetchError>;

    /// Download one job, returning the path of the finished file
    async fn download(&self, job: &DownloadJob, progress: &ProgressHook)
        -> Result<PathBuf, FetchError>;
}

pub struct YtDlp {
    binary: PathBuf,
}

impl YtDlp {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Find yt-dlp at the configured location or on `PATH`
    pub fn locate(configured: Option<&Path>) -> Result<Self, FetchError> {
        tools::locate(YT_DLP, configured).map(Self::new)
    }

    fn spawn_error(&self, error: std::io::Error) -> FetchError {
        if error.kind() == std::io::ErrorKind::NotFound {
            FetchError::DependencyNotFound(self.binary.display().to_string())
        } else {
            FetchError::IoError(error)
        }
    }
}

#[async_trait]
impl Downloader for YtDlp {
    async fn check_available(&self) -> Result<(), FetchError> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(FetchError::DependencyNotFound(format!(
                "{} (--version exited with {})",
                self.binary.display(),
                output.status
            )));
        }

        tracing::debug!(
            binary = %self.binary.display(),
            version = %String::from_utf8_lossy(&output.stdout).trim(),
            "yt-dlp available"
        );
        Ok(())
    }

    async fn download(
        &self,
        job: &DownloadJob,
        progress: &ProgressHook,
    ) -> Result<PathBuf, FetchError> {
        let url = job.url.as_str();
        let args = job.options.to_args(&job.url);
        tracing::debug!(binary = %self.binary.display(), ?args, "running yt-dlp");

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let not_captured = |stream: &str| FetchError::DownloadFailed {
            url: url.to_string(),
            reason: format!("yt-dlp {stream} was not captured"),
        };
        let stdout = child.stdout.take().ok_or_else(|| not_captured("stdout"))?;
        let stderr = child.stderr.take().ok_or_else(|| not_captured("stderr"))?;

        let mut printed = Vec::new();
        let mut diagnostics = Vec::new();

        // Progress may arrive on either stream depending on the yt-dlp version
        let (stdout_result, stderr_result) = tokio::join!(
            scan_lines(stdout, |line| {
                if let Some(percent) = parse_progress_line(&line) {
                    report_progress(progress, url, percent);
                } else if !line.trim().is_empty() {
                    printed.push(line);
                }
            }),
            scan_lines(stderr, |line| {
                if let Some(percent) = parse_progress_line(&line) {
                    report_progress(progress, url, percent);
                } else if !line.trim().is_empty() {
                    tracing::trace!(url, "yt-dlp: {}", line);
                    diagnostics.push(line);
                }
            }),
        );
        stdout_result?;
        stderr_result?;

        let status = child.wait().await?;
        if !status.success() {
            return Err(FetchError::DownloadFailed {
                url: url.to_string(),
                reason: failure_reason(&diagnostics, status),
            });
        }

        // The after_move print is the final location of the file
        let path = printed
            .last()
            .map(|line| PathBuf::from(line.trim()))
            .ok_or_else(|| FetchError::MissingOutput(url.to_string()))?;

        progress(&ProgressEvent {
            url: url.to_string(),
            status: ProgressStatus::Finished { path: path.clone() },
        });

        Ok(path)
    }
}

async fn scan_lines<R: AsyncRead + Unpin>(
    reader: R,
    mut on_line: impl FnMut(String),
) -> std::io::Result<()> {
    // Titles and warnings are not always valid UTF-8
    let mut segments = BufReader::new(reader).split(b'\n');
    while let Some(segment) = segments.next_segment().await? {
        let line = String::from_utf8_lossy(&segment);
        on_line(line.trim_end_matches('\r').to_string());
    }
    Ok(())
}

fn report_progress(progress: &ProgressHook, url: &str, percent: f64) {
    progress(&ProgressEvent {
        url: url.to_string(),
        status: ProgressStatus::Downloading { percent },
    });
}

/// Pick the most useful line from yt-dlp's stderr
fn failure_reason(diagnostics: &[String], status: ExitStatus) -> String {
    diagnostics
        .iter()
        .rev()
        .find_map(|line| line.trim().strip_prefix("ERROR:").map(str::trim))
        .or_else(|| diagnostics.last().map(|line| line.trim()))
        .map(str::to_string)
        .unwrap_or_else(|| format!("yt-dlp exited with {status}"))
}

#[cfg(test)]
pub mod stub {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// In-process downloader that never touches the network
    #[derive(Default)]
    pub struct DownloaderStub {
        unavailable: bool,
        failing: Vec<String>,
        delay: Duration,
        slow: Vec<(String, Duration)>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        finished: Mutex<Vec<String>>,
        scratch_dirs: Mutex<Vec<PathBuf>>,
    }

    impl DownloaderStub {
        pub fn unavailable() -> Self {
            Self {
                unavailable: true,
                ..Self::default()
            }
        }

        pub fn failing(urls: &[&str]) -> Self {
            Self {
                failing: urls.iter().map(|u| u.to_string()).collect(),
                ..Self::default()
            }
        }

        pub fn with_delay(delay: Duration) -> Self {
            Self {
                delay,
                ..Self::default()
            }
        }

        /// Make one URL take `delay` instead of the default delay
        pub fn with_slow(mut self, url: &str, delay: Duration) -> Self {
            self.slow.push((url.to_string(), delay));
            self
        }

        /// URLs in the order their downloads completed
        pub fn finish_order(&self) -> Vec<String> {
            self.finished.lock().unwrap().clone()
        }

        /// Temp directories that existed while a download ran
        pub fn scratch_dirs(&self) -> Vec<PathBuf> {
            self.scratch_dirs.lock().unwrap().clone()
        }

        /// Highest number of downloads that ran at the same time
        pub fn peak_concurrency(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Downloader for DownloaderStub {
        async fn check_available(&self) -> Result<(), FetchError> {
            if self.unavailable {
                return Err(FetchError::DependencyNotFound(YT_DLP.to_string()));
            }
            Ok(())
        }

        async fn download(
            &self,
            job: &DownloadJob,
            progress: &ProgressHook,
        ) -> Result<PathBuf, FetchError> {
            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(running, Ordering::SeqCst);

            if let Some(dir) = job.options.temp_dir.as_ref().filter(|dir| dir.is_dir()) {
                self.scratch_dirs.lock().unwrap().push(dir.clone());
            }

            let url = job.url.as_str();
            let delay = self
                .slow
                .iter()
                .find(|(slow, _)| slow == url)
                .map_or(self.delay, |(_, delay)| *delay);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.finished.lock().unwrap().push(url.to_string());

            if self.failing.iter().any(|failing| failing == url) {
                return Err(FetchError::DownloadFailed {
                    url: url.to_string(),
                    reason: "Unsupported URL".to_string(),
                });
            }

            report_progress(progress, url, 100.0);

            let ext = if job.options.extract_audio.is_some() {
                "mp3"
            } else {
                "mp4"
            };
            let title = job.url.path().trim_matches('/').replace('/', "_");
            let path = PathBuf::from(
                job.options
                    .output_template
                    .replace("%(title)s", &title)
                    .replace("%(ext)s", ext),
            );

            progress(&ProgressEvent {
                url: url.to_string(),
                status: ProgressStatus::Finished { path: path.clone() },
            });
            Ok(path)
        }
    }
}
