// components/media_fetch/src/convert.rs
use crate::error::FetchError;
use crate::tools::{self, FFMPEG};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

const AUDIO_EXTENSION: &str = "mp3";
const DEFAULT_BITRATE: &str = "192k";

/// Extracts the audio track of local video files with ffmpeg
#[derive(Debug, Clone)]
pub struct Converter {
    ffmpeg: PathBuf,
    bitrate: String,
    overwrite: bool,
}

impl Converter {
    pub fn new(ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            bitrate: DEFAULT_BITRATE.to_string(),
            overwrite: false,
        }
    }

    /// Find ffmpeg at the configured location or on `PATH`
    pub fn locate(configured: Option<&Path>) -> Result<Self, FetchError> {
        tools::locate(FFMPEG, configured).map(Self::new)
    }

    pub fn with_bitrate(mut self, bitrate: impl Into<String>) -> Self {
        self.bitrate = bitrate.into();
        self
    }

    /// Replace existing audio files instead of failing
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// `<output_dir>/<video stem>.mp3`
    pub fn audio_path_for(video: &Path, output_dir: &Path) -> Result<PathBuf, FetchError> {
        let stem = video
            .file_stem()
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| FetchError::InputNotFound(video.to_path_buf()))?;

        let mut file_name = stem.to_os_string();
        file_name.push(".");
        file_name.push(AUDIO_EXTENSION);
        Ok(output_dir.join(file_name))
    }

    pub fn command_args(&self, video: &Path, audio: &Path) -> Vec<OsString> {
        let overwrite = if self.overwrite { "-y" } else { "-n" };

        let mut args: Vec<OsString> = ["-nostdin", "-hide_banner", "-loglevel", "error", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(video.into());
        args.extend(["-vn", "-b:a", self.bitrate.as_str(), overwrite].map(OsString::from));
        args.push(audio.into());
        args
    }

    /// Write the audio track of `video` into `output_dir`, returning its path
    pub async fn extract_audio(&self, video: &Path, output_dir: &Path) -> Result<PathBuf, FetchError> {
        if !tokio::fs::try_exists(video).await? {
            return Err(FetchError::InputNotFound(video.to_path_buf()));
        }

        let audio = Self::audio_path_for(video, output_dir)?;
        if same_file(video, &audio).await {
            return Err(FetchError::ConversionFailed {
                input: video.to_path_buf(),
                reason: format!("output {} would overwrite the input", audio.display()),
            });
        }

        tokio::fs::create_dir_all(output_dir).await?;

        let args = self.command_args(video, &audio);
        tracing::debug!(ffmpeg = %self.ffmpeg.display(), ?args, "running ffmpeg");

        let output = Command::new(&self.ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    FetchError::DependencyNotFound(self.ffmpeg.display().to_string())
                }
                _ => FetchError::IoError(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => format!("ffmpeg exited with {}", output.status),
                message => message.to_string(),
            };
            return Err(FetchError::ConversionFailed {
                input: video.to_path_buf(),
                reason,
            });
        }

        tracing::info!(input = %video.display(), output = %audio.display(), "audio extracted");
        Ok(audio)
    }
}

async fn same_file(a: &Path, b: &Path) -> bool {
    match (tokio::fs::canonicalize(a).await, tokio::fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
