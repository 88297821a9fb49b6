// components/media_fetch/src/config.rs
use crate::options::{ExtraOptions, DEFAULT_CONTAINER, DEFAULT_FRAGMENTS};
use crate::profile::{AudioProfile, Mode, Quality};
use std::path::{Path, PathBuf};

/// Folder created inside the platform media directories
const APP_DIR: &str = "grab";

/// Upper bound for the default worker count
const MAX_DEFAULT_JOBS: usize = 32;

/// Download configuration shared by all downloads of a run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Where video downloads are written
    pub video_dir: PathBuf,

    /// Where audio downloads are written
    pub audio_dir: PathBuf,

    /// Explicit yt-dlp binary, looked up on PATH when unset
    pub yt_dlp: Option<PathBuf>,

    /// Explicit ffmpeg binary handed to yt-dlp for merging and extraction
    pub ffmpeg: Option<PathBuf>,

    /// Number of downloads running at the same time
    pub jobs: usize,

    /// Default video quality for new requests
    pub quality: Quality,

    /// Container video downloads are merged into
    pub container: String,

    /// Codec and quality of extracted audio
    pub audio: AudioProfile,

    pub extras: ExtraOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            video_dir: media_dir(dirs::video_dir()),
            audio_dir: media_dir(dirs::audio_dir()),
            yt_dlp: None,
            ffmpeg: None,
            jobs: default_jobs(),
            quality: Quality::default(),
            container: DEFAULT_CONTAINER.to_string(),
            audio: AudioProfile::default(),
            extras: ExtraOptions {
                concurrent_fragments: Some(DEFAULT_FRAGMENTS),
                ..ExtraOptions::default()
            },
        }
    }
}

impl Settings {
    /// Send every download, audio or video, to `dir`
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.video_dir = dir.clone();
        self.audio_dir = dir;
        self
    }

    pub fn output_dir(&self, mode: Mode) -> &Path {
        match mode {
            Mode::Audio => &self.audio_dir,
            Mode::Video => &self.video_dir,
        }
    }
}

fn media_dir(platform_dir: Option<PathBuf>) -> PathBuf {
    platform_dir
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("downloads"))
}

/// Worker count used when none is configured: CPUs + 4, capped at 32
pub fn default_jobs() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    (cpus + 4).min(MAX_DEFAULT_JOBS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_jobs_is_bounded() {
        let jobs = default_jobs();
        assert!(jobs >= 5, "expected at least 5 workers, got {jobs}");
        assert!(jobs <= MAX_DEFAULT_JOBS);
    }

    #[test]
    fn media_dir_falls_back_to_local_downloads() {
        assert_eq!(media_dir(None), PathBuf::from("downloads"));
        assert_eq!(
            media_dir(Some(PathBuf::from("/home/u/Videos"))),
            PathBuf::from("/home/u/Videos/grab")
        );
    }

    #[test]
    fn defaults_merge_to_mp4_with_parallel_fragments() {
        let settings = Settings::default();
        assert_eq!(settings.container, "mp4");
        assert_eq!(settings.audio, AudioProfile::default());
        assert_eq!(settings.extras.concurrent_fragments, Some(4));
        assert_eq!(settings.extras.proxy, None);
        assert!(!settings.extras.write_thumbnail);
    }

    #[test]
    fn output_dir_override_applies_to_both_modes() {
        let settings = Settings::default().with_output_dir("/tmp/out");
        assert_eq!(settings.output_dir(Mode::Audio), Path::new("/tmp/out"));
        assert_eq!(settings.output_dir(Mode::Video), Path::new("/tmp/out"));
    }
}
