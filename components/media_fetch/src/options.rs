// components/media_fetch/src/options.rs
use crate::profile::{AudioProfile, Quality, AUDIO_FORMAT};
use crate::progress::PROGRESS_MARKER;
use std::path::{Path, PathBuf};
use url::Url;

/// Container video downloads are merged into unless configured otherwise
pub const DEFAULT_CONTAINER: &str = "mp4";

/// Containers yt-dlp can merge video and audio streams into
pub const VIDEO_CONTAINERS: [&str; 6] = ["mp4", "mkv", "webm", "mov", "avi", "flv"];

/// Fragments fetched in parallel for segmented (HLS/DASH) streams
pub const DEFAULT_FRAGMENTS: u32 = 4;

/// Options that apply to every download, whatever its mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraOptions {
    /// Proxy URL passed straight to yt-dlp
    pub proxy: Option<String>,

    /// Comma separated subtitle languages to write next to the media
    pub subtitles: Option<String>,

    pub write_thumbnail: bool,

    /// Only honoured together with `write_thumbnail`
    pub embed_thumbnail: bool,

    pub concurrent_fragments: Option<u32>,
}

/// Everything yt-dlp needs to know about a single download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    pub format: String,
    pub output_template: String,
    pub ffmpeg_location: Option<PathBuf>,
    pub extract_audio: Option<AudioProfile>,
    pub merge_output_format: Option<String>,
    pub temp_dir: Option<PathBuf>,
    pub extras: ExtraOptions,
}

impl DownloadOptions {
    pub fn video(quality: Quality, output_dir: &Path, output_name: Option<&str>) -> Self {
        Self {
            format: quality.format_selector(),
            output_template: output_template(output_dir, output_name),
            ffmpeg_location: None,
            extract_audio: None,
            merge_output_format: Some(DEFAULT_CONTAINER.to_string()),
            temp_dir: None,
            extras: ExtraOptions::default(),
        }
    }

    pub fn audio(profile: AudioProfile, output_dir: &Path, output_name: Option<&str>) -> Self {
        Self {
            format: AUDIO_FORMAT.to_string(),
            output_template: output_template(output_dir, output_name),
            ffmpeg_location: None,
            extract_audio: Some(profile),
            merge_output_format: None,
            temp_dir: None,
            extras: ExtraOptions::default(),
        }
    }

    pub fn with_ffmpeg_location(mut self, ffmpeg: Option<PathBuf>) -> Self {
        self.ffmpeg_location = ffmpeg;
        self
    }

    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(temp_dir.into());
        self
    }

    /// Merge video into `container`; audio downloads are left alone
    pub fn with_container(mut self, container: &str) -> Self {
        if self.extract_audio.is_none() {
            self.merge_output_format = Some(container.to_string());
        }
        self
    }

    pub fn with_extras(mut self, extras: ExtraOptions) -> Self {
        self.extras = extras;
        self
    }

    /// Command-line arguments for yt-dlp, ending with the URL
    pub fn to_args(&self, url: &Url) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "--no-playlist".into(),
            "--newline".into(),
            "--quiet".into(),
            "--progress".into(),
            "--no-simulate".into(),
            "--progress-template".into(),
            format!("download:{PROGRESS_MARKER}%(progress._percent_str)s"),
            "--print".into(),
            "after_move:%(filepath)s".into(),
            "--format".into(),
            self.format.clone(),
            "--output".into(),
            self.output_template.clone(),
        ];

        if let Some(temp_dir) = &self.temp_dir {
            args.push("--paths".into());
            args.push(format!("temp:{}", temp_dir.display()));
        }

        if let Some(ffmpeg) = &self.ffmpeg_location {
            args.push("--ffmpeg-location".into());
            args.push(ffmpeg.display().to_string());
        }

        if let Some(container) = &self.merge_output_format {
            args.push("--merge-output-format".into());
            args.push(container.clone());
        }

        if let Some(audio) = &self.extract_audio {
            args.push("--extract-audio".into());
            args.push("--audio-format".into());
            args.push(audio.codec.clone());
            args.push("--audio-quality".into());
            args.push(audio.quality.clone());
        }

        self.push_extras(&mut args);

        args.push("--".into());
        args.push(url.as_str().to_string());
        args
    }

    fn push_extras(&self, args: &mut Vec<String>) {
        let extras = &self.extras;

        if let Some(proxy) = &extras.proxy {
            args.push("--proxy".into());
            args.push(proxy.clone());
        }

        if let Some(langs) = &extras.subtitles {
            args.push("--write-subs".into());
            args.push("--sub-langs".into());
            args.push(langs.clone());
        }

        if extras.write_thumbnail {
            args.push("--write-thumbnail".into());
            if extras.embed_thumbnail {
                args.push("--embed-thumbnail".into());
            }
        }

        if let Some(fragments) = extras.concurrent_fragments {
            args.push("--concurrent-fragments".into());
            args.push(fragments.max(1).to_string());
        }
    }
}

/// Output template for a download into `dir`, named after the media title
/// unless an explicit name is given
pub fn output_template(dir: &Path, name: Option<&str>) -> String {
    let file_name = name
        .map(|name| sanitize_filename::sanitize(name.trim()))
        .filter(|name| !name.is_empty())
        // yt-dlp treats '%' as the start of a template field
        .map(|name| format!("{}.%(ext)s", name.replace('%', "%%")))
        .unwrap_or_else(|| "%(title)s.%(ext)s".to_string());

    dir.join(file_name).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://example.com/watch?v=abc").unwrap()
    }

    fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|arg| arg == flag)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }

    #[test]
    fn template_uses_title_by_default() {
        let template = output_template(Path::new("/media"), None);
        assert_eq!(template, "/media/%(title)s.%(ext)s");
    }

    #[test]
    fn template_uses_sanitized_name() {
        let template = output_template(Path::new("/media"), Some("my/clip: 100%"));
        assert_eq!(template, "/media/myclip 100%%.%(ext)s");
    }

    #[test]
    fn blank_name_falls_back_to_title() {
        let template = output_template(Path::new("/media"), Some("  "));
        assert_eq!(template, "/media/%(title)s.%(ext)s");
    }

    #[test]
    fn video_arguments() {
        let options = DownloadOptions::video(Quality::Medium, Path::new("/media"), None)
            .with_ffmpeg_location(Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg")));
        let args = options.to_args(&url());

        assert_eq!(
            value_after(&args, "--format"),
            Some("bestvideo[height<=720]+bestaudio/best[height<=720]")
        );
        assert_eq!(value_after(&args, "--output"), Some("/media/%(title)s.%(ext)s"));
        assert_eq!(value_after(&args, "--merge-output-format"), Some("mp4"));
        assert_eq!(
            value_after(&args, "--ffmpeg-location"),
            Some("/opt/ffmpeg/bin/ffmpeg")
        );
        assert!(args.contains(&"--no-playlist".to_string()));
        assert!(!args.contains(&"--extract-audio".to_string()));
    }

    #[test]
    fn audio_arguments() {
        let options = DownloadOptions::audio(AudioProfile::default(), Path::new("/music"), Some("song"))
            .with_temp_dir("/tmp/grab-x");
        let args = options.to_args(&url());

        assert_eq!(value_after(&args, "--format"), Some("bestaudio/best"));
        assert_eq!(value_after(&args, "--output"), Some("/music/song.%(ext)s"));
        assert_eq!(value_after(&args, "--audio-format"), Some("mp3"));
        assert_eq!(value_after(&args, "--audio-quality"), Some("192K"));
        assert_eq!(value_after(&args, "--paths"), Some("temp:/tmp/grab-x"));
        assert!(args.contains(&"--extract-audio".to_string()));
        assert_eq!(value_after(&args, "--merge-output-format"), None);
    }

    #[test]
    fn extra_arguments() {
        let extras = ExtraOptions {
            proxy: Some("socks5://127.0.0.1:1080".into()),
            subtitles: Some("en,de".into()),
            write_thumbnail: true,
            embed_thumbnail: true,
            concurrent_fragments: Some(8),
        };
        let args = DownloadOptions::video(Quality::Best, Path::new("/media"), None)
            .with_container("mkv")
            .with_extras(extras)
            .to_args(&url());

        assert_eq!(value_after(&args, "--merge-output-format"), Some("mkv"));
        assert_eq!(value_after(&args, "--proxy"), Some("socks5://127.0.0.1:1080"));
        assert_eq!(value_after(&args, "--write-subs"), Some("--sub-langs"));
        assert_eq!(value_after(&args, "--sub-langs"), Some("en,de"));
        assert!(args.contains(&"--write-thumbnail".to_string()));
        assert!(args.contains(&"--embed-thumbnail".to_string()));
        assert_eq!(value_after(&args, "--concurrent-fragments"), Some("8"));
        assert_eq!(args[args.len() - 2], "--");
    }

    #[test]
    fn no_extras_by_default() {
        let args = DownloadOptions::video(Quality::Best, Path::new("/media"), None).to_args(&url());
        for flag in ["--proxy", "--write-subs", "--write-thumbnail", "--concurrent-fragments"] {
            assert!(!args.contains(&flag.to_string()), "unexpected {flag}");
        }
    }

    #[test]
    fn embedding_needs_a_thumbnail() {
        let extras = ExtraOptions {
            embed_thumbnail: true,
            ..ExtraOptions::default()
        };
        let args = DownloadOptions::video(Quality::Best, Path::new("/media"), None)
            .with_extras(extras)
            .to_args(&url());
        assert!(!args.contains(&"--embed-thumbnail".to_string()));
    }

    #[test]
    fn container_is_ignored_for_audio() {
        let options = DownloadOptions::audio(
            AudioProfile {
                codec: "opus".into(),
                quality: "0".into(),
            },
            Path::new("/music"),
            None,
        )
        .with_container("mkv");
        let args = options.to_args(&url());

        assert_eq!(value_after(&args, "--merge-output-format"), None);
        assert_eq!(value_after(&args, "--audio-format"), Some("opus"));
        assert_eq!(value_after(&args, "--audio-quality"), Some("0"));
    }

    #[test]
    fn url_is_last_and_separated_from_flags() {
        let args = DownloadOptions::video(Quality::Best, Path::new("/media"), None).to_args(&url());
        let n = args.len();
        assert_eq!(args[n - 2], "--");
        assert_eq!(args[n - 1], "https://example.com/watch?v=abc");
    }
}
