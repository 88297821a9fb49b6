// bases/grab_cli/src/args.rs
use clap::Parser;
use media_fetch::{AudioProfile, Quality, Settings, DEFAULT_CONTAINER, VIDEO_CONTAINERS};
use std::path::PathBuf;

/// Download videos or audio from one or more URLs in parallel
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The URLs of the media to download
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Download audio only
    #[arg(short, long)]
    pub audio: bool,

    /// Download video
    #[arg(short, long)]
    pub video: bool,

    /// Output file name, without extension (single URL only)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Directory to store downloaded files
    #[arg(short = 'd', long, env = "GRAB_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Video quality: best, high, medium, low, worst (or 0-3)
    #[arg(short, long, env = "GRAB_QUALITY", default_value = "best")]
    pub quality: Quality,

    /// Container video downloads are merged into
    #[arg(long, env = "GRAB_CONTAINER", default_value = DEFAULT_CONTAINER, value_parser = VIDEO_CONTAINERS)]
    pub container: String,

    /// Codec of extracted audio
    #[arg(long, env = "GRAB_AUDIO_FORMAT", default_value = "mp3", value_parser = AUDIO_CODECS)]
    pub audio_format: String,

    /// Quality of extracted audio: a bitrate such as 192K, or 0 (best) to 10 (worst)
    #[arg(long, env = "GRAB_AUDIO_QUALITY", default_value = "192K")]
    pub audio_quality: String,

    /// Proxy URL for all requests, e.g. socks5://127.0.0.1:1080
    #[arg(long, env = "GRAB_PROXY")]
    pub proxy: Option<String>,

    /// Write subtitles in these languages, comma separated (e.g. en,de)
    #[arg(long = "subs", value_name = "LANGS")]
    pub subtitles: Option<String>,

    /// Write the thumbnail next to the media file
    #[arg(long)]
    pub thumbnail: bool,

    /// Embed the thumbnail into the media file
    #[arg(long, requires = "thumbnail")]
    pub embed_thumbnail: bool,

    /// Fragments to fetch in parallel for segmented streams
    #[arg(long, env = "GRAB_FRAGMENTS", value_parser = clap::value_parser!(u32).range(1..))]
    pub fragments: Option<u32>,

    /// Number of downloads to run at the same time
    #[arg(short, long, env = "GRAB_JOBS")]
    pub jobs: Option<usize>,

    /// Path to the yt-dlp binary
    #[arg(long = "yt-dlp", env = "GRAB_YT_DLP")]
    pub yt_dlp: Option<PathBuf>,

    /// Path to the ffmpeg binary
    #[arg(long, env = "GRAB_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

/// Codecs yt-dlp can extract audio into
const AUDIO_CODECS: [&str; 9] = ["best", "aac", "alac", "flac", "m4a", "mp3", "opus", "vorbis", "wav"];

impl Args {
    pub fn settings(&self) -> Settings {
        let mut settings = Settings {
            yt_dlp: self.yt_dlp.clone(),
            ffmpeg: self.ffmpeg.clone(),
            quality: self.quality,
            container: self.container.clone(),
            audio: AudioProfile {
                codec: self.audio_format.clone(),
                quality: self.audio_quality.clone(),
            },
            ..Settings::default()
        };

        if let Some(jobs) = self.jobs {
            settings.jobs = jobs;
        }

        settings.extras.proxy = self.proxy.clone();
        settings.extras.subtitles = self.subtitles.clone();
        settings.extras.write_thumbnail = self.thumbnail;
        settings.extras.embed_thumbnail = self.embed_thumbnail;
        if let Some(fragments) = self.fragments {
            settings.extras.concurrent_fragments = Some(fragments);
        }

        match &self.output_dir {
            Some(dir) => settings.with_output_dir(dir),
            None => settings,
        }
    }
}
