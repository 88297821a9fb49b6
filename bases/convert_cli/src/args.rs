// bases/convert_cli/src/args.rs
use clap::Parser;
use std::path::PathBuf;

/// Extract the audio track of a video file as mp3
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The video file to convert
    pub video: PathBuf,

    /// Directory for the audio file (defaults to the video's directory)
    #[arg(short = 'd', long)]
    pub output_dir: Option<PathBuf>,

    /// Audio bitrate passed to ffmpeg
    #[arg(short, long, default_value = "192k")]
    pub bitrate: String,

    /// Overwrite an existing audio file
    #[arg(short, long)]
    pub force: bool,

    /// Path to the ffmpeg binary
    #[arg(long, env = "GRAB_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn output_dir(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => self
                .video
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(|parent| parent.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}
