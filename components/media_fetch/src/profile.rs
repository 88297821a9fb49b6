// components/media_fetch/src/profile.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to keep from the source media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Audio,
    Video,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Audio => write!(f, "audio"),
            Mode::Video => write!(f, "video"),
        }
    }
}

/// Video quality profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Best,
    /// Up to 1080p
    High,
    /// Up to 720p
    Medium,
    /// Up to 480p
    Low,
    Worst,
}

/// Format selector used for audio-only downloads
pub const AUDIO_FORMAT: &str = "bestaudio/best";

impl Quality {
    pub fn max_height(&self) -> Option<u32> {
        match self {
            Quality::High => Some(1080),
            Quality::Medium => Some(720),
            Quality::Low => Some(480),
            Quality::Best | Quality::Worst => None,
        }
    }

    /// yt-dlp format selector for this profile
    pub fn format_selector(&self) -> String {
        match (self, self.max_height()) {
            (Quality::Worst, _) => "worst".to_string(),
            (_, Some(height)) => format!(
                "bestvideo[height<={height}]+bestaudio/best[height<={height}]"
            ),
            (_, None) => "bestvideo+bestaudio/best".to_string(),
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quality::Best => "best",
            Quality::High => "high",
            Quality::Medium => "medium",
            Quality::Low => "low",
            Quality::Worst => "worst",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown quality '{0}' (expected 0-3, best, high, medium, low, worst, 1080p, 720p or 480p)")]
pub struct UnknownQuality(String);

impl FromStr for Quality {
    type Err = UnknownQuality;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Numeric levels follow the historical 0-3 scale
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "best" => Ok(Quality::Best),
            "high" | "1080" | "1080p" => Ok(Quality::High),
            "1" | "medium" | "720" | "720p" => Ok(Quality::Medium),
            "2" | "low" | "480" | "480p" => Ok(Quality::Low),
            "3" | "worst" => Ok(Quality::Worst),
            _ => Err(UnknownQuality(s.to_string())),
        }
    }
}

/// Audio extraction applied after an audio-only download
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioProfile {
    pub codec: String,
    pub quality: String,
}

impl Default for AudioProfile {
    fn default() -> Self {
        Self {
            codec: "mp3".to_string(),
            quality: "192K".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", Quality::Best)]
    #[case("1", Quality::Medium)]
    #[case("2", Quality::Low)]
    #[case("3", Quality::Worst)]
    #[case("best", Quality::Best)]
    #[case("High", Quality::High)]
    #[case("1080p", Quality::High)]
    #[case("720p", Quality::Medium)]
    #[case(" 480 ", Quality::Low)]
    fn parses_quality(#[case] input: &str, #[case] expected: Quality) {
        assert_eq!(input.parse::<Quality>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_quality() {
        assert!("4".parse::<Quality>().is_err());
        assert!("ultra".parse::<Quality>().is_err());
    }

    #[rstest]
    #[case(Quality::Best, "bestvideo+bestaudio/best")]
    #[case(Quality::High, "bestvideo[height<=1080]+bestaudio/best[height<=1080]")]
    #[case(Quality::Medium, "bestvideo[height<=720]+bestaudio/best[height<=720]")]
    #[case(Quality::Low, "bestvideo[height<=480]+bestaudio/best[height<=480]")]
    #[case(Quality::Worst, "worst")]
    fn format_selectors(#[case] quality: Quality, #[case] expected: &str) {
        assert_eq!(quality.format_selector(), expected);
    }
}
