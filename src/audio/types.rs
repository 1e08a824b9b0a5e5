use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A probed background-audio track
#[derive(Debug, Clone, PartialEq)]
pub struct SourceAudio {
    /// Original file path
    pub path: PathBuf,

    /// Duration in seconds
    pub duration: f64,

    /// Sample rate in Hz, when the container declares one
    pub sample_rate: Option<u32>,

    /// Number of channels, when the container declares them
    pub channels: Option<u16>,

    /// Audio format information
    pub format: AudioFormat,
}

impl SourceAudio {
    /// How many times the track has to play to cover `target` seconds
    pub fn loops_needed(&self, target: f64) -> u32 {
        if self.duration <= 0.0 {
            return 0;
        }
        (target / self.duration).ceil().max(1.0) as u32
    }
}

/// Audio file format information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFormat {
    /// File extension (wav, mp3, flac, etc.)
    pub extension: String,

    /// Codec as reported by the decoder
    pub codec: Option<String>,
}

/// How the attenuated segment audio and the background track are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MixMode {
    /// Play the segment audio, then the background track (twice the video length)
    #[default]
    Concatenate,

    /// Play both together under the video
    Overlay,
}

impl MixMode {
    /// Length of the mixed track for a video of `video_duration` seconds
    pub fn track_duration(self, video_duration: f64) -> f64 {
        match self {
            Self::Concatenate => video_duration * 2.0,
            Self::Overlay => video_duration,
        }
    }
}

impl std::fmt::Display for MixMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Concatenate => write!(f, "concatenate"),
            Self::Overlay => write!(f, "overlay"),
        }
    }
}
