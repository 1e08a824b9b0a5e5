use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    audio::MixMode,
    error::{ConfigError, Result},
};

/// Tempo filter limits for a single `atempo` stage
const MIN_SPEED: f64 = 0.5;
const MAX_SPEED: f64 = 2.0;

/// Main configuration for a remix run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source media locations
    pub input: InputConfig,

    /// Output location and encoder settings
    pub output: OutputConfig,

    /// Segment selection settings
    pub segment: SegmentConfig,

    /// Visual transform ranges
    pub transform: TransformConfig,

    /// Audio mix settings
    pub audio: AudioConfig,

    /// External tool locations
    pub tools: ToolsConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(config)
    }

    /// Serialize to a pretty TOML document
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string(),
            }
            .into()
        })
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.output.validate()?;
        self.segment.validate()?;
        self.transform.validate()?;
        self.audio.validate()?;
        Ok(())
    }
}

fn invalid(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Source media locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Source video
    pub video: PathBuf,

    /// Background music track
    pub music: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            video: PathBuf::from("input_clip.mp4"),
            music: PathBuf::from("bg_music.mp3"),
        }
    }
}

/// Output location and encoder settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the generated clips (created if absent)
    pub directory: PathBuf,

    /// Leading part of every generated file name
    pub file_prefix: String,

    /// Container extension, without the dot
    pub extension: String,

    pub video_codec: String,
    pub audio_codec: String,
    pub audio_bitrate: String,

    /// Encoder speed/quality preset
    pub preset: String,

    /// Suffix of the intermediate audio file, which decides its container
    pub temp_audio_suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output_clips"),
            file_prefix: "clip_edited".to_string(),
            extension: "mp4".to_string(),
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            audio_bitrate: "192k".to_string(),
            preset: "medium".to_string(),
            temp_audio_suffix: ".m4a".to_string(),
        }
    }
}

impl OutputConfig {
    fn validate(&self) -> Result<()> {
        let required = [
            ("output.file_prefix", &self.file_prefix),
            ("output.extension", &self.extension),
            ("output.video_codec", &self.video_codec),
            ("output.audio_codec", &self.audio_codec),
            ("output.temp_audio_suffix", &self.temp_audio_suffix),
        ];

        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(invalid(key, "\"\"").into());
            }
        }

        Ok(())
    }
}

/// Segment selection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Length of the extracted segment in seconds
    pub duration: f64,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self { duration: 20.0 }
    }
}

impl SegmentConfig {
    fn validate(&self) -> Result<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(invalid("segment.duration", self.duration).into());
        }
        Ok(())
    }
}

/// Ranges the visual transform factors are drawn from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub color_min: f64,
    pub color_max: f64,

    /// Fixed frame scale factor
    pub resize_factor: f64,

    pub speed_min: f64,
    pub speed_max: f64,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            color_min: 0.95,
            color_max: 1.05,
            resize_factor: 0.95,
            speed_min: 0.98,
            speed_max: 1.02,
        }
    }
}

impl TransformConfig {
    fn validate(&self) -> Result<()> {
        if !(self.color_min > 0.0 && self.color_min <= self.color_max && self.color_max.is_finite()) {
            return Err(invalid(
                "transform.color_range",
                format!("{}-{}", self.color_min, self.color_max),
            )
            .into());
        }

        if !(self.resize_factor > 0.0 && self.resize_factor <= 1.0) {
            return Err(invalid("transform.resize_factor", self.resize_factor).into());
        }

        if !(MIN_SPEED..=MAX_SPEED).contains(&self.speed_min)
            || !(MIN_SPEED..=MAX_SPEED).contains(&self.speed_max)
            || self.speed_min > self.speed_max
        {
            return Err(invalid(
                "transform.speed_range",
                format!("{}-{}", self.speed_min, self.speed_max),
            )
            .into());
        }

        Ok(())
    }
}

/// Audio mix settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Gain applied to the segment's own audio
    pub original_volume: f64,

    /// Gain applied to the background track
    pub music_volume: f64,

    pub mix_mode: MixMode,

    /// Common sample rate both tracks are resampled to before mixing
    pub sample_rate: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            original_volume: 0.1,
            music_volume: 1.0,
            mix_mode: MixMode::Concatenate,
            sample_rate: 44100,
        }
    }
}

impl AudioConfig {
    fn validate(&self) -> Result<()> {
        if !(self.original_volume >= 0.0 && self.original_volume.is_finite()) {
            return Err(invalid("audio.original_volume", self.original_volume).into());
        }

        if !(self.music_volume >= 0.0 && self.music_volume.is_finite()) {
            return Err(invalid("audio.music_volume", self.music_volume).into());
        }

        if self.sample_rate == 0 {
            return Err(invalid("audio.sample_rate", self.sample_rate).into());
        }

        Ok(())
    }
}

/// External tool locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }
}
