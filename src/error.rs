use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::PipelineStage;

/// Main error type for the clip remixer library
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Precondition failed: {0}")]
    Precondition(#[from] PreconditionError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Segment selection error: {0}")]
    Select(#[from] SelectError),

    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    #[error("Audio mix error: {0}")]
    Mix(#[from] MixError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Checks made before the pipeline touches any media
#[derive(Error, Debug)]
pub enum PreconditionError {
    #[error("Missing {role} file: {path}")]
    MissingInputFile { role: &'static str, path: PathBuf },

    #[error("External tool '{tool}' is not available: {reason}")]
    ToolMissing { tool: String, reason: String },
}

/// Opening and probing the source media
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to open media file {path}: {reason}")]
    MediaOpen { path: PathBuf, reason: String },

    #[error("No video stream found in {path}")]
    NoVideoStream { path: PathBuf },

    #[error("Invalid metadata in {path}: {details}")]
    InvalidMetadata { path: PathBuf, details: String },
}

#[derive(Error, Debug)]
pub enum SelectError {
    #[error("Video is {duration:.2}s long but at least {required:.2}s are required")]
    InsufficientDuration { duration: f64, required: f64 },
}

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Invalid {name} factor: {value}")]
    InvalidFactor { name: &'static str, value: f64 },

    #[error("Resizing {width}x{height} by {factor} gives an empty frame")]
    InvalidDimensions { width: u32, height: u32, factor: f64 },
}

#[derive(Error, Debug)]
pub enum MixError {
    #[error("Audio render failed: {reason}")]
    RenderFailed { reason: String },

    #[error("Could not create temporary audio file: {0}")]
    TempFile(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Could not prepare output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Encoding failed: {reason}")]
    EncodeFailed { reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using EditorError
pub type Result<T> = std::result::Result<T, EditorError>;

impl EditorError {
    /// True for failures detected before any media was opened
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_) | Self::Config(_))
    }

    /// The pipeline state the run was in when this error occurred
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::Precondition(_) | Self::Config(_) => PipelineStage::Idle,
            Self::Load(_) => PipelineStage::Idle,
            Self::Select(_) => PipelineStage::Loaded,
            Self::Transform(_) => PipelineStage::SegmentSelected,
            Self::Mix(_) => PipelineStage::Transformed,
            Self::Export(_) | Self::Io(_) => PipelineStage::AudioMixed,
        }
    }

    /// Whether the failure is the external transcoder being absent
    pub fn is_tool_missing(&self) -> bool {
        matches!(self, Self::Precondition(PreconditionError::ToolMissing { .. }))
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Precondition(PreconditionError::ToolMissing { tool, .. }) => {
                format!(
                    "'{}' could not be started. FFmpeg must be installed separately and be on PATH \
                     (macOS: brew install ffmpeg, Debian/Ubuntu: sudo apt install ffmpeg).",
                    tool
                )
            }
            Self::Precondition(PreconditionError::MissingInputFile { role, path }) => {
                format!("The {} file '{}' does not exist.", role, path.display())
            }
            Self::Select(SelectError::InsufficientDuration { required, .. }) => {
                format!("The video is too short. At least {} seconds are required.", required)
            }
            _ => self.to_string(),
        }
    }
}

impl PreconditionError {
    /// Map a spawn failure of an external tool to the most precise error
    pub(crate) fn from_spawn(tool: &str, err: &std::io::Error) -> Option<Self> {
        (err.kind() == std::io::ErrorKind::NotFound).then(|| Self::ToolMissing {
            tool: tool.to_string(),
            reason: err.to_string(),
        })
    }
}
