//! # Clip-Remixer
//!
//! Cut a random fixed-length segment out of a video, apply small randomized
//! cosmetic changes, and re-score it with background music.
//!
//! All decoding and encoding is delegated to an external `ffmpeg`/`ffprobe`
//! installation; this crate decides what to cut, how to transform it and how
//! to mix the audio, then drives the transcoder.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clip_remixer::{config::Config, pipeline::EditEngine};
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let mut config = Config::default();
//! config.input.video = "input_clip.mp4".into();
//! config.input.music = "bg_music.mp3".into();
//!
//! let engine = EditEngine::new(config)?;
//! let report = engine.run(&mut SmallRng::from_entropy()).await?;
//! println!("Wrote {}", report.output.path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`video`] - Source probing and random segment selection
//! - [`transforms`] - Colour, resize and speed transforms
//! - [`audio`] - Background track probing and audio mixing
//! - [`export`] - Output naming, encoding and muxing
//! - [`pipeline`] - Stage tracking and orchestration
//! - [`config`] - Configuration management
//! - [`tools`] - External transcoder access

pub mod audio;
pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod tools;
pub mod transforms;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{EditorError, Result},
    pipeline::{EditEngine, PipelineStage, RunReport},
    transforms::{Transform, TransformParameters},
};
