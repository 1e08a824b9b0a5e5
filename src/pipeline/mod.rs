//! # Pipeline
//!
//! Runs one remix from input checks to the exported file.

pub mod engine;
pub mod state;

pub use engine::{EditEngine, RunReport};
pub use state::{PipelineStage, StageTracker};
