//! # Video Module
//!
//! Probes the source video and selects the segment that gets remixed.

pub mod loader;
pub mod selector;
pub mod types;

pub use loader::VideoLoader;
pub use selector::SegmentSelector;
pub use types::{Segment, SourceVideo};
