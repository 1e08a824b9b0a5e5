//! # Audio Module
//!
//! Measures the background track and renders the final audio for a remixed
//! segment.
//!
//! The segment's own audio is attenuated and, by default, followed by the
//! background track looped or trimmed to the segment's length
//! ([`MixMode::Concatenate`]). [`MixMode::Overlay`] plays both at once
//! instead, which keeps the audio as long as the video.

pub mod loader;
pub mod mixer;
pub mod types;

pub use loader::AudioLoader;
pub use mixer::{AudioMixer, MixedAudio};
pub use types::{AudioFormat, MixMode, SourceAudio};
