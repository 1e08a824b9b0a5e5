//! # Export Module
//!
//! Names, encodes and muxes the finished clip.

pub mod exporter;
pub mod naming;

pub use exporter::{ExportedClip, Exporter};
pub use naming::OutputNamer;
