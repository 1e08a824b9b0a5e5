use crate::{error::Result, video::types::SourceVideo};

/// A single randomized cosmetic change applied to the selected segment
///
/// Transforms do not touch pixels themselves. Each one contributes a filter
/// expression that the transcoder evaluates while encoding, so a chain of
/// them compiles down to one filter graph.
pub trait Transform: Send + Sync {
    /// Returns the unique name of this transform
    fn name(&self) -> &str;

    /// The scalar this transform applies
    fn factor(&self) -> f64;

    /// Video filter expression for frames coming from `source`
    ///
    /// `frame_size` is the frame size produced by the transforms that run
    /// before this one.
    fn video_filter(&self, source: &SourceVideo, frame_size: (u32, u32)) -> Result<String>;

    /// Frame size after this transform
    fn output_size(&self, frame_size: (u32, u32)) -> Result<(u32, u32)> {
        Ok(frame_size)
    }

    /// Audio filter expression for audio travelling with the segment
    fn audio_filter(&self) -> Option<String> {
        None
    }

    /// Segment duration after this transform
    fn output_duration(&self, duration: f64) -> f64 {
        duration
    }
}
