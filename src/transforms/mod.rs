//! # Visual Transforms
//!
//! The randomized cosmetic changes applied to the selected segment, in the
//! fixed order colour scale, resize, speed change.
//!
//! ```rust
//! use clip_remixer::transforms::{TransformChain, TransformParameters};
//!
//! let params = TransformParameters {
//!     color_factor: 1.02,
//!     resize_factor: 0.95,
//!     speed_factor: 1.0,
//! };
//! let chain = TransformChain::from_parameters(&params).unwrap();
//! assert_eq!(chain.names(), vec!["color", "resize", "speed"]);
//! ```

pub mod color;
pub mod params;
pub mod resize;
pub mod speed;
pub mod traits;

pub use color::ColorScale;
pub use params::TransformParameters;
pub use resize::Resize;
pub use speed::SpeedChange;
pub use traits::Transform;

use crate::{error::Result, video::types::SourceVideo};

/// Video side of a chain resolved against one source
#[derive(Debug, Clone, PartialEq)]
pub struct VideoPlan {
    /// Comma-joined filter chain for the segment's video stream
    pub filter: String,

    /// Frame size the filter chain produces
    pub frame_size: (u32, u32),
}

/// Ordered list of transforms compiled into one filter graph
pub struct TransformChain {
    transforms: Vec<Box<dyn Transform>>,
}

impl TransformChain {
    pub fn new() -> Self {
        Self { transforms: Vec::new() }
    }

    /// The standard colour → resize → speed chain for the drawn factors
    pub fn from_parameters(params: &TransformParameters) -> Result<Self> {
        Ok(Self::new()
            .with(ColorScale::new(params.color_factor)?)
            .with(Resize::new(params.resize_factor)?)
            .with(SpeedChange::new(params.speed_factor)?))
    }

    /// Append a transform
    pub fn with<T: Transform + 'static>(mut self, transform: T) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    /// Names and factors, e.g. `color x1.020, resize x0.950`
    pub fn summary(&self) -> String {
        self.transforms
            .iter()
            .map(|t| format!("{} x{:.3}", t.name(), t.factor()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Comma-joined video filter chain for `source`
    pub fn video_filter(&self, source: &SourceVideo) -> Result<String> {
        let mut frame_size = source.resolution();
        let mut filters = Vec::with_capacity(self.transforms.len());

        for transform in &self.transforms {
            filters.push(transform.video_filter(source, frame_size)?);
            frame_size = transform.output_size(frame_size)?;
        }

        if filters.is_empty() {
            filters.push("null".to_string());
        }

        Ok(filters.join(","))
    }

    /// Resolve the video filter and final frame size for `source`
    pub fn plan(&self, source: &SourceVideo) -> Result<VideoPlan> {
        Ok(VideoPlan {
            filter: self.video_filter(source)?,
            frame_size: self.output_size(source)?,
        })
    }

    /// Filters for the audio that travels with the segment
    pub fn audio_filters(&self) -> Vec<String> {
        self.transforms.iter().filter_map(|t| t.audio_filter()).collect()
    }

    /// Final frame size for `source`
    pub fn output_size(&self, source: &SourceVideo) -> Result<(u32, u32)> {
        self.transforms
            .iter()
            .try_fold(source.resolution(), |size, t| t.output_size(size))
    }

    /// Segment duration after every transform
    pub fn output_duration(&self, duration: f64) -> f64 {
        self.transforms
            .iter()
            .fold(duration, |d, t| t.output_duration(d))
    }
}

impl Default for TransformChain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) fn test_source() -> SourceVideo {
    SourceVideo {
        path: std::path::PathBuf::from("input_clip.mp4"),
        duration: 30.0,
        fps: 30.0,
        width: 1280,
        height: 720,
        has_audio: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> TransformParameters {
        TransformParameters {
            color_factor: 1.05,
            resize_factor: 0.95,
            speed_factor: 0.98,
        }
    }

    #[test]
    fn test_chain_order_and_filter() {
        let chain = TransformChain::from_parameters(&params()).unwrap();
        assert_eq!(chain.names(), vec!["color", "resize", "speed"]);

        let filter = chain.video_filter(&test_source()).unwrap();
        assert_eq!(
            filter,
            "colorchannelmixer=rr=1.0500:gg=1.0500:bb=1.0500,\
             scale=1216:684:flags=bicubic,setsar=1,\
             setpts=(PTS-STARTPTS)/0.980000"
        );
    }

    #[test]
    fn test_chain_duration_and_size() {
        let chain = TransformChain::from_parameters(&params()).unwrap();
        assert!((chain.output_duration(20.0) - 20.0 / 0.98).abs() < 1e-12);
        assert_eq!(chain.output_size(&test_source()).unwrap(), (1216, 684));
        assert_eq!(chain.audio_filters(), vec!["atempo=0.980000".to_string()]);
    }

    #[test]
    fn test_empty_chain_is_passthrough() {
        let chain = TransformChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.video_filter(&test_source()).unwrap(), "null");
        assert_eq!(chain.output_duration(20.0), 20.0);
    }

    #[test]
    fn test_summary_lists_factors() {
        let chain = TransformChain::from_parameters(&params()).unwrap();
        assert_eq!(chain.summary(), "color x1.050, resize x0.950, speed x0.980");
    }

    #[test]
    fn test_plan_rejects_tiny_frames() {
        let chain = TransformChain::from_parameters(&params()).unwrap();
        let tiny = SourceVideo {
            width: 1,
            height: 1,
            ..test_source()
        };

        assert!(chain.plan(&tiny).is_err());
        assert_eq!(chain.plan(&test_source()).unwrap().frame_size, (1216, 684));
    }

    #[test]
    fn test_invalid_parameters_fail() {
        let mut bad = params();
        bad.speed_factor = 3.0;
        assert!(TransformChain::from_parameters(&bad).is_err());
    }
}
