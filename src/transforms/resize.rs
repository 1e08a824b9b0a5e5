use crate::{
    error::{Result, TransformError},
    transforms::Transform,
    video::types::SourceVideo,
};

/// Scales frame dimensions by a fixed factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resize {
    factor: f64,
}

impl Resize {
    pub fn new(factor: f64) -> Result<Self> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(TransformError::InvalidFactor { name: "resize", value: factor }.into());
        }
        Ok(Self { factor })
    }

    /// Scaled dimensions, rounded to even numbers for 4:2:0 chroma subsampling
    pub fn target_size(&self, (width, height): (u32, u32)) -> Result<(u32, u32)> {
        let scale = |dim: u32| ((dim as f64 * self.factor / 2.0).round() as u32) * 2;
        let (w, h) = (scale(width), scale(height));

        if w == 0 || h == 0 {
            return Err(TransformError::InvalidDimensions {
                width,
                height,
                factor: self.factor,
            }
            .into());
        }

        Ok((w, h))
    }
}

impl Transform for Resize {
    fn name(&self) -> &str {
        "resize"
    }

    fn factor(&self) -> f64 {
        self.factor
    }

    fn video_filter(&self, _source: &SourceVideo, frame_size: (u32, u32)) -> Result<String> {
        let (w, h) = self.target_size(frame_size)?;
        Ok(format!("scale={}:{}:flags=bicubic,setsar=1", w, h))
    }

    fn output_size(&self, frame_size: (u32, u32)) -> Result<(u32, u32)> {
        self.target_size(frame_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::test_source;

    #[test]
    fn test_target_size_is_even() {
        let resize = Resize::new(0.95).unwrap();
        assert_eq!(resize.target_size((1920, 1080)).unwrap(), (1824, 1026));
        assert_eq!(resize.target_size((1280, 720)).unwrap(), (1216, 684));

        let (w, h) = resize.target_size((641, 359)).unwrap();
        assert_eq!(w % 2, 0);
        assert_eq!(h % 2, 0);
    }

    #[test]
    fn test_filter_uses_previous_size() {
        let resize = Resize::new(0.95).unwrap();
        let filter = resize.video_filter(&test_source(), (1280, 720)).unwrap();
        assert_eq!(filter, "scale=1216:684:flags=bicubic,setsar=1");
    }

    #[test]
    fn test_tiny_frames_are_rejected() {
        let resize = Resize::new(0.95).unwrap();
        assert!(resize.target_size((1, 1)).is_err());
    }
}
