use crate::{
    error::{Result, TransformError},
    transforms::Transform,
    video::types::SourceVideo,
};

/// Multiplies the red, green and blue channels by one factor
///
/// Values saturate at the channel maximum, so brightening never wraps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    factor: f64,
}

impl ColorScale {
    pub fn new(factor: f64) -> Result<Self> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(TransformError::InvalidFactor { name: "color", value: factor }.into());
        }
        Ok(Self { factor })
    }
}

impl Transform for ColorScale {
    fn name(&self) -> &str {
        "color"
    }

    fn factor(&self) -> f64 {
        self.factor
    }

    fn video_filter(&self, _source: &SourceVideo, _frame_size: (u32, u32)) -> Result<String> {
        Ok(format!(
            "colorchannelmixer=rr={f:.4}:gg={f:.4}:bb={f:.4}",
            f = self.factor
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::test_source;

    #[test]
    fn test_filter_scales_all_channels() {
        let color = ColorScale::new(1.03).unwrap();
        let filter = color.video_filter(&test_source(), (1280, 720)).unwrap();
        assert_eq!(filter, "colorchannelmixer=rr=1.0300:gg=1.0300:bb=1.0300");
    }

    #[test]
    fn test_rejects_non_positive_factor() {
        assert!(ColorScale::new(0.0).is_err());
        assert!(ColorScale::new(f64::INFINITY).is_err());
    }
}
