use crate::{
    error::{Result, TransformError},
    transforms::Transform,
    video::types::SourceVideo,
};

/// Range a single `atempo` stage accepts
const TEMPO_RANGE: std::ops::RangeInclusive<f64> = 0.5..=2.0;

/// Plays the segment faster (> 1) or slower (< 1), audio included
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedChange {
    factor: f64,
}

impl SpeedChange {
    pub fn new(factor: f64) -> Result<Self> {
        if !TEMPO_RANGE.contains(&factor) {
            return Err(TransformError::InvalidFactor { name: "speed", value: factor }.into());
        }
        Ok(Self { factor })
    }
}

impl Transform for SpeedChange {
    fn name(&self) -> &str {
        "speed"
    }

    fn factor(&self) -> f64 {
        self.factor
    }

    fn video_filter(&self, _source: &SourceVideo, _frame_size: (u32, u32)) -> Result<String> {
        Ok(format!("setpts=(PTS-STARTPTS)/{:.6}", self.factor))
    }

    fn audio_filter(&self) -> Option<String> {
        Some(format!("atempo={:.6}", self.factor))
    }

    fn output_duration(&self, duration: f64) -> f64 {
        duration / self.factor
    }
}
