use rand::Rng;
use tracing::info;

use crate::error::{Result, SelectError};
use crate::video::types::{Segment, SourceVideo};

/// Picks a uniformly random fixed-length window of a video
#[derive(Debug, Clone, Copy)]
pub struct SegmentSelector {
    duration: f64,
}

impl SegmentSelector {
    pub fn new(duration: f64) -> Self {
        Self { duration }
    }

    /// Target segment length in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Choose a segment of `source`
    pub fn select<R: Rng + ?Sized>(&self, source: &SourceVideo, rng: &mut R) -> Result<Segment> {
        let segment = self.select_within(source.duration, rng)?;
        info!(
            "Selected segment {:.2}s - {:.2}s of {:.2}s",
            segment.start_time, segment.end_time, source.duration
        );
        Ok(segment)
    }

    /// Choose a segment of a timeline `total` seconds long
    pub fn select_within<R: Rng + ?Sized>(&self, total: f64, rng: &mut R) -> Result<Segment> {
        let max_start = total - self.duration;
        if !(max_start >= 0.0) {
            return Err(SelectError::InsufficientDuration {
                duration: total,
                required: self.duration,
            }
            .into());
        }

        let start_time = rng.gen_range(0.0..=max_start);
        Ok(Segment::new(start_time, self.duration))
    }
}
