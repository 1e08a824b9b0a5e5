use std::path::PathBuf;

/// A probed source video
///
/// Holds everything the pipeline needs to know about the input without
/// keeping a decoder open; each later stage re-reads the file through the
/// transcoder.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceVideo {
    /// Path to the video file
    pub path: PathBuf,

    /// Duration in seconds
    pub duration: f64,

    /// Frames per second
    pub fps: f64,

    /// Frame width in pixels
    pub width: u32,

    /// Frame height in pixels
    pub height: u32,

    /// Whether the container carries an audio stream
    pub has_audio: bool,
}

impl SourceVideo {
    /// Frame resolution as (width, height)
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// A fixed-length window of the source video
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Offset into the source in seconds
    pub start_time: f64,

    /// Exclusive end offset in seconds
    pub end_time: f64,
}

impl Segment {
    pub fn new(start_time: f64, duration: f64) -> Self {
        Self {
            start_time,
            end_time: start_time + duration,
        }
    }

    /// Length of the untransformed segment
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Whole seconds of the start offset, used in output names
    pub fn start_seconds(&self) -> u64 {
        self.start_time.floor() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_bounds() {
        let segment = Segment::new(7.8, 20.0);
        assert_eq!(segment.end_time, 27.8);
        assert!((segment.duration() - 20.0).abs() < 1e-9);
        assert_eq!(segment.start_seconds(), 7);
    }
}
