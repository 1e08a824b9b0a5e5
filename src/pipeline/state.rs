use std::fmt;

use tracing::debug;

/// Where a run is in the load → select → transform → mix → export sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Loaded,
    SegmentSelected,
    Transformed,
    AudioMixed,
    Exported,

    /// A stage returned an error; reachable from any non-terminal stage
    Failed,
}

impl PipelineStage {
    /// The stage that follows this one, `None` once exported
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Loaded),
            Self::Loaded => Some(Self::SegmentSelected),
            Self::SegmentSelected => Some(Self::Transformed),
            Self::Transformed => Some(Self::AudioMixed),
            Self::AudioMixed => Some(Self::Exported),
            Self::Exported | Self::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Exported | Self::Failed)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loaded => "loaded",
            Self::SegmentSelected => "segment selected",
            Self::Transformed => "transformed",
            Self::AudioMixed => "audio mixed",
            Self::Exported => "exported",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks the current stage of one run and only moves forward
#[derive(Debug)]
pub struct StageTracker {
    stage: PipelineStage,
}

impl StageTracker {
    pub fn new() -> Self {
        Self { stage: PipelineStage::Idle }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Move to `to`, which must directly follow the current stage
    pub fn advance(&mut self, to: PipelineStage) {
        debug_assert_eq!(self.stage.next(), Some(to), "skipped a pipeline stage");
        debug!("Pipeline: {} -> {}", self.stage, to);
        self.stage = to;
    }

    /// Record that the run stopped, returning the stage it stopped in
    pub fn fail(&mut self) -> PipelineStage {
        let stopped = self.stage;
        debug_assert!(!stopped.is_terminal(), "run already finished");
        debug!("Pipeline: {} -> {}", stopped, PipelineStage::Failed);
        self.stage = PipelineStage::Failed;
        stopped
    }
}

impl Default for StageTracker {
    fn default() -> Self {
        Self::new()
    }
}
