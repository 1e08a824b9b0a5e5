use std::path::Path;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::{
    audio::{AudioFormat, AudioLoader, AudioMixer, MixMode, SourceAudio},
    config::Config,
    error::{PreconditionError, Result},
    export::{ExportedClip, Exporter},
    pipeline::state::{PipelineStage, StageTracker},
    tools::FfmpegTools,
    transforms::{TransformChain, TransformParameters, VideoPlan},
    video::{Segment, SegmentSelector, SourceVideo, VideoLoader},
};

/// Everything a finished run decided and produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub source: SourceVideo,
    pub music: SourceAudio,
    pub segment: Segment,
    pub params: TransformParameters,
    pub mix_mode: MixMode,

    /// Expected length of the exported video stream
    pub video_duration: f64,

    /// Expected length of the exported audio stream
    pub audio_duration: f64,

    pub output: ExportedClip,
}

/// Main engine that turns one source video into one remixed clip
///
/// The engine follows a fixed sequence:
/// 1. Load - probe the source video and the background track
/// 2. Select - pick a random fixed-length segment
/// 3. Transform - draw colour/resize/speed factors
/// 4. Mix - render the attenuated original audio plus background music
/// 5. Export - encode and mux into a freshly named file
pub struct EditEngine {
    config: Config,
    tools: FfmpegTools,
}

impl EditEngine {
    /// Create an engine for a validated configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let tools = FfmpegTools::new(&config.tools);
        Ok(Self { config, tools })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fail fast when either input file is absent
    pub fn check_inputs(&self) -> Result<()> {
        let inputs = [
            ("input video", &self.config.input.video),
            ("background music", &self.config.input.music),
        ];

        for (role, path) in inputs {
            if !path.is_file() {
                return Err(PreconditionError::MissingInputFile {
                    role,
                    path: path.clone(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Run the whole pipeline once, drawing every random choice from `rng`
    pub async fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<RunReport> {
        self.check_inputs()?;
        self.tools.probe().await?;

        let mut tracker = StageTracker::new();
        let result = self.run_stages(&mut tracker, rng).await;
        settle(&mut tracker, result)
    }

    async fn run_stages<R: Rng + ?Sized>(
        &self,
        tracker: &mut StageTracker,
        rng: &mut R,
    ) -> Result<RunReport> {
        // Step 1: load
        let loader = VideoLoader::new(self.tools.clone());
        let source = loader.load(&self.config.input.video).await?;
        let music = self.load_music(&loader, &self.config.input.music).await?;
        tracker.advance(PipelineStage::Loaded);

        // Step 2: select
        let selector = SegmentSelector::new(self.config.segment.duration);
        let segment = selector.select(&source, rng)?;
        tracker.advance(PipelineStage::SegmentSelected);

        // Step 3: transform
        let (params, chain, plan) = self.plan_transforms(&source, &segment, rng)?;
        let video_duration = chain.output_duration(segment.duration());
        tracker.advance(PipelineStage::Transformed);

        // Step 4: mix
        let mixer = AudioMixer::new(&self.tools, &self.config.audio, &self.config.output);
        let mixed = mixer.mix(&source, &segment, &chain, &music).await?;
        let audio_duration = mixed.duration;
        let mix_mode = mixed.mode;
        tracker.advance(PipelineStage::AudioMixed);

        // Step 5: export
        let exporter = Exporter::new(&self.tools, &self.config.output);
        let output = exporter.export(&source, &segment, &plan, mixed, rng).await?;
        tracker.advance(PipelineStage::Exported);

        info!("Saved {}", output.path.display());

        Ok(RunReport {
            source,
            music,
            segment,
            params,
            mix_mode,
            video_duration,
            audio_duration,
            output,
        })
    }

    /// Draw the transform factors and resolve the video filter for `source`
    ///
    /// Frame-size problems surface here, before any audio is rendered.
    fn plan_transforms<R: Rng + ?Sized>(
        &self,
        source: &SourceVideo,
        segment: &Segment,
        rng: &mut R,
    ) -> Result<(TransformParameters, TransformChain, VideoPlan)> {
        let params = TransformParameters::sample(&self.config.transform, rng);
        let chain = TransformChain::from_parameters(&params)?;
        let plan = chain.plan(source)?;

        debug!(
            "Transforms: {} -> {}x{}, {:.3}s",
            chain.summary(),
            plan.frame_size.0,
            plan.frame_size.1,
            chain.output_duration(segment.duration())
        );

        Ok((params, chain, plan))
    }

    /// Read the background track with Symphonia, falling back to ffprobe
    async fn load_music(&self, loader: &VideoLoader, path: &Path) -> Result<SourceAudio> {
        match AudioLoader::load(path).await {
            Ok(music) => {
                info!("Background music: {:.2}s ({})", music.duration, music.format.extension);
                Ok(music)
            }
            Err(e) => {
                warn!("Symphonia could not read {} ({}), asking ffprobe", path.display(), e);
                let duration = loader.audio_duration(path).await?;
                info!("Background music: {:.2}s", duration);
                Ok(SourceAudio {
                    path: path.to_path_buf(),
                    duration,
                    sample_rate: None,
                    channels: None,
                    format: AudioFormat {
                        extension: AudioLoader::detect_format(path).unwrap_or_else(|| "unknown".to_string()),
                        codec: None,
                    },
                })
            }
        }
    }
}

/// Move the tracker to `Failed` when a run ends in an error
fn settle<T>(tracker: &mut StageTracker, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        let stopped = tracker.fail();
        warn!("Run stopped while {}: {}", stopped, e);
    }
    result
}
