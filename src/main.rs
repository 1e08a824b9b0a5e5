use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rand::{rngs::SmallRng, SeedableRng};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use clip_remixer::{audio::MixMode, config::Config, pipeline::EditEngine, EditorError};

#[derive(Parser)]
#[command(
    name = "clip-remixer",
    version,
    about = "Cut, re-grade and re-score a random segment of a video",
    long_about = "Clip-Remixer picks a random fixed-length segment of a video, applies slight random \
                  colour, size and speed changes, mixes in background music and writes a uniquely \
                  named clip. Without arguments it reads input_clip.mp4 and bg_music.mp3 from the \
                  working directory and writes into output_clips/."
)]
struct Cli {
    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source video path
    #[arg(long)]
    video: Option<PathBuf>,

    /// Background music path
    #[arg(long)]
    music: Option<PathBuf>,

    /// Directory for generated clips
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Segment length in seconds
    #[arg(short, long)]
    duration: Option<f64>,

    /// How the original audio and the music are combined
    #[arg(short, long, value_enum)]
    mix_mode: Option<MixMode>,

    /// Seed for reproducible random choices
    #[arg(long)]
    seed: Option<u64>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading configuration from {:?}", path);
                Config::from_file(path)?
            }
            None => Config::default(),
        };

        if let Some(video) = &self.video {
            config.input.video = video.clone();
        }
        if let Some(music) = &self.music {
            config.input.music = music.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if let Some(duration) = self.duration {
            config.segment.duration = duration;
        }
        if let Some(mode) = self.mix_mode {
            config.audio.mix_mode = mode;
        }

        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let config = cli.load_config()?;

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let engine = EditEngine::new(config)?;

    info!("--- Clip-Remixer v{} starting ---", env!("CARGO_PKG_VERSION"));

    if let Err(e) = engine.check_inputs() {
        let input = &engine.config().input;
        error!("FATAL ERROR: {}", e.user_message());
        error!("Make sure these files exist:");
        error!("- Input video: {}", input.video.display());
        error!("- Background music: {}", input.music.display());
    } else {
        let mut rng = match cli.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        match engine.run(&mut rng).await {
            Ok(report) => {
                info!(
                    "SUCCESS! Segment {:.2}s-{:.2}s, color {:.3}, resize {:.2}, speed {:.3}",
                    report.segment.start_time,
                    report.segment.end_time,
                    report.params.color_factor,
                    report.params.resize_factor,
                    report.params.speed_factor
                );
                info!(
                    "Video {:.2}s, audio {:.2}s ({})",
                    report.video_duration, report.audio_duration, report.mix_mode
                );
                info!("Edited clip saved: {}", report.output.path.display());
            }
            Err(e) => report_failure(&e),
        }
    }

    info!("-----------------------------------------------");
    Ok(())
}

fn report_failure(e: &EditorError) {
    error!("Processing failed while {}: {}", e.stage(), e.user_message());
    if e.is_tool_missing() {
        error!("NOTE: FFmpeg is installed separately from this program; see https://ffmpeg.org/download.html");
    }
}
