use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::{debug, info, warn};

use crate::{
    audio::MixedAudio,
    config::OutputConfig,
    error::{ExportError, Result},
    export::naming::OutputNamer,
    tools::{stderr_tail, FfmpegTools},
    transforms::VideoPlan,
    video::types::{Segment, SourceVideo},
};

/// Name redraws before accepting that an existing file gets replaced
const NAME_ATTEMPTS: usize = 10;

/// Represents an encoded output clip
#[derive(Debug, Clone)]
pub struct ExportedClip {
    pub path: PathBuf,
    pub file_size: u64,
    pub fps: f64,
    pub frame_size: (u32, u32),
}

/// Sibling path the encoder writes to before the clip is moved into place
///
/// Keeps the real extension last so the muxer is still chosen from it.
fn partial_path(output_path: &Path) -> PathBuf {
    match output_path.extension().and_then(|e| e.to_str()) {
        Some(ext) => output_path.with_extension(format!("part.{}", ext)),
        None => output_path.with_extension("part"),
    }
}

/// Deletes a partially written output file unless disarmed
struct PartialOutputGuard {
    path: PathBuf,
    armed: bool,
}

impl PartialOutputGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for PartialOutputGuard {
    fn drop(&mut self) {
        if !self.armed || !self.path.exists() {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed partial output {}", self.path.display()),
            Err(e) => warn!("Could not remove partial output {}: {}", self.path.display(), e),
        }
    }
}

/// Encodes the transformed segment together with its mixed audio
pub struct Exporter<'a> {
    tools: &'a FfmpegTools,
    config: &'a OutputConfig,
    namer: OutputNamer,
}

impl<'a> Exporter<'a> {
    pub fn new(tools: &'a FfmpegTools, config: &'a OutputConfig) -> Self {
        Self {
            tools,
            config,
            namer: OutputNamer::new(config),
        }
    }

    /// Write the final clip into the output directory
    ///
    /// The intermediate audio file is removed once the mux succeeds, and also
    /// when it fails, since `audio` is dropped either way.
    pub async fn export<R: Rng + ?Sized>(
        &self,
        source: &SourceVideo,
        segment: &Segment,
        plan: &VideoPlan,
        audio: MixedAudio,
        rng: &mut R,
    ) -> Result<ExportedClip> {
        let directory = &self.config.directory;
        tokio::fs::create_dir_all(directory)
            .await
            .map_err(|e| ExportError::OutputDirectory {
                path: directory.clone(),
                source: e,
            })?;

        let output_path = self.pick_output_path(directory, segment, rng);
        info!(
            "--- Writing {} ---",
            output_path.file_name().unwrap_or_default().to_string_lossy()
        );

        self.encode(source, segment, plan, audio.path(), &output_path).await?;

        if let Err(e) = audio.close() {
            warn!("Could not remove temporary audio file: {}", e);
        }

        let file_size = tokio::fs::metadata(&output_path).await.map(|m| m.len()).unwrap_or(0);
        info!(
            "Encoded {}x{} @ {:.2}fps, {:.1} KB",
            plan.frame_size.0,
            plan.frame_size.1,
            source.fps,
            file_size as f64 / 1024.0
        );

        Ok(ExportedClip {
            path: output_path,
            file_size,
            fps: source.fps,
            frame_size: plan.frame_size,
        })
    }

    /// Encode into a partial file, then move it over `output_path`
    ///
    /// A failed encode leaves whatever was at `output_path` untouched.
    async fn encode(
        &self,
        source: &SourceVideo,
        segment: &Segment,
        plan: &VideoPlan,
        audio_path: &Path,
        output_path: &Path,
    ) -> Result<()> {
        let guard = PartialOutputGuard::new(partial_path(output_path));
        let args = self.encode_args(source, segment, &plan.filter, audio_path, &guard.path);

        let output = self.tools.run_ffmpeg(&args).await.map_err(|e| {
            match FfmpegTools::spawn_error(self.tools.ffmpeg_path(), e) {
                Some(missing) => crate::EditorError::from(missing),
                None => ExportError::EncodeFailed {
                    reason: "ffmpeg could not be started".to_string(),
                }
                .into(),
            }
        })?;

        if !output.status.success() {
            return Err(ExportError::EncodeFailed {
                reason: stderr_tail(&output),
            }
            .into());
        }

        if output_path.exists() {
            warn!("Replacing existing {}", output_path.display());
        }
        tokio::fs::rename(&guard.path, output_path)
            .await
            .map_err(|e| ExportError::EncodeFailed {
                reason: format!("could not move finished clip into place: {}", e),
            })?;
        guard.disarm();

        Ok(())
    }

    /// Draw a name, redrawing a few times if it is already taken
    fn pick_output_path<R: Rng + ?Sized>(&self, directory: &Path, segment: &Segment, rng: &mut R) -> PathBuf {
        let mut path = self.namer.output_path(directory, segment, rng);
        for _ in 1..NAME_ATTEMPTS {
            if !path.exists() {
                break;
            }
            debug!("{} exists, drawing another name", path.display());
            path = self.namer.output_path(directory, segment, rng);
        }
        path
    }

    fn encode_args(
        &self,
        source: &SourceVideo,
        segment: &Segment,
        video_filter: &str,
        audio_path: &Path,
        output_path: &Path,
    ) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-hide_banner".into(),
            "-nostdin".into(),
            "-loglevel".into(),
            "error".into(),
            "-y".into(),
            "-ss".into(),
            format!("{:.6}", segment.start_time),
            "-t".into(),
            format!("{:.6}", segment.duration()),
            "-i".into(),
            source.path.display().to_string(),
            "-i".into(),
            audio_path.display().to_string(),
            "-filter_complex".into(),
            format!("[0:v:0]{}[vout]", video_filter),
            "-map".into(),
            "[vout]".into(),
            "-map".into(),
            "1:a:0".into(),
            "-c:v".into(),
            self.config.video_codec.clone(),
        ];

        if !self.config.preset.is_empty() {
            args.push("-preset".into());
            args.push(self.config.preset.clone());
        }

        // Output keeps the source frame rate even though the timeline is resampled
        args.extend([
            "-pix_fmt".into(),
            "yuv420p".into(),
            "-r".into(),
            format!("{:.6}", source.fps),
            "-c:a".into(),
            "copy".into(),
        ]);

        if matches!(self.config.extension.trim_start_matches('.'), "mp4" | "mov" | "m4v") {
            args.push("-movflags".into());
            args.push("+faststart".into());
        }

        args.push(output_path.display().to_string());

        args
    }
}
