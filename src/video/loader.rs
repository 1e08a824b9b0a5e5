use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{LoadError, Result};
use crate::tools::{stderr_tail, FfmpegTools};
use crate::video::types::SourceVideo;

/// `ffprobe -print_format json` output, reduced to the fields we read
#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

impl ProbeOutput {
    fn stream(&self, kind: &str) -> Option<&ProbeStream> {
        self.streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some(kind))
    }

    /// Container duration, falling back to the given stream's own duration
    fn duration(&self, stream: Option<&ProbeStream>) -> Option<f64> {
        self.format
            .as_ref()
            .and_then(|f| f.duration.as_deref())
            .and_then(|d| d.parse::<f64>().ok())
            .or_else(|| stream.and_then(|s| s.duration.as_deref()).and_then(|d| d.parse::<f64>().ok()))
            .filter(|d: &f64| d.is_finite() && *d > 0.0)
    }
}

/// Opens media files through ffprobe
pub struct VideoLoader {
    tools: FfmpegTools,
}

impl VideoLoader {
    pub fn new(tools: FfmpegTools) -> Self {
        Self { tools }
    }

    /// Probe a video file for duration, frame rate and resolution
    pub async fn load<P: AsRef<Path>>(&self, path: P) -> Result<SourceVideo> {
        let path = path.as_ref();
        let probe = self.probe(path).await?;
        let video = parse_video(path, &probe)?;

        info!(
            "Video metadata: {}x{} @ {:.2}fps, {:.2}s{}",
            video.width,
            video.height,
            video.fps,
            video.duration,
            if video.has_audio { "" } else { " (no audio)" }
        );

        Ok(video)
    }

    /// Duration of the first audio stream of any container
    pub async fn audio_duration<P: AsRef<Path>>(&self, path: P) -> Result<f64> {
        let path = path.as_ref();
        let probe = self.probe(path).await?;
        let stream = probe.stream("audio").ok_or_else(|| LoadError::MediaOpen {
            path: path.to_path_buf(),
            reason: "no audio stream".to_string(),
        })?;

        probe.duration(Some(stream)).ok_or_else(|| {
            LoadError::InvalidMetadata {
                path: path.to_path_buf(),
                details: "unknown duration".to_string(),
            }
            .into()
        })
    }

    async fn probe(&self, path: &Path) -> Result<ProbeOutput> {
        let path_str = path.display().to_string();
        let output = self
            .tools
            .run_ffprobe([
                "-v", "error",
                "-print_format", "json",
                "-show_streams",
                "-show_format",
                path_str.as_str(),
            ])
            .await
            .map_err(|e| match FfmpegTools::spawn_error(self.tools.ffprobe_path(), e) {
                Some(missing) => missing.into(),
                None => crate::EditorError::from(LoadError::MediaOpen {
                    path: path.to_path_buf(),
                    reason: "ffprobe could not be started".to_string(),
                }),
            })?;

        if !output.status.success() {
            return Err(LoadError::MediaOpen {
                path: path.to_path_buf(),
                reason: stderr_tail(&output),
            }
            .into());
        }

        debug!("ffprobe returned {} bytes for {}", output.stdout.len(), path_str);

        serde_json::from_slice(&output.stdout).map_err(|e| {
            LoadError::MediaOpen {
                path: path.to_path_buf(),
                reason: format!("unreadable ffprobe output: {}", e),
            }
            .into()
        })
    }
}

fn parse_video(path: &Path, probe: &ProbeOutput) -> Result<SourceVideo> {
    let stream = probe.stream("video").ok_or_else(|| LoadError::NoVideoStream {
        path: path.to_path_buf(),
    })?;

    let invalid = |details: &str| LoadError::InvalidMetadata {
        path: path.to_path_buf(),
        details: details.to_string(),
    };

    let width = stream.width.filter(|w| *w > 0).ok_or_else(|| invalid("missing width"))?;
    let height = stream.height.filter(|h| *h > 0).ok_or_else(|| invalid("missing height"))?;

    let fps = stream
        .avg_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_frame_rate))
        .ok_or_else(|| invalid("missing frame rate"))?;

    let duration = probe
        .duration(Some(stream))
        .ok_or_else(|| invalid("missing duration"))?;

    Ok(SourceVideo {
        path: path.to_path_buf(),
        duration,
        fps,
        width,
        height,
        has_audio: probe.stream("audio").is_some(),
    })
}

/// Parse ffprobe rates such as "30000/1001" or "25"
fn parse_frame_rate(rate: &str) -> Option<f64> {
    let fps = match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => rate.trim().parse().ok()?,
    };

    (fps.is_finite() && fps > 0.0).then_some(fps)
}
