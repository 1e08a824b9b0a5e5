use std::path::Path;

use tempfile::TempPath;
use tracing::{debug, info, warn};

use crate::{
    audio::types::{MixMode, SourceAudio},
    config::{AudioConfig, OutputConfig},
    error::{MixError, Result},
    tools::{stderr_tail, FfmpegTools},
    transforms::TransformChain,
    video::types::{Segment, SourceVideo},
};

/// Final audio track, rendered to a temporary file that is removed on drop
#[derive(Debug)]
pub struct MixedAudio {
    path: TempPath,

    /// Length of the speed-adjusted video the track belongs to
    pub video_duration: f64,

    /// Length of the track itself
    pub duration: f64,

    pub mode: MixMode,
}

impl MixedAudio {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the intermediate file now, reporting any failure
    pub fn close(self) -> std::io::Result<()> {
        self.path.close()
    }
}

/// Builds and renders the attenuated-segment + background-music track
pub struct AudioMixer<'a> {
    tools: &'a FfmpegTools,
    audio: &'a AudioConfig,
    output: &'a OutputConfig,
}

impl<'a> AudioMixer<'a> {
    pub fn new(tools: &'a FfmpegTools, audio: &'a AudioConfig, output: &'a OutputConfig) -> Self {
        Self { tools, audio, output }
    }

    /// Render the mixed track for `segment` of `source`
    pub async fn mix(
        &self,
        source: &SourceVideo,
        segment: &Segment,
        chain: &TransformChain,
        music: &SourceAudio,
    ) -> Result<MixedAudio> {
        let video_duration = chain.output_duration(segment.duration());
        let mode = self.audio.mix_mode;

        info!(
            "Mixing audio ({}): original at {:.0}% volume, background looped {}x over {:.2}s",
            mode,
            self.audio.original_volume * 100.0,
            music.loops_needed(video_duration),
            video_duration
        );
        if !source.has_audio {
            warn!("{} has no audio stream, using silence for the original track", source.path.display());
        }

        let temp = tempfile::Builder::new()
            .prefix("clip-remixer-audio-")
            .suffix(&self.output.temp_audio_suffix)
            .tempfile()
            .map_err(MixError::TempFile)?
            .into_temp_path();

        let graph = self.filter_graph(source.has_audio, &chain.audio_filters(), video_duration);
        let args = self.render_args(source, segment, music, &graph, &temp);

        let output = self.tools.run_ffmpeg(&args).await.map_err(|e| {
            match FfmpegTools::spawn_error(self.tools.ffmpeg_path(), e) {
                Some(missing) => crate::EditorError::from(missing),
                None => MixError::RenderFailed {
                    reason: "ffmpeg could not be started".to_string(),
                }
                .into(),
            }
        })?;

        if !output.status.success() {
            return Err(MixError::RenderFailed {
                reason: stderr_tail(&output),
            }
            .into());
        }

        let duration = mode.track_duration(video_duration);
        debug!("Mixed audio written to {} ({:.2}s)", temp.display(), duration);

        Ok(MixedAudio {
            path: temp,
            video_duration,
            duration,
            mode,
        })
    }

    /// Filter graph producing `[aout]` from input 0 (source) and input 1 (music)
    pub fn filter_graph(
        &self,
        has_segment_audio: bool,
        segment_filters: &[String],
        video_duration: f64,
    ) -> String {
        let normalize = format!(
            "aresample={},aformat=sample_fmts=fltp:channel_layouts=stereo",
            self.audio.sample_rate
        );

        let original = if has_segment_audio {
            let mut chain = vec!["[0:a:0]asetpts=PTS-STARTPTS".to_string()];
            chain.extend(segment_filters.iter().cloned());
            // Sources whose audio ends before the segment are padded with silence
            chain.push("apad".to_string());
            chain.push(format!("atrim=end={:.6}", video_duration));
            chain.push(format!("volume={:.4}", self.audio.original_volume));
            chain.push(normalize.clone());
            format!("{}[seg]", chain.join(","))
        } else {
            format!(
                "anullsrc=r={}:cl=stereo,atrim=end={:.6},{}[seg]",
                self.audio.sample_rate, video_duration, normalize
            )
        };

        let background = format!(
            "[1:a:0]atrim=end={:.6},asetpts=PTS-STARTPTS,volume={:.4},{}[bg]",
            video_duration, self.audio.music_volume, normalize
        );

        let combine = match self.audio.mix_mode {
            MixMode::Concatenate => "[seg][bg]concat=n=2:v=0:a=1[aout]".to_string(),
            MixMode::Overlay => {
                "[seg][bg]amix=inputs=2:duration=first:dropout_transition=0,volume=2[aout]".to_string()
            }
        };

        format!("{};{};{}", original, background, combine)
    }

    fn render_args(
        &self,
        source: &SourceVideo,
        segment: &Segment,
        music: &SourceAudio,
        graph: &str,
        target: &Path,
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
            "-stream_loop".into(),
            "-1".into(),
            "-i".into(),
            music.path.display().to_string(),
            "-filter_complex".into(),
            graph.to_string(),
            "-map".into(),
            "[aout]".into(),
            "-vn".into(),
            "-c:a".into(),
            self.output.audio_codec.clone(),
        ];

        if !self.output.audio_bitrate.is_empty() {
            args.push("-b:a".into());
            args.push(self.output.audio_bitrate.clone());
        }

        args.push(target.display().to_string());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolsConfig;

    fn configs(mode: MixMode) -> (FfmpegTools, AudioConfig, OutputConfig) {
        let audio = AudioConfig {
            mix_mode: mode,
            ..AudioConfig::default()
        };
        (FfmpegTools::new(&ToolsConfig::default()), audio, OutputConfig::default())
    }

    #[test]
    fn test_concatenate_graph() {
        let (tools, audio, output) = configs(MixMode::Concatenate);
        let mixer = AudioMixer::new(&tools, &audio, &output);

        let graph = mixer.filter_graph(true, &["atempo=1.010000".to_string()], 19.8);
        assert!(graph.starts_with(
            "[0:a:0]asetpts=PTS-STARTPTS,atempo=1.010000,apad,atrim=end=19.800000,volume=0.1000,"
        ));
        assert!(graph.contains("[1:a:0]atrim=end=19.800000,asetpts=PTS-STARTPTS,volume=1.0000,"));
        assert!(graph.ends_with("[seg][bg]concat=n=2:v=0:a=1[aout]"));
    }

    #[test]
    fn test_overlay_graph() {
        let (tools, audio, output) = configs(MixMode::Overlay);
        let mixer = AudioMixer::new(&tools, &audio, &output);

        let graph = mixer.filter_graph(true, &[], 20.0);
        assert!(graph.contains("amix=inputs=2:duration=first"));
        assert!(!graph.contains("concat"));
    }

    #[test]
    fn test_short_source_audio_is_padded_before_trim() {
        let (tools, audio, output) = configs(MixMode::Overlay);
        let mixer = AudioMixer::new(&tools, &audio, &output);

        let graph = mixer.filter_graph(true, &[], 20.0);
        let seg = graph.split(';').next().unwrap();
        let pad = seg.find("apad").unwrap();
        let trim = seg.find("atrim=end=20.000000").unwrap();
        assert!(pad < trim);
        assert!(seg.ends_with("[seg]"));
    }

    #[test]
    fn test_silent_source_uses_null_audio() {
        let (tools, audio, output) = configs(MixMode::Concatenate);
        let mixer = AudioMixer::new(&tools, &audio, &output);

        let graph = mixer.filter_graph(false, &["atempo=1.000000".to_string()], 20.0);
        assert!(graph.starts_with("anullsrc=r=44100:cl=stereo,atrim=end=20.000000"));
        assert!(!graph.contains("[0:a:0]"));
    }

    #[test]
    fn test_render_args_loop_background() {
        let (tools, audio, output) = configs(MixMode::Concatenate);
        let mixer = AudioMixer::new(&tools, &audio, &output);
        let source = crate::transforms::test_source();
        let music = SourceAudio {
            path: "bg_music.mp3".into(),
            duration: 5.0,
            sample_rate: None,
            channels: None,
            format: crate::audio::AudioFormat {
                extension: "mp3".to_string(),
                codec: None,
            },
        };

        let args = mixer.render_args(
            &source,
            &Segment::new(3.5, 20.0),
            &music,
            "graph",
            Path::new("/tmp/out.m4a"),
        );

        let loop_pos = args.iter().position(|a| a == "-stream_loop").unwrap();
        assert_eq!(args[loop_pos + 1], "-1");
        assert_eq!(args[loop_pos + 3], "bg_music.mp3");
        assert!(args.windows(2).any(|w| w[0] == "-ss" && w[1] == "3.500000"));
        assert!(args.windows(2).any(|w| w[0] == "-t" && w[1] == "20.000000"));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/out.m4a"));
    }
}
