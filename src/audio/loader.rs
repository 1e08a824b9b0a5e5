use std::fs::File;
use std::path::Path;

use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::audio::types::{AudioFormat, SourceAudio};
use crate::error::{LoadError, Result};

/// Background-audio loader
///
/// Reads container and codec headers with Symphonia; no samples are decoded,
/// since the transcoder does the actual mixing.
pub struct AudioLoader;

impl AudioLoader {
    /// Open an audio file and measure its duration
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<SourceAudio> {
        let path = path.as_ref();
        let open_failed = |reason: String| LoadError::MediaOpen {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|e| open_failed(e.to_string()))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // Create a probe hint using the file extension
        let mut hint = Hint::new();
        if let Some(extension) = Self::detect_format(path) {
            hint.with_extension(&extension);
        }

        let meta_opts: MetadataOptions = Default::default();
        let fmt_opts: FormatOptions = Default::default();

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &fmt_opts, &meta_opts)
            .map_err(|e| open_failed(e.to_string()))?;

        let mut format = probed.format;

        // Find the first audio track with a known (decodable) codec
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| open_failed("no decodable audio track".to_string()))?;

        let track_id = track.id;
        let params = track.codec_params.clone();

        let sample_rate = params.sample_rate;
        let channels = params.channels.map(|c| c.count() as u16);
        let codec = symphonia::default::get_codecs()
            .get_codec(params.codec)
            .map(|descriptor| descriptor.short_name.to_string());

        let duration = match (params.n_frames, params.time_base, sample_rate) {
            (Some(frames), Some(time_base), _) => {
                let time = time_base.calc_time(frames);
                time.seconds as f64 + time.frac
            }
            (Some(frames), None, Some(rate)) => frames as f64 / rate as f64,
            _ => {
                debug!("No frame count in {} header, scanning packets", path.display());
                Self::scan_duration(format.as_mut(), track_id, &params)
                    .ok_or_else(|| LoadError::InvalidMetadata {
                        path: path.to_path_buf(),
                        details: "unknown duration".to_string(),
                    })?
            }
        };

        if !(duration.is_finite() && duration > 0.0) {
            return Err(LoadError::InvalidMetadata {
                path: path.to_path_buf(),
                details: format!("duration {}", duration),
            }
            .into());
        }

        Ok(SourceAudio {
            path: path.to_path_buf(),
            duration,
            sample_rate,
            channels,
            format: AudioFormat {
                extension: Self::detect_format(path).unwrap_or_else(|| "unknown".to_string()),
                codec,
            },
        })
    }

    /// Sum packet durations of `track_id` until the end of the stream
    fn scan_duration(
        format: &mut dyn FormatReader,
        track_id: u32,
        params: &symphonia::core::codecs::CodecParameters,
    ) -> Option<f64> {
        let mut total_ts: u64 = 0;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::ResetRequired) => continue,
                Err(_) => break,
            };

            if packet.track_id() == track_id {
                total_ts += packet.dur();
            }
        }

        if total_ts == 0 {
            return None;
        }

        match (params.time_base, params.sample_rate) {
            (Some(time_base), _) => {
                let time = time_base.calc_time(total_ts);
                Some(time.seconds as f64 + time.frac)
            }
            (None, Some(rate)) => Some(total_ts as f64 / rate as f64),
            _ => None,
        }
    }

    /// Detect audio format from file extension
    pub fn detect_format<P: AsRef<Path>>(path: P) -> Option<String> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_tone(path: &Path, seconds: f64, sample_rate: u32, channels: u16) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        let frames = (seconds * sample_rate as f64) as usize;
        for i in 0..frames {
            let t = i as f64 / sample_rate as f64;
            let sample = ((t * 440.0 * std::f64::consts::TAU).sin() * 8000.0) as i16;
            for _ in 0..channels {
                writer.write_sample(sample).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(AudioLoader::detect_format("bg_music.mp3"), Some("mp3".to_string()));
        assert_eq!(AudioLoader::detect_format("track.WAV"), Some("wav".to_string()));
        assert_eq!(AudioLoader::detect_format("track"), None);
    }

    #[tokio::test]
    async fn test_wav_duration() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("bg.wav");
        write_tone(&path, 2.5, 22050, 2);

        let audio = AudioLoader::load(&path).await.unwrap();
        assert!((audio.duration - 2.5).abs() < 0.01);
        assert_eq!(audio.sample_rate, Some(22050));
        assert_eq!(audio.channels, Some(2));
        assert_eq!(audio.format.extension, "wav");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let temp_dir = tempdir().unwrap();
        let result = AudioLoader::load(temp_dir.path().join("nothing.mp3")).await;

        assert!(matches!(
            result,
            Err(crate::EditorError::Load(LoadError::MediaOpen { .. }))
        ));
    }

    #[tokio::test]
    async fn test_garbage_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("noise.mp3");
        let mut file = File::create(&path).unwrap();
        file.write_all(&[0u8; 64]).unwrap();

        assert!(AudioLoader::load(&path).await.is_err());
    }
}
