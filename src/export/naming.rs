use std::path::{Path, PathBuf};

use rand::Rng;

use crate::{config::OutputConfig, video::types::Segment};

/// Builds `{prefix}_{start}_{nnn}.{ext}` output names
///
/// The three-digit suffix keeps repeated runs on the same segment apart most
/// of the time; it does not guarantee uniqueness.
#[derive(Debug, Clone)]
pub struct OutputNamer {
    prefix: String,
    extension: String,
}

impl OutputNamer {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            prefix: config.file_prefix.clone(),
            extension: config.extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn file_name<R: Rng + ?Sized>(&self, segment: &Segment, rng: &mut R) -> String {
        let suffix: u16 = rng.gen_range(100..=999);
        format!(
            "{}_{}_{}.{}",
            self.prefix,
            segment.start_seconds(),
            suffix,
            self.extension
        )
    }

    pub fn output_path<R: Rng + ?Sized>(&self, directory: &Path, segment: &Segment, rng: &mut R) -> PathBuf {
        directory.join(self.file_name(segment, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    /// Split `clip_edited_<int>_<nnn>.mp4` into its two numbers
    fn parse_name(name: &str) -> Option<(u64, u16)> {
        let stem = name.strip_prefix("clip_edited_")?.strip_suffix(".mp4")?;
        let (start, suffix) = stem.split_once('_')?;
        if suffix.len() != 3 || !suffix.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some((start.parse().ok()?, suffix.parse().ok()?))
    }

    #[test]
    fn test_name_pattern() {
        let namer = OutputNamer::new(&OutputConfig::default());
        let mut rng = SmallRng::seed_from_u64(9);

        for start in [0.0, 0.99, 7.5, 123.999] {
            let segment = Segment::new(start, 20.0);
            let name = namer.file_name(&segment, &mut rng);
            let (embedded, suffix) = parse_name(&name).expect("name should match pattern");

            assert_eq!(embedded, start.floor() as u64);
            assert!((100..=999).contains(&suffix));
        }
    }

    #[test]
    fn test_extension_dot_is_optional() {
        let config = OutputConfig {
            extension: ".mkv".to_string(),
            ..OutputConfig::default()
        };
        let namer = OutputNamer::new(&config);
        let name = namer.file_name(&Segment::new(4.2, 20.0), &mut SmallRng::seed_from_u64(0));

        assert!(name.starts_with("clip_edited_4_"));
        assert!(name.ends_with(".mkv"));
        assert!(!name.contains(".."));
    }

    #[test]
    fn test_output_path_joins_directory() {
        let namer = OutputNamer::new(&OutputConfig::default());
        let path = namer.output_path(
            Path::new("output_clips"),
            &Segment::new(1.0, 20.0),
            &mut SmallRng::seed_from_u64(5),
        );
        assert_eq!(path.parent(), Some(Path::new("output_clips")));
    }
}
