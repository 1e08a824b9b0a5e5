use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::TransformConfig;

/// The factors drawn for one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformParameters {
    pub color_factor: f64,
    pub resize_factor: f64,
    pub speed_factor: f64,
}

impl TransformParameters {
    /// Draw colour and speed uniformly from their closed ranges; resize is fixed
    pub fn sample<R: Rng + ?Sized>(config: &TransformConfig, rng: &mut R) -> Self {
        let params = Self {
            color_factor: rng.gen_range(config.color_min..=config.color_max),
            resize_factor: config.resize_factor,
            speed_factor: rng.gen_range(config.speed_min..=config.speed_max),
        };

        info!("-> Color factor {:.3}", params.color_factor);
        info!("-> Resize factor {:.3}", params.resize_factor);
        info!("-> Speed factor {:.3}", params.speed_factor);

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_samples_stay_in_range() {
        let config = TransformConfig::default();
        let mut rng = SmallRng::seed_from_u64(2024);

        for _ in 0..1000 {
            let params = TransformParameters::sample(&config, &mut rng);
            assert!((0.95..=1.05).contains(&params.color_factor));
            assert!((0.98..=1.02).contains(&params.speed_factor));
            assert_eq!(params.resize_factor, 0.95);
        }
    }

    #[test]
    fn test_degenerate_range_is_constant() {
        let config = TransformConfig {
            color_min: 1.0,
            color_max: 1.0,
            speed_min: 1.0,
            speed_max: 1.0,
            ..TransformConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(3);

        let params = TransformParameters::sample(&config, &mut rng);
        assert_eq!(params.color_factor, 1.0);
        assert_eq!(params.speed_factor, 1.0);
    }

    #[test]
    fn test_runs_differ() {
        let config = TransformConfig::default();
        let first = TransformParameters::sample(&config, &mut SmallRng::seed_from_u64(1));
        let second = TransformParameters::sample(&config, &mut SmallRng::seed_from_u64(2));
        assert_ne!(first, second);
    }
}
