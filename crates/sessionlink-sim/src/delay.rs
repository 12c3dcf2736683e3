//! Delay sampling for the configured jitter distribution.

use std::time::Duration;

use rand::RngCore;
use rand_distr::{Distribution, Normal};

use crate::config::{Jitter, LinkConfig};

fn clip(nanos: f64, min_nanos: f64, max_nanos: f64) -> f64 {
    nanos.clamp(min_nanos, max_nanos)
}

/// Sample one delay from `config`'s jitter distribution, clipped to
/// `[config.min_delay, config.max_delay]`.
pub fn sample_delay(config: &LinkConfig, rng: &mut dyn RngCore) -> Duration {
    let min_nanos = config.min_delay.as_nanos() as f64;
    let max_nanos = config.max_delay.as_nanos() as f64;
    if max_nanos <= min_nanos {
        return config.min_delay;
    }

    let nanos = match config.jitter {
        Jitter::Uniform => {
            let span = max_nanos - min_nanos;
            min_nanos + (rng.next_u64() as f64 / u64::MAX as f64) * span
        },
        Jitter::Normal { std_dev } => {
            let mean = (min_nanos + max_nanos) / 2.0;
            let std_dev_nanos = (std_dev.as_nanos() as f64).max(1.0);
            #[allow(clippy::expect_used)]
            let normal = Normal::new(mean, std_dev_nanos).expect("mean finite, std_dev > 0");
            normal.sample(&mut RandCoreAdapter(rng))
        },
        Jitter::Exponential { mean } => {
            let lambda = 1.0 / mean.as_nanos().max(1) as f64;
            let u: f64 = 1.0 - (rng.next_u64() as f64 / u64::MAX as f64);
            -u.ln() / lambda
        },
    };

    Duration::from_nanos(clip(nanos, min_nanos, max_nanos) as u64)
}

/// Adapts `&mut dyn RngCore` to `rand::Rng` for `rand_distr::Distribution::sample`.
struct RandCoreAdapter<'a>(&'a mut dyn RngCore);

impl rand::RngCore for RandCoreAdapter<'_> {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn uniform_delay_stays_in_range() {
        let config = LinkConfig::default().with_delay(
            Duration::from_millis(10),
            Duration::from_millis(100),
            Jitter::Uniform,
        );
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..100 {
            let delay = sample_delay(&config, &mut rng);
            assert!(delay >= Duration::from_millis(10));
            assert!(delay <= Duration::from_millis(100));
        }
    }

    #[test]
    fn exponential_delay_stays_in_range() {
        let config = LinkConfig::default().with_delay(
            Duration::from_millis(0),
            Duration::from_millis(50),
            Jitter::Exponential { mean: Duration::from_millis(10) },
        );
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            let delay = sample_delay(&config, &mut rng);
            assert!(delay <= Duration::from_millis(50));
        }
    }

    #[test]
    fn zero_span_returns_min_delay() {
        let config = LinkConfig::default().with_delay(
            Duration::from_millis(5),
            Duration::from_millis(5),
            Jitter::Uniform,
        );
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(sample_delay(&config, &mut rng), Duration::from_millis(5));
    }
}
