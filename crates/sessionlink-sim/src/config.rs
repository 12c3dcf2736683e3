//! Link simulator configuration.

use std::time::Duration;

/// Jitter distribution applied to each scheduled delivery's delay, clipped
/// to `[min_delay, max_delay]`.
#[derive(Debug, Clone, Copy)]
pub enum Jitter {
    /// Uniform over `[min_delay, max_delay]`.
    Uniform,
    /// Normal, centered on `max_delay / 2`, with the given standard
    /// deviation, clipped to `[min_delay, max_delay]`.
    Normal {
        /// Standard deviation.
        std_dev: Duration,
    },
    /// Exponential with the given mean, clipped to `[min_delay, max_delay]`.
    Exponential {
        /// Mean delay.
        mean: Duration,
    },
}

/// Configuration for one [`crate::link::LinkSimulator`].
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Lower bound on delivery delay.
    pub min_delay: Duration,
    /// Upper bound on delivery delay.
    pub max_delay: Duration,
    /// Probability in `[0.0, 1.0]` that a send is dropped entirely.
    pub loss_prob: f64,
    /// Probability that a send is delivered twice.
    pub dup_prob: f64,
    /// Probability that a copy is buffered for reordering instead of
    /// scheduled immediately.
    pub reorder_prob: f64,
    /// Maximum number of copies held in the reorder buffer before it is
    /// flushed in shuffled order.
    pub reorder_buffer_cap: usize,
    /// Delay distribution shape.
    pub jitter: Jitter,
    /// Maximum number of deliveries in flight at once; `0` means unlimited.
    pub bandwidth_limit: usize,
}

impl Default for LinkConfig {
    /// A link with no impairments: zero loss/duplication/reordering and
    /// zero delay.
    fn default() -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            loss_prob: 0.0,
            dup_prob: 0.0,
            reorder_prob: 0.0,
            reorder_buffer_cap: 0,
            jitter: Jitter::Uniform,
            bandwidth_limit: 0,
        }
    }
}

impl LinkConfig {
    /// Builder-style setter for loss probability.
    #[must_use]
    pub fn with_loss(mut self, prob: f64) -> Self {
        self.loss_prob = prob;
        self
    }

    /// Builder-style setter for duplication probability.
    #[must_use]
    pub fn with_duplication(mut self, prob: f64) -> Self {
        self.dup_prob = prob;
        self
    }

    /// Builder-style setter for reorder probability and buffer capacity.
    #[must_use]
    pub fn with_reordering(mut self, prob: f64, buffer_cap: usize) -> Self {
        self.reorder_prob = prob;
        self.reorder_buffer_cap = buffer_cap;
        self
    }

    /// Builder-style setter for the delay range and jitter shape.
    #[must_use]
    pub fn with_delay(mut self, min: Duration, max: Duration, jitter: Jitter) -> Self {
        self.min_delay = min;
        self.max_delay = max;
        self.jitter = jitter;
        self
    }

    /// Builder-style setter for the bandwidth (in-flight) limit.
    #[must_use]
    pub fn with_bandwidth_limit(mut self, limit: usize) -> Self {
        self.bandwidth_limit = limit;
        self
    }
}
