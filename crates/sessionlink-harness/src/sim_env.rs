//! Deterministic [`Environment`] for scenario tests.
//!
//! Time comes from tokio's paused virtual clock (`#[tokio::test(start_paused
//! = true)]`), the same clock `sessionlink-sim`'s delay scheduling already
//! runs on, so a test can advance time and the link's in-flight deliveries
//! together. Randomness is seeded for reproducible session ids.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sessionlink_core::env::Environment;

/// Seeded, virtual-time environment for deterministic scenario tests.
#[derive(Clone)]
pub struct SimEnv {
    rng: Arc<Mutex<ChaCha8Rng>>,
}

impl SimEnv {
    /// Build an environment seeded from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))) }
    }
}

impl Environment for SimEnv {
    type Instant = tokio::time::Instant;

    fn now(&self) -> Self::Instant {
        tokio::time::Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        self.rng.lock().expect("rng mutex poisoned").fill_bytes(buffer);
    }
}
