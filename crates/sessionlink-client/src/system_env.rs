//! Production [`Environment`] using system time and OS randomness.

use std::time::Duration;

use sessionlink_core::env::Environment;

/// Production environment: real wall-clock time and OS-level cryptographic
/// randomness.
///
/// # Panics
/// `random_bytes` panics if the OS RNG fails.
#[derive(Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Build a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    type Instant = std::time::Instant;

    #[allow(clippy::disallowed_methods)]
    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }

    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer).expect("OS RNG failure is unrecoverable");
    }
}

/// Lets [`SystemEnv`] seed `rand`-based samplers (e.g.
/// [`sessionlink_core::session_id::generate_session_id`]) from the same OS
/// randomness source backing [`Environment::random_bytes`].
impl rand::RngCore for SystemEnv {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.random_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.random_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.random_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.random_bytes(dest);
        Ok(())
    }
}
