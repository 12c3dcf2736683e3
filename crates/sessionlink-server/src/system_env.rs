//! Production [`Environment`] using system time and OS randomness.

use std::time::Duration;

use sessionlink_core::env::Environment;

/// Production environment: real wall-clock time and OS-level cryptographic
/// randomness.
///
/// # Panics
/// `random_bytes` panics if the OS RNG fails; a server without functioning
/// cryptographic randomness cannot safely assign session ids.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::disallowed_methods)]
    fn time_advances() {
        let env = SystemEnv::new();
        let t1 = env.now();
        std::thread::sleep(Duration::from_millis(5));
        assert!(env.now() > t1);
    }

    #[test]
    fn random_bytes_fills_buffer() {
        let env = SystemEnv::new();
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        env.random_bytes(&mut a);
        env.random_bytes(&mut b);
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn sleep_waits_at_least_requested_duration() {
        let env = SystemEnv::new();
        let start = env.now();
        env.sleep(Duration::from_millis(20)).await;
        assert!(env.now() - start >= Duration::from_millis(20));
    }
}
