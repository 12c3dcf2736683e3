//! Cryptographically-seeded session id sampling.
//!
//! Session ids are generated by the initiating client, not assigned by the
//! server (the server admits whatever id arrives with the first `REQ`), so
//! this lives here rather than in a server-only crate.

use rand::RngCore;
use thiserror::Error;

/// Errors from [`generate_session_id`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionIdError {
    /// `min > max`.
    #[error("invalid range: {min} > {max}")]
    InvalidRange {
        /// Requested lower bound.
        min: i64,
        /// Requested upper bound.
        max: i64,
    },
}

/// Sample a uniform integer in the inclusive range `[min, max]` from `rng`.
///
/// # Errors
/// [`SessionIdError::InvalidRange`] if `min > max`.
pub fn generate_session_id(
    min: i64,
    max: i64,
    rng: &mut dyn RngCore,
) -> Result<i64, SessionIdError> {
    if min > max {
        return Err(SessionIdError::InvalidRange { min, max });
    }
    let span = (max - min) as u64 + 1;
    let offset = rng.next_u64() % span;
    Ok(min + offset as i64)
}
