//! Simulator error types.

use thiserror::Error;

/// Errors raised by the link simulator's port registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// `listen`/`dial` was called with an address already bound.
    #[error("address already in use: {0}")]
    AddressInUse(String),

    /// A send targeted an address with no registered listener.
    #[error("no such peer: {0}")]
    NoSuchPeer(String),

    /// The port was closed.
    #[error("port closed")]
    Closed,
}
