//! Transport-agnostic datagram port.
//!
//! The dispatcher speaks to this trait, not to a socket directly, so the
//! same dispatch logic runs against a real UDP socket or against
//! `sessionlink-sim`'s in-process unreliable link.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Errors a [`DatagramPort`] implementation can report.
#[derive(Error, Debug)]
pub enum PortError {
    /// The configured read or write deadline elapsed before the operation
    /// completed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The port was closed, locally or by the peer going away.
    #[error("port closed")]
    Closed,

    /// Any other I/O failure, carried as text so this crate doesn't need to
    /// depend on `std::io` error internals or a particular runtime.
    #[error("transport error: {0}")]
    Io(String),
}

/// One endpoint of an unreliable datagram link: a real UDP socket or a
/// simulated one.
#[async_trait]
pub trait DatagramPort: Send + Sync {
    /// Send `bytes` to `peer_addr`.
    async fn send(&self, bytes: &[u8], peer_addr: &str) -> Result<(), PortError>;

    /// Receive the next datagram, or fail once `read_deadline` (if any)
    /// elapses.
    async fn recv(&self) -> Result<(Bytes, String), PortError>;

    /// Set the deadline applied to subsequent [`DatagramPort::recv`] calls.
    /// `None` disables the deadline.
    fn set_read_deadline(&self, deadline: Option<Duration>);

    /// Set the deadline applied to subsequent [`DatagramPort::send`] calls.
    /// `None` disables the deadline.
    fn set_write_deadline(&self, deadline: Option<Duration>);

    /// Close the port. Already-scheduled deliveries to it are discarded.
    async fn close(&self);
}
