//! Error types for session validation and frame reassembly.

use thiserror::Error;

/// A validation failure against an inbound packet, carrying the same
/// `{text, want, has, packet_id}` shape the wire protocol's error reports
/// use.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{text} (want {want}, has {has}, packet_id {packet_id})")]
pub struct ValidationError {
    /// Human-readable rule that failed, one of the fixed strings in the
    /// packet-validator rule table.
    pub text: &'static str,
    /// Expected value (0 when there is no single expected value, e.g. a
    /// range check).
    pub want: i64,
    /// Actual value that failed the check.
    pub has: i64,
    /// `packet_id` of the offending packet.
    pub packet_id: i64,
}

impl ValidationError {
    pub(crate) fn new(text: &'static str, want: i64, has: i64, packet_id: i64) -> Self {
        Self { text, want, has, packet_id }
    }
}

/// Errors raised while writing a fragment into a [`crate::buffer::ReassemblyBuffer`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// `frame_begin`/`frame_end` fell outside `[0, BUFFER_SIZE)` or
    /// `frame_begin > frame_end`.
    #[error("frame range out of bounds: begin={begin}, end={end}")]
    RangeOutOfBounds {
        /// Offered `frame_begin`.
        begin: i64,
        /// Offered `frame_end`.
        end: i64,
    },

    /// `payload.len() != frame_end - frame_begin + 1`.
    #[error("payload length {actual} does not match declared frame span {expected}")]
    LengthMismatch {
        /// `frame_end - frame_begin + 1`.
        expected: usize,
        /// `payload.len()`.
        actual: usize,
    },
}
