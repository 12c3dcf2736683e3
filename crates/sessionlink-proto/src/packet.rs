//! The `Packet` wire record (see the workspace's codec module for the
//! on-the-wire text form).

use bytes::Bytes;

use crate::state::State;

/// Fixed reassembly window size shared by every session.
pub const BUFFER_SIZE: usize = 1024;

/// Upper bound on one packet's encoded wire size.
///
/// `BUFFER_SIZE` raw payload bytes base64-inflate to `((BUFFER_SIZE + 2) / 3)
/// * 4` bytes, plus the nine `Key:` field labels and pipe delimiters, plus a
/// percent-escaped `Rma` address (each reserved byte can triple in size).
/// Datagram ports must size their receive buffer to at least this, not to
/// `BUFFER_SIZE` — that constant bounds the decoded payload, not the wire
/// form.
pub const MAX_WIRE_SIZE: usize = 2048;

/// A decoded protocol packet, identical in shape on the inbound and outbound
/// path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Session this packet belongs to.
    pub session_id: i64,
    /// Opaque peer identifier, carried through unexamined.
    pub user_id: i64,
    /// Control code.
    pub msg_code: State,
    /// Fragment index within the frame.
    pub packet_id: i64,
    /// Inclusive start offset into the reassembly window.
    pub frame_begin: i64,
    /// Inclusive end offset into the reassembly window.
    pub frame_end: i64,
    /// Declared payload length; must equal `payload.len()`.
    pub payload_length: i64,
    /// Fragment bytes.
    pub payload: Bytes,
    /// Peer address, textual form (`host:port`), if present.
    pub remote_addr: Option<String>,
}

impl Packet {
    /// Build a response packet mirroring the fields the FSM specifies for
    /// replies: `session_id`, `packet_id`, `frame_end`, `payload_length` are
    /// copied from `self`, `frame_begin` becomes `self.packet_id`, and the
    /// response carries no payload bytes of its own (control packets only).
    #[must_use]
    pub fn reply(&self, msg_code: State) -> Self {
        Self {
            session_id: self.session_id,
            user_id: self.user_id,
            msg_code,
            packet_id: self.packet_id,
            frame_begin: self.packet_id,
            frame_end: self.frame_end,
            payload_length: self.payload_length,
            payload: Bytes::new(),
            remote_addr: None,
        }
    }
}
