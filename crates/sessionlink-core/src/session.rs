//! Per-peer session record.

use sessionlink_proto::state::State;

use crate::buffer::ReassemblyBuffer;

/// One peer's session state, generic over the timestamp type so it can run
/// under either a production clock or a deterministic test clock (see
/// [`crate::env::Environment`]).
pub struct Session<I> {
    /// Unique session identifier, assigned at creation.
    pub id: i64,
    /// Current FSM state.
    pub state: State,
    /// Peer address, if known.
    pub remote_addr: Option<String>,
    /// Reassembly window for the frame currently in flight.
    pub reassembly: ReassemblyBuffer,
    /// Declared size of the data transfer, set on admission (`REQ`→`OPN`).
    pub data_size: i64,
    /// When the session was created.
    pub created_at: I,
    /// Timestamp of the last packet received.
    pub last_received: I,
    /// Timestamp of the last packet sent.
    pub last_send: Option<I>,
    packages_received: u64,
}

impl<I: Clone> Session<I> {
    /// A fresh session in state [`State::Req`].
    #[must_use]
    pub fn new(id: i64, now: I) -> Self {
        Self {
            id,
            state: State::Req,
            remote_addr: None,
            reassembly: ReassemblyBuffer::new(),
            data_size: 0,
            created_at: now.clone(),
            last_received: now,
            last_send: None,
            packages_received: 0,
        }
    }

    /// How many validated inbound packets have been routed to this session.
    #[must_use]
    pub fn packages_received(&self) -> u64 {
        self.packages_received
    }

    pub(crate) fn record_inbound(&mut self, now: I) {
        self.packages_received += 1;
        self.last_received = now;
    }

    pub(crate) fn record_outbound(&mut self, now: I) {
        self.last_send = Some(now);
    }
}
