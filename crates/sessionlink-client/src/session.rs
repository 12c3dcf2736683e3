//! Client-side session driver.
//!
//! The session FSM in `sessionlink-core` models one side of the handshake:
//! the acceptor, which replies to an inbound code with the next code in the
//! sequence. The initiator drives that acceptor forward by sending back
//! exactly the code it needs to see next — for `REQ` and `OPN` that's an
//! echo of what it just received, and for `ACK` it's a bump straight to
//! `ALI` (nothing ever sends `ACK` as an inbound code). This mirrors the
//! same state names without re-running the acceptor's table locally.

use bytes::Bytes;
use sessionlink_core::env::Environment;
use sessionlink_core::session::Session;
use sessionlink_proto::state::State;
use sessionlink_proto::Packet;

/// Drives one client-side session through the handshake, transfer, and
/// teardown states.
pub struct ClientSession<E: Environment> {
    session: Session<E::Instant>,
    env: E,
}

impl<E: Environment> ClientSession<E> {
    /// Start a new client session with `session_id`, not yet sent.
    #[must_use]
    pub fn new(session_id: i64, env: E) -> Self {
        let now = env.now();
        Self { session: Session::new(session_id, now), env }
    }

    /// Build the initial `REQ` packet carrying `payload` as the declared
    /// transfer. Session state stays `REQ` until the server's reply comes
    /// back through [`ClientSession::on_datagram`].
    #[must_use]
    pub fn initial_request(&self, user_id: i64, payload: Bytes) -> Packet {
        let len = payload.len() as i64;
        Packet {
            session_id: self.session.id,
            user_id,
            msg_code: State::Req,
            packet_id: 0,
            frame_begin: 0,
            frame_end: (len - 1).max(0),
            payload_length: len,
            payload,
            remote_addr: None,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> State {
        self.session.state
    }

    /// Drive an inbound packet, returning the packet to echo back, if any.
    ///
    /// Returns `None` once the handshake has reached the steady `ALI`
    /// keepalive state and the peer's `ALI` needs no further reply, or once
    /// the session has reached `CLD`.
    pub fn on_datagram(&mut self, inbound: &Packet) -> Option<Packet> {
        if inbound.session_id != self.session.id {
            tracing::warn!(
                expected = self.session.id,
                got = inbound.session_id,
                "dropping packet for a different session"
            );
            return None;
        }

        let now = self.env.now();
        self.session.record_inbound(now.clone());

        if inbound.msg_code == State::Cld {
            self.session.state = State::Cld;
            return None;
        }

        let was_steady_ali = self.session.state == State::Ali;
        let reply_code = if inbound.msg_code == State::Ack { State::Ali } else { inbound.msg_code };
        self.session.state = reply_code;

        if inbound.msg_code == State::Ali && was_steady_ali {
            return None;
        }

        self.session.record_outbound(now);
        Some(inbound.reply(reply_code))
    }

    /// Build a `FIN` packet to begin teardown unprompted.
    #[must_use]
    pub fn teardown(&mut self) -> Packet {
        self.session.state = State::Fin;
        Packet {
            session_id: self.session.id,
            user_id: 0,
            msg_code: State::Fin,
            packet_id: 0,
            frame_begin: 0,
            frame_end: 0,
            payload_length: 0,
            payload: Bytes::new(),
            remote_addr: None,
        }
    }
}
