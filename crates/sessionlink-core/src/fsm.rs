//! Session finite state machine.
//!
//! [`step`] is pure over `(session.state, inbound packet)` apart from the
//! side effects called out on [`Session`]: `state`, `last_received`, and
//! (on admission) `data_size`. It never performs I/O; callers encode and
//! send the returned packet themselves.

use sessionlink_proto::packet::BUFFER_SIZE;
use sessionlink_proto::state::State;
use sessionlink_proto::Packet;

use crate::buffer::ReassemblyBuffer;
use crate::session::Session;

/// Drive `session` one step with a validated inbound `packet`.
///
/// Returns the response packet to send, if any. Assumes `packet` already
/// passed [`crate::validator::validate`] against `session`.
pub fn step<I: Clone>(session: &mut Session<I>, packet: &Packet, now: I) -> Option<Packet> {
    session.record_inbound(now.clone());

    let next_and_response = match session.state {
        State::Req if packet.msg_code == State::Req => admit(session, packet),
        State::Opn if packet.msg_code == State::Opn => (State::Ack, Some(State::Ack)),
        State::Ack if packet.msg_code == State::Ali => {
            session.reassembly = ReassemblyBuffer::new();
            (State::Ali, Some(State::Ali))
        },
        State::Ali => from_ali(packet.msg_code),
        State::Rty => match packet.msg_code {
            State::Ack => (State::Ali, Some(State::Ali)),
            _ => (State::Err, Some(State::Err)),
        },
        State::Fin => match packet.msg_code {
            State::Opn => (State::Opn, Some(State::Opn)),
            _ => (State::Cld, Some(State::Cld)),
        },
        State::Err => match packet.msg_code {
            State::Opn => (State::Opn, Some(State::Opn)),
            _ => (State::Err, Some(State::Err)),
        },
        State::Cld => (State::Cld, None),
        _ => (State::Err, Some(State::Err)),
    };

    let (next_state, response_code) = next_and_response;
    session.state = next_state;

    let response = response_code.map(|code| packet.reply(code));
    if response.is_some() {
        session.record_outbound(now);
    }
    response
}

/// `REQ`→`REQ` admission: a payload that doesn't fit in one reassembly
/// window is rejected before the session is ever opened.
fn admit<I>(session: &mut Session<I>, packet: &Packet) -> (State, Option<State>) {
    if packet.payload_length >= BUFFER_SIZE as i64 {
        return (State::Err, Some(State::Err));
    }
    session.data_size = packet.payload_length;
    (State::Opn, Some(State::Opn))
}

/// Side paths out of `ALI`, in priority order `RTY > FIN > CLD >
/// keepalive-silent > ERR`.
fn from_ali(inbound: State) -> (State, Option<State>) {
    match inbound {
        State::Rty => (State::Rty, Some(State::Rty)),
        State::Fin => (State::Fin, Some(State::Fin)),
        State::Cld => (State::Cld, Some(State::Cld)),
        State::Ali => (State::Ali, None),
        _ => (State::Err, Some(State::Err)),
    }
}
