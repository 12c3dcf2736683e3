//! Packet validation against a session's current state.

use sessionlink_proto::packet::BUFFER_SIZE;
use sessionlink_proto::state::State;
use sessionlink_proto::Packet;

use crate::error::ValidationError;
use crate::session::Session;

/// Validate an inbound packet against `session` before handing it to the
/// FSM. Checks run in a fixed order so the first violation reported is
/// deterministic.
///
/// # Errors
/// A [`ValidationError`] naming the first rule violated.
pub fn validate<I>(session: &Session<I>, packet: &Packet) -> Result<(), ValidationError> {
    if packet.session_id < 0 {
        return Err(ValidationError::new(
            "wrong session id",
            0,
            packet.session_id,
            packet.packet_id,
        ));
    }

    if packet.msg_code != State::Req && packet.session_id != session.id {
        return Err(ValidationError::new(
            "wrong session id",
            session.id,
            packet.session_id,
            packet.packet_id,
        ));
    }

    if packet.msg_code != session.state && packet.msg_code != State::Rty && packet.msg_code != State::Err
    {
        return Err(ValidationError::new(
            "illegal packet state",
            i64::from(session.state.code()),
            i64::from(packet.msg_code.code()),
            packet.packet_id,
        ));
    }

    if packet.packet_id < 0 {
        return Err(ValidationError::new("illegal packet id", 0, packet.packet_id, packet.packet_id));
    }

    let buffer_size = BUFFER_SIZE as i64;

    if packet.frame_begin < 0 || packet.frame_begin > buffer_size {
        return Err(ValidationError::new(
            "frame begin out of range",
            0,
            packet.frame_begin,
            packet.packet_id,
        ));
    }

    if packet.frame_end < 0 || packet.frame_end > buffer_size {
        return Err(ValidationError::new(
            "frame end out of range",
            buffer_size,
            packet.frame_end,
            packet.packet_id,
        ));
    }

    if packet.payload_length < 0 || packet.payload_length > buffer_size {
        return Err(ValidationError::new(
            "invalid payload size",
            buffer_size,
            packet.payload_length,
            packet.packet_id,
        ));
    }

    if packet.payload.len() as i64 != packet.payload_length {
        return Err(ValidationError::new(
            "corrupt payload size",
            packet.payload_length,
            packet.payload.len() as i64,
            packet.packet_id,
        ));
    }

    Ok(())
}
