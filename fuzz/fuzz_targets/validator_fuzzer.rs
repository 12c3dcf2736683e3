//! Fuzz target for `sessionlink_core::validator::validate`.
//!
//! Builds an arbitrary packet against an arbitrary session state; validation
//! should never panic regardless of how malformed the inputs are.

#![no_main]

use bytes::Bytes;
use libfuzzer_sys::{arbitrary, fuzz_target};
use sessionlink_core::session::Session;
use sessionlink_core::validator;
use sessionlink_proto::{Packet, State};

#[derive(Debug, arbitrary::Arbitrary)]
struct Input {
    session_id: i64,
    session_state: u8,
    packet_session_id: i64,
    msg_code: u8,
    packet_id: i64,
    frame_begin: i64,
    frame_end: i64,
    payload_length: i64,
    payload: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let Ok(msg_code) = State::from_code(i64::from(input.msg_code) % 8) else { return };
    let Ok(session_state) = State::from_code(i64::from(input.session_state) % 8) else {
        return;
    };

    let mut session = Session::new(input.session_id, 0u64);
    session.state = session_state;

    let packet = Packet {
        session_id: input.packet_session_id,
        user_id: 0,
        msg_code,
        packet_id: input.packet_id,
        frame_begin: input.frame_begin,
        frame_end: input.frame_end,
        payload_length: input.payload_length,
        payload: Bytes::from(input.payload),
        remote_addr: None,
    };

    let _ = validator::validate(&session, &packet);
});
