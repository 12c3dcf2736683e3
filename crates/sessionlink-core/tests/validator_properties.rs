use bytes::Bytes;
use proptest::prelude::*;
use sessionlink_core::env::test_instant;
use sessionlink_core::validator::validate;
use sessionlink_core::Session;
use sessionlink_proto::packet::BUFFER_SIZE;
use sessionlink_proto::state::State;
use sessionlink_proto::Packet;

fn any_non_req_state() -> impl Strategy<Value = State> {
    prop_oneof![
        Just(State::Opn),
        Just(State::Ali),
        Just(State::Cld),
        Just(State::Ack),
        Just(State::Rty),
        Just(State::Err),
        Just(State::Fin),
    ]
}

fn session_in(state: State) -> Session<()> {
    let mut s = Session::new(7, test_instant());
    s.state = state;
    s
}

fn valid_packet(session_id: i64, msg_code: State) -> Packet {
    Packet {
        session_id,
        user_id: 1,
        msg_code,
        packet_id: 0,
        frame_begin: 0,
        frame_end: 0,
        payload_length: 0,
        payload: Bytes::new(),
        remote_addr: None,
    }
}

proptest! {
    /// Any non-`REQ` packet whose session id doesn't match the session's own
    /// is rejected with "wrong session id", regardless of whether its
    /// `msg_code` would otherwise have been admissible.
    #[test]
    fn any_session_id_mismatch_on_non_req_is_rejected(
        state in any_non_req_state(),
        msg_code in any_non_req_state(),
        mismatched_id in 0i64..1_000_000,
    ) {
        prop_assume!(mismatched_id != 7);
        let session = session_in(state);
        let err = validate(&session, &valid_packet(mismatched_id, msg_code)).unwrap_err();
        prop_assert_eq!(err.text, "wrong session id");
        prop_assert_eq!(err.want, 7);
        prop_assert_eq!(err.has, mismatched_id);
    }

    /// Any out-of-range `frame_begin` is rejected with "frame begin out of
    /// range" once the session/state/packet-id checks that run first are
    /// satisfied.
    #[test]
    fn any_out_of_range_frame_begin_is_rejected(
        state in any_non_req_state(),
        frame_begin in proptest::prop_oneof![i64::MIN..0, (BUFFER_SIZE as i64 + 1)..(BUFFER_SIZE as i64 * 4)],
    ) {
        let session = session_in(state);
        let mut p = valid_packet(7, state);
        p.frame_begin = frame_begin;
        let err = validate(&session, &p).unwrap_err();
        prop_assert_eq!(err.text, "frame begin out of range");
        prop_assert_eq!(err.has, frame_begin);
    }
}
