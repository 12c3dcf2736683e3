use bytes::Bytes;
use proptest::prelude::*;
use sessionlink_core::buffer::ReassemblyBuffer;
use sessionlink_core::error::BufferError;
use sessionlink_proto::packet::{Packet, BUFFER_SIZE};
use sessionlink_proto::state::State;

fn fragment(begin: i64, end: i64, payload: Vec<u8>) -> Packet {
    Packet {
        session_id: 1,
        user_id: 1,
        msg_code: State::Ali,
        packet_id: 0,
        frame_begin: begin,
        frame_end: end,
        payload_length: payload.len() as i64,
        payload: Bytes::from(payload),
        remote_addr: None,
    }
}

proptest! {
    #[test]
    fn any_in_bounds_fragment_writes_to_its_declared_range(
        begin in 0usize..BUFFER_SIZE,
        len in 1usize..64,
        fill in any::<u8>(),
    ) {
        let end = begin + len - 1;
        prop_assume!(end < BUFFER_SIZE);
        let payload = vec![fill; len];
        let mut buf = ReassemblyBuffer::new();
        buf.write(&fragment(begin as i64, end as i64, payload.clone())).expect("in-range write succeeds");
        prop_assert_eq!(buf.size(), end + 1);
        prop_assert_eq!(&buf.contents()[begin..=end], payload.as_slice());
    }

    #[test]
    fn any_fragment_ending_past_buffer_size_is_rejected(
        begin in 0i64..(BUFFER_SIZE as i64),
        overshoot in 0i64..1024,
        len in 1usize..64,
    ) {
        let end = BUFFER_SIZE as i64 + overshoot;
        let payload = vec![0u8; len];
        let mut buf = ReassemblyBuffer::new();
        let err = buf.write(&fragment(begin, end, payload)).unwrap_err();
        prop_assert_eq!(err, BufferError::RangeOutOfBounds { begin, end });
    }

    #[test]
    fn any_inverted_range_is_rejected(
        begin in 1i64..(BUFFER_SIZE as i64),
        back in 1i64..1024,
    ) {
        let end = (begin - back).max(0) - 1;
        prop_assume!(end < begin);
        let mut buf = ReassemblyBuffer::new();
        let err = buf.write(&fragment(begin, end, vec![0u8; 1])).unwrap_err();
        prop_assert_eq!(err, BufferError::RangeOutOfBounds { begin, end });
    }

    #[test]
    fn any_length_mismatch_is_rejected(
        begin in 0usize..BUFFER_SIZE,
        len in 2usize..64,
        short_by in 1usize..2,
    ) {
        let end = begin + len - 1;
        prop_assume!(end < BUFFER_SIZE);
        let payload = vec![0u8; len - short_by];
        let mut buf = ReassemblyBuffer::new();
        let err = buf.write(&fragment(begin as i64, end as i64, payload)).unwrap_err();
        prop_assert_eq!(err, BufferError::LengthMismatch { expected: len, actual: len - short_by });
    }
}
