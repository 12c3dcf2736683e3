//! Fuzz target for `sessionlink_proto::decode`.
//!
//! Decoding untrusted wire bytes should never panic, only return `Err` for
//! malformed input.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else { return };
    let _ = sessionlink_proto::decode(text);
});
