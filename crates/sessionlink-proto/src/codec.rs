//! Pipe-delimited `Key:Value` wire codec.
//!
//! ```text
//! Sid:<int>|Uid:<int>|Msg:<0..7>|PId:<int>|Bid:<int>|Lid:<int>|Tol:<int>|Pyl:<base64>|Rma:<escaped addr>
//! ```

use base64::Engine as _;
use bytes::Bytes;

use crate::error::CodecError;
use crate::packet::Packet;
use crate::state::State;

const FIELD_COUNT: usize = 9;
const KEYS: [&str; FIELD_COUNT] =
    ["Sid", "Uid", "Msg", "PId", "Bid", "Lid", "Tol", "Pyl", "Rma"];

fn key_index(key: &str) -> Option<usize> {
    KEYS.iter().position(|candidate| *candidate == key)
}

/// Percent-escape `%`, `:`, `|`, `-` in that order so the result never
/// contains a field or record delimiter.
#[must_use]
pub fn escape_addr(raw: &str) -> String {
    raw.replace('%', "%25")
        .replace(':', "%3A")
        .replace('|', "%7C")
        .replace('-', "%2D")
}

/// Inverse of [`escape_addr`]; `%25` is restored last so an escaped literal
/// `%` never gets re-interpreted as the start of another escape.
#[must_use]
pub fn unescape_addr(escaped: &str) -> String {
    escaped
        .replace("%3A", ":")
        .replace("%7C", "|")
        .replace("%2D", "-")
        .replace("%25", "%")
}

fn encode_field(key: &str, value: &str) -> String {
    format!("{key}:{value}")
}

/// Serialize a packet to its wire text form.
#[must_use]
pub fn encode(packet: &Packet) -> String {
    let payload_b64 = base64::engine::general_purpose::STANDARD.encode(&packet.payload);
    let addr = packet
        .remote_addr
        .as_deref()
        .map(escape_addr)
        .unwrap_or_default();

    [
        encode_field("Sid", &packet.session_id.to_string()),
        encode_field("Uid", &packet.user_id.to_string()),
        encode_field("Msg", &packet.msg_code.code().to_string()),
        encode_field("PId", &packet.packet_id.to_string()),
        encode_field("Bid", &packet.frame_begin.to_string()),
        encode_field("Lid", &packet.frame_end.to_string()),
        encode_field("Tol", &packet.payload_length.to_string()),
        encode_field("Pyl", &payload_b64),
        encode_field("Rma", &addr),
    ]
    .join("|")
}

/// Parse a packet from its wire text form.
///
/// # Errors
/// Returns a [`CodecError`] on any unknown key, duplicate key, missing
/// required key, malformed field, or field that fails to parse as its
/// expected type.
pub fn decode(wire: &str) -> Result<Packet, CodecError> {
    let mut seen = [false; FIELD_COUNT];
    let mut values: [Option<&str>; FIELD_COUNT] = [None; FIELD_COUNT];

    for field in wire.split('|') {
        let (key, value) = field
            .split_once(':')
            .ok_or_else(|| CodecError::MalformedField(field.to_string()))?;
        let idx = key_index(key).ok_or_else(|| CodecError::UnknownKey(key.to_string()))?;
        if seen[idx] {
            return Err(CodecError::DuplicateKey(key.to_string()));
        }
        seen[idx] = true;
        values[idx] = Some(value);
    }

    let mut required: [&str; FIELD_COUNT] = [""; FIELD_COUNT];
    for (idx, key) in KEYS.iter().enumerate() {
        required[idx] = values[idx].ok_or(CodecError::MissingKey(key))?;
    }

    let parse_i64 = |field: &'static str, raw: &str| -> Result<i64, CodecError> {
        raw.parse::<i64>()
            .map_err(|_| CodecError::InvalidValue { field, value: raw.to_string() })
    };

    let session_id = parse_i64("Sid", required[0])?;
    let user_id = parse_i64("Uid", required[1])?;
    let msg_code = State::from_code(parse_i64("Msg", required[2])?)?;
    let packet_id = parse_i64("PId", required[3])?;
    let frame_begin = parse_i64("Bid", required[4])?;
    let frame_end = parse_i64("Lid", required[5])?;
    let payload_length = parse_i64("Tol", required[6])?;

    let payload_raw = required[7];
    let payload = if payload_raw.is_empty() {
        Bytes::new()
    } else {
        Bytes::from(
            base64::engine::general_purpose::STANDARD
                .decode(payload_raw)
                .map_err(|err| CodecError::InvalidPayload(err.to_string()))?,
        )
    };

    let addr_raw = required[8];
    let remote_addr = if addr_raw.is_empty() { None } else { Some(unescape_addr(addr_raw)) };

    Ok(Packet {
        session_id,
        user_id,
        msg_code,
        packet_id,
        frame_begin,
        frame_end,
        payload_length,
        payload,
        remote_addr,
    })
}
