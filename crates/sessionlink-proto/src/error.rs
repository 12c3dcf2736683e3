//! Codec error types.

use thiserror::Error;

/// Errors produced while decoding a wire packet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A key appeared that isn't part of the fixed field set.
    #[error("unknown key: {0}")]
    UnknownKey(String),

    /// A key appeared more than once in the same packet.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// A required key never appeared.
    #[error("missing required key: {0}")]
    MissingKey(&'static str),

    /// A field's value could not be parsed as the expected type.
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        /// Field key, e.g. `"Sid"`.
        field: &'static str,
        /// The offending raw text.
        value: String,
    },

    /// A field was not in `Key:Value` shape.
    #[error("malformed field: {0}")]
    MalformedField(String),

    /// `msg_code` was outside `0..=7`.
    #[error("invalid msg code: {0}")]
    InvalidMsgCode(i64),

    /// The `Pyl` field was not valid base64.
    #[error("invalid payload encoding: {0}")]
    InvalidPayload(String),
}
