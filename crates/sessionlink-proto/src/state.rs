//! The control codes carried in a packet's `Msg` field.

use crate::error::CodecError;

/// Session/packet control code. Numeric values are the stable wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Initial handshake request.
    Req = 0,
    /// Handshake acknowledgment, session opened.
    Opn = 1,
    /// Steady data-transfer state, also used as a keepalive.
    Ali = 2,
    /// Session torn down, terminal.
    Cld = 3,
    /// Final handshake acknowledgment before entering `Ali`.
    Ack = 4,
    /// Retry requested, buffer discarded.
    Rty = 5,
    /// Protocol error, recoverable via a fresh `Opn`.
    Err = 6,
    /// Teardown request.
    Fin = 7,
}

impl State {
    /// Numeric wire encoding.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode a wire value into a `State`.
    pub fn from_code(code: i64) -> Result<Self, CodecError> {
        match code {
            0 => Ok(Self::Req),
            1 => Ok(Self::Opn),
            2 => Ok(Self::Ali),
            3 => Ok(Self::Cld),
            4 => Ok(Self::Ack),
            5 => Ok(Self::Rty),
            6 => Ok(Self::Err),
            7 => Ok(Self::Fin),
            other => Err(CodecError::InvalidMsgCode(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_code() {
        for code in 0..=7 {
            let state = State::from_code(code).expect("valid code");
            assert_eq!(i64::from(state.code()), code);
        }
    }

    #[test]
    fn rejects_out_of_range_codes() {
        assert_eq!(State::from_code(8), Err(CodecError::InvalidMsgCode(8)));
        assert_eq!(State::from_code(-1), Err(CodecError::InvalidMsgCode(-1)));
    }
}
