//! Server error types.

use std::fmt;

use sessionlink_core::transport::PortError;
use sessionlink_proto::CodecError;

use crate::registry::RegistryError;

/// Errors that can occur in the dispatcher's read loop.
#[derive(Debug)]
pub enum ServerError {
    /// Configuration error (invalid bind address, etc.). Fatal; fix
    /// configuration and restart.
    Config(String),

    /// Transport/port error surfaced from the underlying datagram port.
    Transport(PortError),

    /// A datagram failed to decode. Dropped and logged; the loop continues.
    Codec(CodecError),

    /// A registry operation failed (duplicate/missing session id).
    Registry(RegistryError),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::Transport(err) => write!(f, "transport error: {err}"),
            Self::Codec(err) => write!(f, "codec error: {err}"),
            Self::Registry(err) => write!(f, "registry error: {err}"),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Codec(err) => Some(err),
            Self::Registry(err) => Some(err),
            Self::Config(_) => None,
        }
    }
}

impl From<PortError> for ServerError {
    fn from(err: PortError) -> Self {
        Self::Transport(err)
    }
}

impl From<CodecError> for ServerError {
    fn from(err: CodecError) -> Self {
        Self::Codec(err)
    }
}

impl From<RegistryError> for ServerError {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}
