//! Session state machine, reassembly buffer, and packet validation.
//!
//! This crate is Sans-IO: nothing here touches a socket. [`fsm::step`]
//! consumes a validated inbound packet and returns the packet to send, if
//! any; callers (in `sessionlink-server`/`sessionlink-client`) own the
//! socket and the [`env::Environment`] that supplies time and randomness.

pub mod buffer;
pub mod env;
pub mod error;
pub mod fsm;
pub mod session;
pub mod session_id;
pub mod transport;
pub mod validator;

pub use error::{BufferError, ValidationError};
pub use session::Session;
