//! sessionlink client: drives one session through the handshake, transfer,
//! and teardown states against a remote [`sessionlink_server`] dispatcher.
//!
//! The client has no FSM of its own to run; [`session::ClientSession`] just
//! sends back whatever code the acceptor's table needs to see next.

pub mod session;
pub mod system_env;

pub use session::ClientSession;
