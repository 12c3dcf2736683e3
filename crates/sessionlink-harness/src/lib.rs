//! Deterministic simulation harness for sessionlink protocol testing.
//!
//! Wires `sessionlink-sim`'s in-process unreliable link to a real
//! [`sessionlink_server::Dispatcher`], so integration tests can drive full
//! client/server exchanges under configurable loss, duplication, reordering,
//! and delay without touching a socket.

pub mod harness;
pub mod sim_env;

pub use harness::{connect, recv, send, spawn_server};
pub use sim_env::SimEnv;
