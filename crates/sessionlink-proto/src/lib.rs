//! Wire packet model and codec.
//!
//! This crate owns the [`Packet`] record, the [`State`] control-code enum,
//! and the pipe-delimited text codec that serializes one to the other. It
//! has no knowledge of sessions, buffering, or transport; those live in
//! `sessionlink-core` and above.

pub mod codec;
pub mod error;
pub mod packet;
pub mod state;

pub use codec::{decode, encode};
pub use error::CodecError;
pub use packet::{Packet, BUFFER_SIZE};
pub use state::State;
