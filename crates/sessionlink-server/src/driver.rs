//! Dispatcher: decode, validate, route to the owning session's FSM, and
//! hand back the response packet (if any) for the caller to encode and
//! send.

use std::time::Duration;

use sessionlink_core::env::Environment;
use sessionlink_core::session::Session;
use sessionlink_core::{fsm, validator};
use sessionlink_proto::state::State;
use sessionlink_proto::Packet;

use crate::registry::SessionRegistry;

/// Dispatcher tuning knobs.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Reject new sessions once the registry holds this many. `0` means
    /// unlimited.
    pub max_sessions: usize,
    /// Close a session once this long has passed since its last received
    /// packet. `Duration::ZERO` disables idle reaping.
    pub idle_timeout: Duration,
    /// Cadence at which the read loop checks for idle sessions. Should be
    /// well under `idle_timeout` so reaping isn't delayed by a full period.
    pub keepalive_interval: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_sessions: 0,
            idle_timeout: Duration::ZERO,
            keepalive_interval: Duration::from_secs(15),
        }
    }
}

/// Ties a [`SessionRegistry`] to an [`Environment`] and exposes one
/// datagram-in, packet-out operation.
pub struct Dispatcher<E: Environment> {
    registry: SessionRegistry<E::Instant>,
    env: E,
    config: DispatcherConfig,
}

impl<E: Environment> Dispatcher<E> {
    /// Build a dispatcher over a fresh, empty registry.
    pub fn new(env: E, config: DispatcherConfig) -> Self {
        Self { registry: SessionRegistry::new(), env, config }
    }

    /// Number of sessions currently tracked.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.registry.size()
    }

    /// Cadence at which [`Dispatcher::reap_idle_sessions`] should be polled.
    #[must_use]
    pub fn keepalive_interval(&self) -> Duration {
        self.config.keepalive_interval
    }

    /// Remove sessions that have not received a packet within the
    /// configured idle timeout, returning the ids removed. A zero
    /// `idle_timeout` disables reaping.
    pub fn reap_idle_sessions(&self) -> Vec<i64> {
        if self.config.idle_timeout.is_zero() {
            return Vec::new();
        }
        let now = self.env.now();
        let idle_timeout = self.config.idle_timeout;
        self.registry.reap_idle(|session| now - session.last_received >= idle_timeout)
    }

    /// Decode `bytes` from `peer_addr`, validate and route it, and return
    /// the response packet to send, if any.
    ///
    /// Codec failures, validation failures, and registry errors are logged
    /// and absorbed here (per the read-loop's "drop and continue" error
    /// model); they never propagate to the caller.
    pub fn handle_datagram(&self, bytes: &[u8], peer_addr: &str) -> Option<Packet> {
        let Ok(text) = std::str::from_utf8(bytes) else {
            tracing::warn!(%peer_addr, "dropping non-utf8 datagram");
            return None;
        };
        let mut packet = match sessionlink_proto::decode(text) {
            Ok(packet) => packet,
            Err(err) => {
                tracing::warn!(%err, %peer_addr, "dropping undecodable datagram");
                return None;
            },
        };
        packet.remote_addr = Some(peer_addr.to_string());

        if !self.registry.has(packet.session_id) {
            if packet.msg_code != State::Req {
                tracing::warn!(session_id = packet.session_id, "no such session, dropping");
                return None;
            }
            if self.config.max_sessions > 0 && self.registry.size() >= self.config.max_sessions {
                tracing::warn!("session registry at capacity, dropping REQ");
                return None;
            }
            let session = Session::new(packet.session_id, self.env.now());
            if let Err(err) = self.registry.add(session) {
                tracing::warn!(%err, "failed to register new session");
                return None;
            }
        }

        let outcome = self.registry.with_session(packet.session_id, |session| {
            if let Err(err) = validator::validate(session, &packet) {
                tracing::warn!(%err, "validation rejected packet");
                return None;
            }
            fsm::step(session, &packet, self.env.now())
        });

        match outcome {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%err, "registry lookup failed for validated session");
                None
            },
        }
    }
}
