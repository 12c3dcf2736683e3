//! Thin plumbing to wire a [`Dispatcher`] to a [`LinkSimulator`] and read
//! decoded packets off a [`SimPort`], so scenario tests can focus on the
//! protocol exchange itself.

use std::time::Duration;

use sessionlink_core::transport::DatagramPort;
use sessionlink_proto::{CodecError, Packet};
use sessionlink_server::{run, Dispatcher, DispatcherConfig};
use sessionlink_sim::{LinkSimulator, SimPort};

use crate::sim_env::SimEnv;

/// Bind a dispatcher at `addr` on `sim` and drive its read loop in the
/// background for the lifetime of the returned task.
pub fn spawn_server(
    sim: &LinkSimulator,
    addr: &str,
    seed: u64,
    config: DispatcherConfig,
) -> tokio::task::JoinHandle<()> {
    let port = sim.listen(addr).expect("server address already bound");
    let dispatcher = Dispatcher::new(SimEnv::new(seed), config);
    tokio::spawn(async move {
        if let Err(err) = run(&port, &dispatcher).await {
            tracing::warn!(%err, "server loop exited");
        }
    })
}

/// Dial `server_addr` from `local_addr` on `sim`.
///
/// # Panics
/// If `local_addr` is already bound.
pub fn connect(sim: &LinkSimulator, local_addr: &str, server_addr: &str) -> SimPort {
    sim.dial(local_addr, server_addr).expect("client address already bound")
}

/// Encode and send `packet` on `port`, to its default remote.
pub async fn send(port: &SimPort, packet: &Packet) {
    let wire = sessionlink_proto::encode(packet);
    port.send_default(wire.as_bytes()).await.expect("simulated send never fails outright");
}

/// Wait up to `timeout` for the next datagram on `port` and decode it.
///
/// Returns `None` if the deadline elapses or the port is closed; malformed
/// datagrams are treated as a timeout since the link never manufactures
/// corrupt bytes on its own in these scenarios.
pub async fn recv(port: &SimPort, timeout: Duration) -> Option<Packet> {
    let (bytes, _from) = tokio::time::timeout(timeout, port.recv()).await.ok()?.ok()?;
    let text = std::str::from_utf8(&bytes).ok()?;
    match sessionlink_proto::decode(text) {
        Ok(packet) => Some(packet),
        Err(err @ (CodecError::UnknownKey(_) | CodecError::MissingKey(_))) => {
            tracing::warn!(%err, "scenario received an undecodable datagram");
            None
        },
        Err(_) => None,
    }
}
