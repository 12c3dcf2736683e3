//! sessionlink server: binds a [`DatagramPort`], runs the read loop, and
//! drives each datagram through a [`Dispatcher`].

pub mod driver;
pub mod error;
pub mod registry;
pub mod system_env;
pub mod udp_port;

use sessionlink_core::env::Environment;
use sessionlink_core::transport::DatagramPort;

pub use driver::{Dispatcher, DispatcherConfig};
pub use error::ServerError;
pub use registry::{RegistryError, SessionRegistry};

/// Run the dispatcher's read loop against `port` until it closes.
///
/// Each inbound datagram is handed to [`Dispatcher::handle_datagram`]; any
/// response packet is encoded and sent back to the originating address.
///
/// A second tick, cadenced by [`Dispatcher::keepalive_interval`], sweeps and
/// closes sessions idle past the dispatcher's configured timeout.
pub async fn run<E: Environment>(
    port: &(impl DatagramPort + ?Sized),
    dispatcher: &Dispatcher<E>,
) -> Result<(), ServerError> {
    let mut tick = tokio::time::interval(dispatcher.keepalive_interval());
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            datagram = port.recv() => {
                let (bytes, peer_addr) = match datagram {
                    Ok(datagram) => datagram,
                    Err(sessionlink_core::transport::PortError::Closed) => return Ok(()),
                    Err(err) => return Err(ServerError::from(err)),
                };

                let Some(response) = dispatcher.handle_datagram(&bytes, &peer_addr) else { continue };
                let wire = sessionlink_proto::encode(&response);
                if let Err(err) = port.send(wire.as_bytes(), &peer_addr).await {
                    tracing::warn!(%err, %peer_addr, "failed to send response");
                }
            }
            _ = tick.tick() => {
                for session_id in dispatcher.reap_idle_sessions() {
                    tracing::info!(session_id, "closed idle session");
                }
            }
        }
    }
}
