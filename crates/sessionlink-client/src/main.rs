//! sessionlink client binary.
//!
//! # Usage
//!
//! ```bash
//! sessionlink-client --connect 127.0.0.1:9999 --user-id 1 --payload "hello"
//! ```

use std::time::Duration;

use clap::Parser;
use sessionlink_client::system_env::SystemEnv;
use sessionlink_client::ClientSession;
use sessionlink_proto::state::State;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// sessionlink reliable datagram transport client
#[derive(Parser, Debug)]
#[command(name = "sessionlink-client")]
#[command(about = "sessionlink reliable session-oriented datagram transport client")]
#[command(version)]
struct Args {
    /// Server address to connect to
    #[arg(short, long)]
    connect: String,

    /// User id to present in the initial request
    #[arg(long, default_value = "1")]
    user_id: i64,

    /// Payload to send with the initial request
    #[arg(long, default_value = "")]
    payload: String,

    /// How long to wait for a reply before giving up
    #[arg(long, default_value = "5")]
    timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.connect(&args.connect).await?;
    tracing::info!(local = %socket.local_addr()?, remote = %args.connect, "connected");

    let mut env = SystemEnv::new();
    let session_id = sessionlink_core::session_id::generate_session_id(0, 30001, &mut env)
        .expect("0 <= 30001");
    let mut client = ClientSession::new(session_id, env);
    let deadline = Duration::from_secs(args.timeout_secs);

    let req = client.initial_request(args.user_id, bytes::Bytes::from(args.payload.into_bytes()));
    let wire = sessionlink_proto::encode(&req);
    socket.send(wire.as_bytes()).await?;
    tracing::info!(session_id, "sent REQ");

    let mut buf = [0u8; sessionlink_proto::packet::MAX_WIRE_SIZE];
    loop {
        let n = match timeout(deadline, socket.recv(&mut buf)).await {
            Ok(Ok(n)) => n,
            Ok(Err(err)) => {
                tracing::error!(%err, "socket read failed");
                break;
            }
            Err(_) => {
                tracing::warn!("timed out waiting for a reply");
                break;
            }
        };

        let text = match std::str::from_utf8(&buf[..n]) {
            Ok(text) => text,
            Err(_) => {
                tracing::warn!("dropping non-utf8 datagram");
                continue;
            }
        };
        let inbound = match sessionlink_proto::decode(text) {
            Ok(packet) => packet,
            Err(err) => {
                tracing::warn!(%err, "dropping malformed datagram");
                continue;
            }
        };

        tracing::debug!(state = ?client.state(), inbound = ?inbound.msg_code, "received");

        let Some(reply) = client.on_datagram(&inbound) else {
            if matches!(client.state(), State::Cld) {
                tracing::info!("session closed");
                break;
            }
            continue;
        };

        let wire = sessionlink_proto::encode(&reply);
        socket.send(wire.as_bytes()).await?;

        if client.state() == State::Ali {
            tracing::info!("handshake complete, session alive");
        }
    }

    Ok(())
}
