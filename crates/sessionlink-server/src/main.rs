//! sessionlink server binary.
//!
//! # Usage
//!
//! ```bash
//! sessionlink-server --bind 0.0.0.0:9999
//! ```

use std::time::Duration;

use clap::Parser;
use sessionlink_server::system_env::SystemEnv;
use sessionlink_server::udp_port::UdpPort;
use sessionlink_server::{run, Dispatcher, DispatcherConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// sessionlink reliable datagram transport server
#[derive(Parser, Debug)]
#[command(name = "sessionlink-server")]
#[command(about = "sessionlink reliable session-oriented datagram transport server")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = "0.0.0.0:9999")]
    bind: String,

    /// Reject new sessions once this many are active. 0 means unlimited.
    #[arg(long, default_value = "10000")]
    max_sessions: usize,

    /// Close a session once it has gone this many seconds without a
    /// received packet. 0 disables idle reaping.
    #[arg(long, default_value = "60")]
    session_idle_timeout: u64,

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

    tracing::info!("sessionlink server starting");
    tracing::info!(bind = %args.bind, "binding udp socket");

    let port = UdpPort::bind(&args.bind).await?;
    let dispatcher = Dispatcher::new(
        SystemEnv::new(),
        DispatcherConfig {
            max_sessions: args.max_sessions,
            idle_timeout: Duration::from_secs(args.session_idle_timeout),
            ..DispatcherConfig::default()
        },
    );

    run(&port, &dispatcher).await?;

    Ok(())
}
