//! Blackijecky server: entry point.
//!
//! Starts the dealer.  The process:
//!
//! 1. loads the optional TOML config and applies command-line overrides;
//! 2. binds the TCP listener and prints the startup banner;
//! 3. broadcasts an Offer on the LAN once per second;
//! 4. accepts clients until Ctrl+C, playing each session on its own task.
//!
//! # Usage
//!
//! ```text
//! blackjack-server [OPTIONS]
//!
//! Options:
//!   --config <PATH>  TOML config file [default: platform config dir]
//!   --port   <PORT>  TCP port for game sessions [default: 12345]
//!   --name   <NAME>  Name advertised in Offers [default: TeamDealer]
//!   --bind   <IP>    Address to accept connections on [default: 0.0.0.0]
//! ```
//!
//! Each option can also be set through the matching `BLACKJACK_*` environment
//! variable.  The log level follows `RUST_LOG`, falling back to the config
//! file's `log_level`.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use blackjack_core::OfferMessage;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use blackjack_server::infrastructure::network::discovery::start_offer_broadcaster;
use blackjack_server::infrastructure::network::local_addr::local_ip;
use blackjack_server::infrastructure::network::supervisor::ConnectionSupervisor;
use blackjack_server::infrastructure::storage::config::{load_config, ServerConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Blackijecky dealer.
///
/// Advertises itself on the local network and plays blackjack with every
/// client that connects.
#[derive(Debug, Parser)]
#[command(
    name = "blackjack-server",
    about = "LAN blackjack dealer for Blackijecky clients",
    version
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, env = "BLACKJACK_CONFIG")]
    config: Option<PathBuf>,

    /// TCP port for game sessions.  `0` picks a free port.
    #[arg(long, env = "BLACKJACK_PORT")]
    port: Option<u16>,

    /// Server name advertised in every Offer.
    #[arg(long, env = "BLACKJACK_NAME")]
    name: Option<String>,

    /// IP address to accept connections on.
    #[arg(long, env = "BLACKJACK_BIND")]
    bind: Option<IpAddr>,
}

impl Cli {
    /// Loads the config file and overlays any command-line values.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = load_config(self.config.as_deref()).context("loading server config")?;
        if let Some(port) = self.port {
            config.network.tcp_port = port;
        }
        if let Some(name) = self.name {
            config.server.name = name;
        }
        if let Some(bind) = self.bind {
            config.network.bind_address = bind;
        }
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_config()?;

    // RUST_LOG wins over the config file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    // ── TCP listener ──────────────────────────────────────────────────────────
    let bind_addr = SocketAddr::new(config.network.bind_address, config.network.tcp_port);
    let supervisor = ConnectionSupervisor::bind(bind_addr)
        .await
        .with_context(|| format!("binding game port {bind_addr}"))?;
    let tcp_port = supervisor.local_addr()?.port();

    info!("Server started, listening on IP address {}", local_ip());
    info!("'{}' accepting players on TCP port {tcp_port}", config.server.name);

    // ── Offer broadcaster ─────────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let offer = OfferMessage {
        tcp_port,
        server_name: config.server.name.clone(),
    };
    let broadcast_target =
        SocketAddr::new(config.network.broadcast_address, config.network.discovery_port);
    let broadcaster = start_offer_broadcaster(broadcast_target, offer, Arc::clone(&running))
        .await
        .context("starting offer broadcaster")?;

    // ── Accept loop until Ctrl+C ──────────────────────────────────────────────
    supervisor
        .run_until(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("received Ctrl+C, shutting down"),
                Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
            }
        })
        .await;

    running.store(false, Ordering::Relaxed);
    broadcaster.abort();
    info!("server stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
