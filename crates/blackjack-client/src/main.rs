//! Blackijecky client: entry point.
//!
//! One invocation plays one session:
//!
//! 1. work out how many rounds to play (`--rounds`, or ask on the terminal);
//! 2. listen on the discovery port until a server's Offer arrives;
//! 3. connect to that server and send the Request;
//! 4. play every round, then print the summary.
//!
//! # Usage
//!
//! ```text
//! blackjack-client [OPTIONS]
//!
//! Options:
//!   --config         <PATH>  TOML config file [default: platform config dir]
//!   --rounds         <N>     Rounds to play, clamped to 1..=255 [default: ask]
//!   --name           <NAME>  Team name sent to the server [default: TeamPlayer]
//!   --auto                   Let the built-in strategy play instead of asking
//!   --discovery-port <PORT>  UDP port to listen for offers on [default: 13122]
//! ```

use std::path::PathBuf;

use anyhow::Context;
use blackjack_core::{clamp_rounds, RequestMessage, Session};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use blackjack_client::application::play_session::{
    play_session, summary_line, DecisionMaker, ThresholdDecider,
};
use blackjack_client::infrastructure::console::{prompt_rounds, stdin_reader, ConsoleDecider};
use blackjack_client::infrastructure::network::connection::open_session;
use blackjack_client::infrastructure::network::discovery::{bind_discovery_socket, wait_for_offer};
use blackjack_client::infrastructure::storage::config::{load_config, ClientConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Blackijecky player.
///
/// Finds a dealer on the local network and plays blackjack against it.
#[derive(Debug, Parser)]
#[command(
    name = "blackjack-client",
    about = "LAN blackjack player for Blackijecky servers",
    version
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, env = "BLACKJACK_CONFIG")]
    config: Option<PathBuf>,

    /// Number of rounds to play.  Prompted for when absent.
    #[arg(long, allow_negative_numbers = true)]
    rounds: Option<i64>,

    /// Team name sent to the server.
    #[arg(long, env = "BLACKJACK_TEAM")]
    name: Option<String>,

    /// Play automatically, standing once the total reaches the configured
    /// `stand_on` value.
    #[arg(long)]
    auto: bool,

    /// UDP port to listen for offers on.
    #[arg(long, env = "BLACKJACK_DISCOVERY_PORT")]
    discovery_port: Option<u16>,
}

impl Cli {
    /// Loads the config file and overlays any command-line values.
    fn config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = load_config(self.config.as_deref()).context("loading client config")?;
        if let Some(name) = &self.name {
            config.client.team_name = name.clone();
        }
        if let Some(port) = self.discovery_port {
            config.network.discovery_port = port;
        }
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.client.log_level)),
        )
        .init();

    let mut stdin = stdin_reader();
    let rounds = match cli.rounds {
        Some(n) => clamp_rounds(n),
        None => prompt_rounds(&mut stdin, &mut tokio::io::stdout())
            .await
            .context("reading round count")?,
    };

    // ── Discovery ─────────────────────────────────────────────────────────────
    let socket = bind_discovery_socket(config.network.discovery_port)?;
    info!("Client started, listening for offer requests...");
    let offer = wait_for_offer(&socket).await?;
    drop(socket);

    // ── Session ───────────────────────────────────────────────────────────────
    let request = RequestMessage {
        rounds,
        team_name: config.client.team_name.clone(),
    };
    let mut stream = open_session(offer.addr, &request)
        .await
        .with_context(|| format!("connecting to '{}'", offer.server_name))?;
    let mut session = Session::new(config.client.team_name.clone(), rounds)?;

    let mut decider: Box<dyn DecisionMaker> = if cli.auto {
        Box::new(ThresholdDecider::new(config.strategy.stand_on))
    } else {
        Box::new(ConsoleDecider::new(stdin, tokio::io::stdout()))
    };

    if let Err(e) = play_session(&mut stream, &mut session, decider.as_mut()).await {
        if e.is_disconnect() {
            warn!("server closed the connection early");
        } else {
            warn!("session ended with error: {e}");
        }
    }

    info!("{}", summary_line(&session));
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
