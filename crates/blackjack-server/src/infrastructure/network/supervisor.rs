//! ConnectionSupervisor: accepts TCP connections and runs each session on its own task.
//!
//! Every accepted connection gets:
//!
//! - a fresh [`Deck`] for every round, so no card state is shared between
//!   rounds or players;
//! - a `session` tracing span carrying a random session id and the peer
//!   address, so interleaved log lines from concurrent games stay readable;
//! - its own Tokio task, so a slow or stalled client never delays another.
//!
//! A session that fails is logged and dropped.  Nothing a client does can stop
//! the accept loop; only the shutdown future passed to
//! [`ConnectionSupervisor::run_until`] does that.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use blackjack_core::Deck;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::application::host_session::host_session;

/// Pause after a failed `accept()` so a persistent error (e.g. out of file
/// descriptors) does not turn the loop into a busy spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Error type for the connection supervisor.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("bind failed on {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("could not read listener address: {0}")]
    LocalAddr(#[source] std::io::Error),
}

/// Owns the listening socket and spawns one task per accepted connection.
pub struct ConnectionSupervisor {
    listener: TcpListener,
}

impl ConnectionSupervisor {
    /// Binds the TCP listener.  Port 0 asks the OS for an ephemeral port; use
    /// [`ConnectionSupervisor::local_addr`] to find out which one.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::BindFailed`] if the address is unavailable.
    pub async fn bind(addr: SocketAddr) -> Result<Self, NetworkError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| NetworkError::BindFailed { addr, source })?;
        Ok(Self { listener })
    }

    /// The address actually bound.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::LocalAddr`] if the OS cannot report it.
    pub fn local_addr(&self) -> Result<SocketAddr, NetworkError> {
        self.listener.local_addr().map_err(NetworkError::LocalAddr)
    }

    /// Accepts connections until `shutdown` completes.
    ///
    /// Sessions already running are not cancelled; they finish on their own
    /// tasks or end when the runtime shuts down.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            _ = self.accept_loop() => {}
            _ = shutdown => info!("no longer accepting connections"),
        }
    }

    async fn accept_loop(&self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    tokio::spawn(handle_connection(stream, peer));
                }
                Err(e) => {
                    warn!("accept failed: {e}");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            }
        }
    }
}

/// Runs one session to completion and logs how it ended.
async fn handle_connection(stream: TcpStream, peer: SocketAddr) {
    let session_id = Uuid::new_v4();
    let span = info_span!("session", %session_id, %peer);

    async move {
        info!("client connected");
        match host_session(stream, Deck::new).await {
            Ok(session) => info!(
                team = session.team_name(),
                rounds = session.rounds_completed(),
                "session complete"
            ),
            Err(e) if e.is_disconnect() => info!("client disconnected: {e}"),
            Err(e) => warn!("session ended with error: {e}"),
        }
    }
    .instrument(span)
    .await
}

// ── Tests ─────────────────────────────────────────────────────────────────────
