//! TCP connection to the offering server.
//!
//! Connecting and sending the Request are done together: the Request must be
//! the very first thing on the wire, and the server reads it with a single
//! `read()`, so it is written as one record immediately after connecting.

use std::net::SocketAddr;

use blackjack_core::{RecordStream, RequestMessage, StreamError};
use thiserror::Error;
use tokio::net::TcpStream;
use tracing::{debug, info};

/// Errors that can occur while opening a session.
#[derive(Debug, Error)]
pub enum ClientNetworkError {
    /// TCP connection to the server failed.
    #[error("failed to connect to server at {addr}: {source}")]
    ConnectFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The Request record could not be sent.
    #[error("failed to send request: {0}")]
    Request(#[from] StreamError),
}

/// Connects to `addr` and sends `request`.
///
/// Returns the record stream, ready for the first Payload-Card.
///
/// # Errors
///
/// See [`ClientNetworkError`].
pub async fn open_session(
    addr: SocketAddr,
    request: &RequestMessage,
) -> Result<RecordStream<TcpStream>, ClientNetworkError> {
    let tcp = TcpStream::connect(addr)
        .await
        .map_err(|source| ClientNetworkError::ConnectFailed { addr, source })?;
    // Records are tiny and each one waits on a reply.
    if let Err(e) = tcp.set_nodelay(true) {
        debug!("could not disable Nagle on {addr}: {e}");
    }

    let mut stream = RecordStream::new(tcp);
    stream.send(request).await?;
    info!(
        "connected to {addr}, requested {} round(s) as '{}'",
        request.rounds, request.team_name
    );
    Ok(stream)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
