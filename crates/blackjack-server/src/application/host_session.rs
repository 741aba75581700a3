//! HostSession: the server side of one client connection.
//!
//! A session begins with the handshake.  The client sends a single Request
//! record naming its team and how many rounds it wants.  The server then plays
//! exactly that many rounds back to back over the same connection and keeps a
//! win/loss/tie tally from the player's point of view.
//!
//! # Handshake strictness
//!
//! The Request is decoded from the bytes delivered by a single read.  A peer
//! that sends a short, corrupted, or wrongly-typed record is dropped without a
//! reply; there is no negative acknowledgement record in the protocol.  A
//! request for zero rounds is rejected the same way.

use blackjack_core::{
    CardSource, DomainError, RecordStream, RequestMessage, Session, SessionTally, StreamError,
};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info};

use crate::application::round_engine::RoundEngine;

/// Reasons a hosted session ends early.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The Request record could not be read or decoded.
    #[error("handshake failed: {0}")]
    Handshake(#[source] StreamError),

    /// The Request decoded but asked for something the server will not play.
    #[error("rejected session request: {0}")]
    InvalidRequest(#[from] DomainError),

    /// The connection failed while a round was in progress.
    #[error("session aborted: {0}")]
    Stream(#[from] StreamError),
}

impl SessionError {
    /// `true` when the peer simply hung up.  Callers log this as a normal
    /// termination rather than a failure.
    pub fn is_disconnect(&self) -> bool {
        matches!(
            self,
            SessionError::Handshake(StreamError::ConnectionClosed)
                | SessionError::Stream(StreamError::ConnectionClosed)
        )
    }
}

/// Reads and validates the Request record that opens every session.
///
/// # Errors
///
/// [`SessionError::Handshake`] if the single read does not yield a valid
/// Request, [`SessionError::InvalidRequest`] for a zero-round request.
pub async fn accept_request<S>(stream: &mut RecordStream<S>) -> Result<Session, SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let request: RequestMessage = stream
        .recv_single_read()
        .await
        .map_err(SessionError::Handshake)?;
    let session = Session::new(request.team_name, request.rounds)?;
    Ok(session)
}

/// Runs a full session on an accepted transport: handshake, then every
/// requested round in order.
///
/// `new_deck` is called once at the start of each round; no card state is
/// carried from one round to the next.
///
/// Returns the completed [`Session`] so the caller can log its tally.
///
/// # Errors
///
/// See [`SessionError`].  A mid-round failure aborts the remaining rounds.
pub async fn host_session<S, C, F>(transport: S, mut new_deck: F) -> Result<Session, SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    C: CardSource,
    F: FnMut() -> C,
{
    let mut stream = RecordStream::new(transport);
    let mut session = accept_request(&mut stream).await?;
    info!(
        team = session.team_name(),
        rounds = session.rounds_requested(),
        "starting game with {} for {} round(s)",
        session.team_name(),
        session.rounds_requested()
    );

    while !session.is_complete() {
        let report = RoundEngine::new(new_deck()).play(&mut stream).await?;
        session.record_round(report.status);
        debug!(
            round = session.rounds_completed(),
            status = ?report.status,
            player = %report.player,
            dealer = %report.dealer,
            "round finished"
        );
    }

    log_summary(session.team_name(), session.tally());
    Ok(session)
}

fn log_summary(team: &str, tally: SessionTally) {
    info!(
        "finished playing with {team}: {} win(s), {} loss(es), {} tie(s)",
        tally.wins, tally.losses, tally.ties
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use blackjack_core::{
        CardPayload, Decision, ProtocolError, Record, RoundStatus, StackedDeck,
    };
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio_test::io::Builder;

    fn request(rounds: u8) -> Vec<u8> {
        RequestMessage {
            rounds,
            team_name: "TeamPlayer".to_string(),
        }
        .encode()
    }

    #[tokio::test]
    async fn test_accept_request_builds_session() {
        // Arrange
        let mock = Builder::new().read(&request(3)).build();
        let mut stream = RecordStream::new(mock);

        // Act
        let session = accept_request(&mut stream).await.unwrap();

        // Assert
        assert_eq!(session.team_name(), "TeamPlayer");
        assert_eq!(session.rounds_requested(), 3);
        assert_eq!(session.rounds_completed(), 0);
    }

    #[tokio::test]
    async fn test_accept_request_rejects_zero_rounds() {
        let mock = Builder::new().read(&request(0)).build();
        let mut stream = RecordStream::new(mock);

        let result = accept_request(&mut stream).await;

        assert!(matches!(
            result,
            Err(SessionError::InvalidRequest(DomainError::InvalidRoundCount(0)))
        ));
    }

    #[tokio::test]
    async fn test_accept_request_rejects_bad_magic() {
        // Arrange
        let mut bytes = request(2);
        bytes[..4].copy_from_slice(&0xDEAD_BEEFu32.to_be_bytes());
        let mock = Builder::new().read(&bytes).build();
        let mut stream = RecordStream::new(mock);

        // Act
        let result = accept_request(&mut stream).await;

        // Assert
        assert!(matches!(
            result,
            Err(SessionError::Handshake(StreamError::Protocol(
                ProtocolError::BadMagic(0xDEAD_BEEF)
            )))
        ));
    }

    #[tokio::test]
    async fn test_accept_request_short_single_read_is_rejected() {
        let bytes = request(2);
        let mock = Builder::new().read(&bytes[..10]).build();
        let mut stream = RecordStream::new(mock);

        let result = accept_request(&mut stream).await;

        assert!(matches!(
            result,
            Err(SessionError::Handshake(StreamError::Protocol(
                ProtocolError::TruncatedRecord { .. }
            )))
        ));
    }

    #[tokio::test]
    async fn test_immediate_hangup_is_disconnect() {
        let mock = Builder::new().build();

        let err = host_session(mock, || StackedDeck::from_ranks(&[]))
            .await
            .unwrap_err();

        assert!(err.is_disconnect());
    }

    #[tokio::test]
    async fn test_host_session_plays_every_requested_round() {
        // Arrange: two rounds, both player 10+9 stand vs dealer 10+8 → win
        let (server_io, mut client_io) = tokio::io::duplex(4096);
        client_io.write_all(&request(2)).await.unwrap();

        // Act: stream both decisions up front; the server reads them in order
        client_io.write_all(&Decision::Stand.encode()).await.unwrap();
        client_io.write_all(&Decision::Stand.encode()).await.unwrap();
        let session = host_session(server_io, || StackedDeck::from_ranks(&[10, 10, 9, 8]))
            .await
            .unwrap();

        // Assert
        assert!(session.is_complete());
        assert_eq!(session.tally().wins, 2);
        assert_eq!(session.tally().played(), 2);

        let mut raw = Vec::new();
        client_io.read_to_end(&mut raw).await.unwrap();
        let terminals: Vec<RoundStatus> = raw
            .chunks(CardPayload::SIZE)
            .map(|c| CardPayload::decode(c).unwrap())
            .filter(CardPayload::is_terminal)
            .map(|p| p.status)
            .collect();
        assert_eq!(terminals, vec![RoundStatus::Win, RoundStatus::Win]);
    }

    #[tokio::test]
    async fn test_disconnect_mid_session_is_reported_as_disconnect() {
        // Arrange: ask for three rounds, then vanish before deciding
        let (server_io, mut client_io) = tokio::io::duplex(4096);
        client_io.write_all(&request(3)).await.unwrap();
        client_io.shutdown().await.unwrap();

        // Act
        let err = host_session(server_io, || StackedDeck::from_ranks(&[10, 10, 9, 8]))
            .await
            .unwrap_err();

        // Assert
        assert!(err.is_disconnect(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_each_round_deals_from_a_fresh_deck() {
        // Arrange: every pack starts 10, 7, 9, 8 (player 10+9, dealer 7+8,
        // then 5 → 20).  A shared pack would open round 2 on the 3 that
        // follows the dealer's hit.
        let (server_io, mut client_io) = tokio::io::duplex(4096);
        client_io.write_all(&request(2)).await.unwrap();
        client_io.write_all(&Decision::Stand.encode()).await.unwrap();
        client_io.write_all(&Decision::Stand.encode()).await.unwrap();
        let mut packs_opened = 0;

        // Act
        let session = host_session(server_io, || {
            packs_opened += 1;
            StackedDeck::from_ranks(&[10, 7, 9, 8, 5, 3, 3, 3, 3])
        })
        .await
        .unwrap();

        // Assert
        assert_eq!(packs_opened, 2);
        assert_eq!(session.tally().losses, 2);
        let mut raw = Vec::new();
        client_io.read_to_end(&mut raw).await.unwrap();
        let ranks: Vec<u16> = raw
            .chunks(CardPayload::SIZE)
            .map(|c| CardPayload::decode(c).unwrap().rank)
            .collect();
        assert_eq!(ranks, vec![10, 9, 7, 8, 5, 0, 10, 9, 7, 8, 5, 0]);
    }
}
