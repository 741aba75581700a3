//! PlaySession: the client's round loop.
//!
//! After the Request has been sent, the client plays the requested rounds one
//! after the other on the same connection.  Each round gets a fresh
//! [`RoundTracker`]; the loop alternates between asking the [`DecisionMaker`]
//! (only when the tracker says the server is waiting) and reading the next
//! Payload-Card record.
//!
//! # Malformed records
//!
//! A record with a bad magic cookie, wrong type, unknown status, or an
//! impossible card is logged and skipped.  The connection carries on, since
//! every record has a fixed size and the stream stays aligned.  A closed
//! connection or an I/O error ends the session.

use async_trait::async_trait;
use blackjack_core::{
    CardPayload, Decision, Hand, RecordStream, RoundStatus, Session, StreamError,
};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

use crate::application::track_round::{CardOwner, RoundTracker, TrackerError, TrackerEvent};

/// Reasons the client session stops early.
#[derive(Debug, Error)]
pub enum ClientSessionError {
    #[error("connection error: {0}")]
    Stream(#[from] StreamError),

    #[error("round tracking failed: {0}")]
    Tracker(#[from] TrackerError),
}

impl ClientSessionError {
    /// `true` when the server hung up.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, ClientSessionError::Stream(StreamError::ConnectionClosed))
    }
}

/// Chooses between hit and stand.
///
/// Implemented by the interactive console player and by the automatic
/// [`ThresholdDecider`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DecisionMaker: Send {
    /// Called once per decision point with both hands as currently known.
    /// `dealer` holds only the cards revealed so far.
    async fn decide(&mut self, player: &Hand, dealer: &Hand) -> Decision;
}

/// Hits while the player's total is below `stand_on`.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdDecider {
    stand_on: u8,
}

impl ThresholdDecider {
    pub fn new(stand_on: u8) -> Self {
        Self { stand_on }
    }
}

#[async_trait]
impl DecisionMaker for ThresholdDecider {
    async fn decide(&mut self, player: &Hand, _dealer: &Hand) -> Decision {
        if player.total() < self.stand_on {
            Decision::Hit
        } else {
            Decision::Stand
        }
    }
}

/// Plays rounds until `session` is complete.
///
/// The tally is updated on `session` after every round, so a session cut
/// short by an error still reports the rounds that were finished.
///
/// # Errors
///
/// [`ClientSessionError::Stream`] when the connection closes or fails.
pub async fn play_session<S, D>(
    stream: &mut RecordStream<S>,
    session: &mut Session,
    decider: &mut D,
) -> Result<(), ClientSessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    D: DecisionMaker + ?Sized,
{
    while !session.is_complete() {
        let round = session.rounds_completed() + 1;
        let status = play_round(stream, decider).await?;
        session.record_round(status);
        info!("round {round}: {}", outcome_text(status));
    }
    Ok(())
}

/// Plays one round and returns its terminal status.
///
/// # Errors
///
/// See [`play_session`].
pub async fn play_round<S, D>(
    stream: &mut RecordStream<S>,
    decider: &mut D,
) -> Result<RoundStatus, ClientSessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    D: DecisionMaker + ?Sized,
{
    let mut tracker = RoundTracker::new();
    loop {
        if tracker.needs_decision() {
            let decision = decider.decide(tracker.player(), tracker.dealer()).await;
            tracker.record_decision(decision)?;
            stream.send(&decision).await?;
            debug!(?decision, "decision sent");
            continue;
        }

        let payload = match stream.recv::<CardPayload>().await {
            Ok(p) => p,
            Err(e) if e.is_malformed_record() => {
                warn!("discarding malformed record: {e}");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        match tracker.on_payload(&payload) {
            Ok(TrackerEvent::Finished(status)) => {
                info!(
                    "your hand: {} | dealer: {}",
                    tracker.player(),
                    tracker.dealer()
                );
                return Ok(status);
            }
            Ok(TrackerEvent::Dealt { owner, card }) => match owner {
                CardOwner::Player => info!("you were dealt {card}"),
                CardOwner::Dealer => info!("dealer was dealt {card}"),
            },
            Err(e @ TrackerError::InvalidCard(_)) => warn!("discarding record: {e}"),
            Err(e) => return Err(e.into()),
        }
    }
}

fn outcome_text(status: RoundStatus) -> &'static str {
    match status {
        RoundStatus::Win => "you win",
        RoundStatus::Loss => "you lose",
        RoundStatus::Tie => "tie",
        RoundStatus::Continue => "unfinished",
    }
}

/// The line printed after the last round.
pub fn summary_line(session: &Session) -> String {
    let tally = session.tally();
    format!(
        "Finished playing {} rounds, win rate: {:.2} ({} won, {} lost, {} tied)",
        tally.played(),
        tally.win_rate(),
        tally.wins,
        tally.losses,
        tally.ties
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
