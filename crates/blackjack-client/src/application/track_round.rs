//! RoundTracker: works out who owns each card the server deals.
//!
//! A Payload-Card record says *which* card was dealt but not *to whom*.  The
//! client reconstructs ownership from the order of records plus one bit of
//! its own state: whether it has asked for a hit that has not arrived yet.
//!
//! # Ownership rules
//!
//! ```text
//! AwaitPlayerFirst ─→ AwaitPlayerSecond ─→ AwaitDealerUp ─→ PlayerDecision
//!                                                              │ stand
//!                                                              ▼
//!                               DealerHits ←── AwaitDealerHidden
//!
//! any state ── terminal record ──→ RoundDone
//! ```
//!
//! - Cards 1 and 2 of a round belong to the player.
//! - Card 3 is the dealer's up-card.
//! - After that, a card that answers an outstanding hit belongs to the
//!   player; any other card belongs to the dealer (first the hidden card,
//!   then the dealer's own hits).
//! - A terminal record (`win`, `loss`, `tie`) ends the round from whatever
//!   state the tracker is in.  Its rank and suit are ignored.
//!
//! These rules only hold because each client plays exactly one hand and
//! never sends a second decision before the first one is answered.  The
//! session loop guarantees the latter by asking [`RoundTracker::needs_decision`]
//! before every decision.

use blackjack_core::{Card, CardPayload, Decision, DomainError, Hand, RoundStatus};
use thiserror::Error;

/// Where the tracker is within the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    AwaitPlayerFirst,
    AwaitPlayerSecond,
    AwaitDealerUp,
    PlayerDecision,
    AwaitDealerHidden,
    DealerHits,
    RoundDone,
}

/// Whose hand a dealt card went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardOwner {
    Player,
    Dealer,
}

/// What a single Payload-Card record meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerEvent {
    Dealt { owner: CardOwner, card: Card },
    Finished(RoundStatus),
}

/// Errors raised by [`RoundTracker`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    /// A record arrived after the round already ended.
    #[error("payload received after the round finished")]
    RoundOver,

    /// A `continue` record carried an impossible card.  The tracker state is
    /// left untouched, so the record can be discarded.
    #[error("payload carries an invalid card: {0}")]
    InvalidCard(#[from] DomainError),

    /// A decision was recorded while none was expected.
    #[error("no decision expected in state {0:?}")]
    DecisionNotExpected(TrackerState),
}

/// Per-round ownership inference state machine.
#[derive(Debug, Clone)]
pub struct RoundTracker {
    state: TrackerState,
    player: Hand,
    dealer: Hand,
    hit_pending: bool,
    outcome: Option<RoundStatus>,
}

impl Default for RoundTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundTracker {
    pub fn new() -> Self {
        Self {
            state: TrackerState::AwaitPlayerFirst,
            player: Hand::new(),
            dealer: Hand::new(),
            hit_pending: false,
            outcome: None,
        }
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn player(&self) -> &Hand {
        &self.player
    }

    pub fn dealer(&self) -> &Hand {
        &self.dealer
    }

    /// The round's result once a terminal record has been seen.
    pub fn outcome(&self) -> Option<RoundStatus> {
        self.outcome
    }

    pub fn is_done(&self) -> bool {
        self.state == TrackerState::RoundDone
    }

    /// `true` when the server is waiting on the player: it is the player's
    /// turn, no hit is in flight, and the player has not bust.
    pub fn needs_decision(&self) -> bool {
        self.state == TrackerState::PlayerDecision && !self.hit_pending && !self.player.is_bust()
    }

    /// Notes a decision the client is about to send.
    ///
    /// # Errors
    ///
    /// [`TrackerError::DecisionNotExpected`] unless
    /// [`RoundTracker::needs_decision`] is `true`.
    pub fn record_decision(&mut self, decision: Decision) -> Result<(), TrackerError> {
        if !self.needs_decision() {
            return Err(TrackerError::DecisionNotExpected(self.state));
        }
        match decision {
            Decision::Hit => self.hit_pending = true,
            Decision::Stand => self.state = TrackerState::AwaitDealerHidden,
        }
        Ok(())
    }

    /// Applies one Payload-Card record.
    ///
    /// # Errors
    ///
    /// [`TrackerError::RoundOver`] once the round is finished and
    /// [`TrackerError::InvalidCard`] for a `continue` record whose card cannot
    /// exist.  Neither changes the tracker.
    pub fn on_payload(&mut self, payload: &CardPayload) -> Result<TrackerEvent, TrackerError> {
        if self.is_done() {
            return Err(TrackerError::RoundOver);
        }
        if payload.is_terminal() {
            self.state = TrackerState::RoundDone;
            self.outcome = Some(payload.status);
            return Ok(TrackerEvent::Finished(payload.status));
        }

        let card = payload.card()?;
        let owner = self.assign(card)?;
        Ok(TrackerEvent::Dealt { owner, card })
    }

    fn assign(&mut self, card: Card) -> Result<CardOwner, TrackerError> {
        use TrackerState::*;

        let (owner, next) = match self.state {
            AwaitPlayerFirst => (CardOwner::Player, AwaitPlayerSecond),
            AwaitPlayerSecond => (CardOwner::Player, AwaitDealerUp),
            AwaitDealerUp => (CardOwner::Dealer, PlayerDecision),
            PlayerDecision if self.hit_pending => {
                self.hit_pending = false;
                (CardOwner::Player, PlayerDecision)
            }
            // No hit in flight: the player stood without us noticing, so this
            // is the dealer's reveal.
            PlayerDecision | AwaitDealerHidden | DealerHits => (CardOwner::Dealer, DealerHits),
            RoundDone => return Err(TrackerError::RoundOver),
        };

        match owner {
            CardOwner::Player => self.player.push(card),
            CardOwner::Dealer => self.dealer.push(card),
        }
        self.state = next;
        Ok(owner)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
