//! RoundEngine: deals and plays one round of blackjack against a connected client.
//!
//! The engine is an explicit state machine:
//!
//! ```text
//! Deal → PlayerTurn ─┬─ (player busts) ──→ BustResolve
//!                    └─ (player stands) ─→ DealerReveal → DealerTurn → Resolve
//! ```
//!
//! # What goes over the wire, and in which order
//!
//! The Payload-Card record has no "whose card is this" field.  The client
//! works that out purely from the order of records, so the order below is part
//! of the protocol, not an implementation detail:
//!
//! 1. Deal: player card 1, player card 2, dealer up-card.  The dealer's second
//!    card is drawn but stays hidden.
//! 2. Player turn: one card per `Hit` decision, sent straight back.
//! 3. Bust: a single `loss` record.  The dealer never plays.
//! 4. Otherwise: the hidden dealer card, then each dealer hit, then one
//!    terminal record with the outcome.
//!
//! Cards go on the wire with their real rank and suit; scoring always uses the
//! card itself, so the encoding cannot affect the outcome.

use blackjack_core::{
    dealer_should_hit, resolve, CardPayload, CardSource, Decision, Hand, RecordStream,
    RoundStatus, StreamError,
};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

/// The phases a round moves through on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Deal,
    PlayerTurn,
    BustResolve,
    DealerReveal,
    DealerTurn,
    Resolve,
}

/// Final state of a finished round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    /// Outcome from the player's point of view.
    pub status: RoundStatus,
    pub player: Hand,
    pub dealer: Hand,
}

/// Plays a single round with a [`CardSource`] it owns.
///
/// The deck lives exactly as long as the round; every round starts from a
/// fresh pack.
pub struct RoundEngine<C: CardSource> {
    deck: C,
    player: Hand,
    dealer: Hand,
}

impl<C: CardSource> RoundEngine<C> {
    pub fn new(deck: C) -> Self {
        Self {
            deck,
            player: Hand::new(),
            dealer: Hand::new(),
        }
    }

    /// Runs the round to completion over `stream`.
    ///
    /// # Errors
    ///
    /// Any [`StreamError`] aborts the round.  That includes a malformed
    /// Decision record: the engine cannot guess what the player meant, so it
    /// treats it as a protocol violation rather than a game event.
    pub async fn play<S>(mut self, stream: &mut RecordStream<S>) -> Result<RoundReport, StreamError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut phase = RoundPhase::Deal;
        loop {
            debug!(?phase, player = self.player.total(), dealer = self.dealer.total());
            phase = match phase {
                RoundPhase::Deal => {
                    self.deal(stream).await?;
                    RoundPhase::PlayerTurn
                }
                RoundPhase::PlayerTurn => self.player_turn(stream).await?,
                RoundPhase::BustResolve => return self.finish(stream, RoundStatus::Loss).await,
                RoundPhase::DealerReveal => {
                    let hidden = self.dealer.cards()[1];
                    stream.send(&CardPayload::dealt(hidden)).await?;
                    RoundPhase::DealerTurn
                }
                RoundPhase::DealerTurn => {
                    while dealer_should_hit(&self.dealer) {
                        let card = self.deck.draw();
                        self.dealer.push(card);
                        stream.send(&CardPayload::dealt(card)).await?;
                    }
                    RoundPhase::Resolve
                }
                RoundPhase::Resolve => {
                    let status = resolve(&self.player, &self.dealer);
                    return self.finish(stream, status).await;
                }
            };
        }
    }

    async fn deal<S>(&mut self, stream: &mut RecordStream<S>) -> Result<(), StreamError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        for _ in 0..2 {
            self.player.push(self.deck.draw());
            self.dealer.push(self.deck.draw());
        }
        for card in self.player.cards() {
            stream.send(&CardPayload::dealt(*card)).await?;
        }
        stream.send(&CardPayload::dealt(self.dealer.cards()[0])).await
    }

    /// Loops on decisions until the player busts or stands.
    async fn player_turn<S>(&mut self, stream: &mut RecordStream<S>) -> Result<RoundPhase, StreamError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        loop {
            if self.player.is_bust() {
                return Ok(RoundPhase::BustResolve);
            }
            match stream.recv::<Decision>().await? {
                Decision::Hit => {
                    let card = self.deck.draw();
                    self.player.push(card);
                    stream.send(&CardPayload::dealt(card)).await?;
                }
                Decision::Stand => return Ok(RoundPhase::DealerReveal),
            }
        }
    }

    async fn finish<S>(
        self,
        stream: &mut RecordStream<S>,
        status: RoundStatus,
    ) -> Result<RoundReport, StreamError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        stream.send(&CardPayload::finished(status)).await?;
        Ok(RoundReport {
            status,
            player: self.player,
            dealer: self.dealer,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
