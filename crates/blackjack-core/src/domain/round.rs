//! Round status and the rules that decide it.
//!
//! Statuses are always expressed from the player's point of view: `Win`
//! means the client won the round.

use super::hand::{Hand, BLACKJACK};
use super::DomainError;

/// The dealer keeps drawing while its total is below this value.
pub const DEALER_STANDS_ON: u8 = 17;

/// Round status as carried in the Payload-Card `status` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RoundStatus {
    Continue = 0,
    Tie = 1,
    Loss = 2,
    Win = 3,
}

impl RoundStatus {
    /// `true` for win, loss, and tie.
    pub fn is_terminal(self) -> bool {
        self != RoundStatus::Continue
    }
}

impl TryFrom<u8> for RoundStatus {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RoundStatus::Continue),
            1 => Ok(RoundStatus::Tie),
            2 => Ok(RoundStatus::Loss),
            3 => Ok(RoundStatus::Win),
            other => Err(other),
        }
    }
}

/// Whether the dealer must draw another card.
pub fn dealer_should_hit(dealer: &Hand) -> bool {
    dealer.total() < DEALER_STANDS_ON
}

/// Decides the outcome once both sides have finished drawing.
///
/// A busted player always loses, even if the dealer would also bust; the
/// round engine never lets the dealer play in that case anyway.
pub fn resolve(player: &Hand, dealer: &Hand) -> RoundStatus {
    let (p, d) = (player.total(), dealer.total());
    if p > BLACKJACK {
        RoundStatus::Loss
    } else if d > BLACKJACK || p > d {
        RoundStatus::Win
    } else if d > p {
        RoundStatus::Loss
    } else {
        RoundStatus::Tie
    }
}

/// Validates a requested round count against the `1..=255` session bound.
///
/// # Errors
///
/// Returns [`DomainError::InvalidRoundCount`] for zero.
pub fn validate_rounds(rounds: u8) -> Result<u8, DomainError> {
    if rounds == 0 {
        Err(DomainError::InvalidRoundCount(rounds))
    } else {
        Ok(rounds)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
