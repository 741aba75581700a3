//! Hands and the hand evaluator.
//!
//! # Soft aces (for beginners)
//!
//! An ace is worth 11 unless that would push the hand over 21, in which case
//! it is worth 1.  A hand holding an ace still counted as 11 is called *soft*.
//! [`hand_total`] starts with every ace at 11 and downgrades them one at a
//! time, only while the total is above 21.  The result is the largest total
//! that does not bust, or the smallest possible total when every assignment
//! busts.

use std::fmt;

use super::card::Card;

/// Blackjack: totals above this bust.
pub const BLACKJACK: u8 = 21;

/// Computes the blackjack total of `cards`.
///
/// Pure and deterministic; order of the cards does not matter.
pub fn hand_total(cards: &[Card]) -> u8 {
    let mut total: u32 = cards.iter().map(|c| u32::from(c.value())).sum();
    let mut soft_aces = cards.iter().filter(|c| c.is_ace()).count();

    while total > u32::from(BLACKJACK) && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }

    total.min(u32::from(u8::MAX)) as u8
}

/// An ordered, append-only sequence of cards belonging to one side of a round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn total(&self) -> u8 {
        hand_total(&self.cards)
    }

    pub fn is_bust(&self) -> bool {
        self.total() > BLACKJACK
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{card}")?;
        }
        write!(f, " (total {})", self.total())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
