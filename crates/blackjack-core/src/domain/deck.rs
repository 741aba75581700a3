//! The dealer's deck and the [`CardSource`] seam the round engine draws from.
//!
//! A [`Deck`] holds one standard 52-card pack.  Drawing from an empty deck
//! transparently refills and reshuffles it first, so a draw never fails and
//! the deck never reports a negative size.
//!
//! The deck owns its random number generator (an OS-seeded [`StdRng`]), which
//! keeps it `Send` and lets it live inside a single connection task without
//! any synchronisation.

use std::collections::VecDeque;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use super::card::{Card, Suit};

/// Number of cards in a standard pack.
pub const DECK_SIZE: usize = 52;

/// Anything the round engine can draw cards from.
///
/// The production implementation is [`Deck`]; [`StackedDeck`] deals a
/// predetermined sequence for tests and replays.
pub trait CardSource: Send {
    /// Removes and returns the next card.  Never fails.
    fn draw(&mut self) -> Card;
}

/// A shuffled 52-card pack that refills itself when exhausted.
pub struct Deck {
    cards: Vec<Card>,
    rng: StdRng,
}

impl Deck {
    /// Creates a freshly shuffled deck seeded from the operating system.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Creates a deck whose shuffles are reproducible for a given `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut deck = Self {
            cards: Vec::with_capacity(DECK_SIZE),
            rng,
        };
        deck.refill();
        deck
    }

    /// Number of cards left before the next reshuffle.
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    fn refill(&mut self) {
        self.cards.clear();
        self.cards.extend(standard_pack());
        self.cards.shuffle(&mut self.rng);
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl CardSource for Deck {
    fn draw(&mut self) -> Card {
        if self.cards.is_empty() {
            self.refill();
        }
        match self.cards.pop() {
            Some(card) => card,
            // refill() always leaves DECK_SIZE cards behind.
            None => unreachable!("deck is empty after refill"),
        }
    }
}

/// Deals a fixed sequence of cards, then falls back to a seeded [`Deck`].
pub struct StackedDeck {
    stacked: VecDeque<Card>,
    fallback: Deck,
}

impl StackedDeck {
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            stacked: cards.into_iter().collect(),
            fallback: Deck::seeded(0),
        }
    }

    /// Convenience constructor from ranks only; suits cycle through [`Suit::ALL`].
    ///
    /// Ranks outside `1..=13` are skipped.
    pub fn from_ranks(ranks: &[u8]) -> Self {
        let cards = ranks
            .iter()
            .enumerate()
            .filter_map(|(i, &rank)| Card::new(rank, Suit::ALL[i % 4]).ok());
        Self::new(cards)
    }

    /// Cards still waiting in the stacked sequence.
    pub fn stacked_remaining(&self) -> usize {
        self.stacked.len()
    }
}

impl CardSource for StackedDeck {
    fn draw(&mut self) -> Card {
        self.stacked
            .pop_front()
            .unwrap_or_else(|| self.fallback.draw())
    }
}

fn standard_pack() -> impl Iterator<Item = Card> {
    Suit::ALL.into_iter().flat_map(|suit| {
        (Card::ACE..=Card::KING).filter_map(move |rank| Card::new(rank, suit).ok())
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
