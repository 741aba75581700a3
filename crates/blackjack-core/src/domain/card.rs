//! Playing cards.
//!
//! A [`Card`] stores its rank (1 = ace … 13 = king) and its suit.  The
//! blackjack scoring value is derived from the rank on demand; it is never
//! stored, so a card can never disagree with its own value.

use std::fmt;

use super::DomainError;

/// Card suit.  The discriminant is the value carried in the wire `suit` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Suit {
    Heart = 0,
    Diamond = 1,
    Club = 2,
    Spade = 3,
}

impl Suit {
    /// All four suits in wire order.
    pub const ALL: [Suit; 4] = [Suit::Heart, Suit::Diamond, Suit::Club, Suit::Spade];
}

impl TryFrom<u8> for Suit {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Suit::Heart),
            1 => Ok(Suit::Diamond),
            2 => Ok(Suit::Club),
            3 => Ok(Suit::Spade),
            other => Err(DomainError::InvalidSuit(other)),
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Suit::Heart => "Heart",
            Suit::Diamond => "Diamond",
            Suit::Club => "Club",
            Suit::Spade => "Spade",
        };
        f.write_str(name)
    }
}

/// An immutable playing card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    rank: u8,
    suit: Suit,
}

impl Card {
    pub const ACE: u8 = 1;
    pub const KING: u8 = 13;

    /// Creates a card, validating that `rank` lies in `1..=13`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidRank`] for any other rank.
    pub fn new(rank: u8, suit: Suit) -> Result<Self, DomainError> {
        if !(Self::ACE..=Self::KING).contains(&rank) {
            return Err(DomainError::InvalidRank(rank as u16));
        }
        Ok(Self { rank, suit })
    }

    /// Builds a card from the raw wire fields of a Payload-Card record.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] when either field is out of range.
    pub fn from_wire(rank: u16, suit: u8) -> Result<Self, DomainError> {
        let rank = u8::try_from(rank).map_err(|_| DomainError::InvalidRank(rank))?;
        Card::new(rank, Suit::try_from(suit)?)
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Scoring value: ace counts 11, face cards 10, everything else its rank.
    ///
    /// Aces are downgraded to 1 by [`crate::hand_total`], not here.
    pub fn value(&self) -> u8 {
        match self.rank {
            Self::ACE => 11,
            11..=13 => 10,
            r => r,
        }
    }

    pub fn is_ace(&self) -> bool {
        self.rank == Self::ACE
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rank {
            1 => write!(f, "Ace of {}", self.suit),
            11 => write!(f, "Jack of {}", self.suit),
            12 => write!(f, "Queen of {}", self.suit),
            13 => write!(f, "King of {}", self.suit),
            r => write!(f, "{r} of {}", self.suit),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
