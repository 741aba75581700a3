//! All Blackijecky wire records.
//!
//! Every record starts with the same 5-byte header, `magic(4) | type(1)`,
//! followed by a fixed-size body.  Nothing is length-prefixed: the reader
//! always knows which record it expects next, and therefore its size.
//!
//! | Record       | Body                                         | Total |
//! |--------------|----------------------------------------------|-------|
//! | Offer        | `tcp_port(2) \| name(32)`                    | 39 B  |
//! | Request      | `rounds(1) \| name(32)`                      | 38 B  |
//! | Payload-Card | `status(1) \| rank(2) \| suit(1)`            | 9 B   |
//! | Decision     | `decision(5)` (`"Hittt"` or `"Stand"`)       | 10 B  |

use crate::domain::card::Card;
use crate::domain::round::RoundStatus;
use crate::domain::DomainError;

// ── Protocol constants ────────────────────────────────────────────────────────

/// Sentinel value opening every record.
pub const MAGIC_COOKIE: u32 = 0xABCD_DCBA;

/// Well-known UDP port on which offers are broadcast.
pub const DISCOVERY_PORT: u16 = 13122;

/// Size of the shared `magic | type` header.
pub const HEADER_SIZE: usize = 5;

/// Width of the NUL-padded UTF-8 name fields.
pub const NAME_LEN: usize = 32;

/// Width of the NUL-padded ASCII decision field.
pub const DECISION_LEN: usize = 5;

pub const OFFER_SIZE: usize = HEADER_SIZE + 2 + NAME_LEN;
pub const REQUEST_SIZE: usize = HEADER_SIZE + 1 + NAME_LEN;
pub const CARD_PAYLOAD_SIZE: usize = HEADER_SIZE + 1 + 2 + 1;
pub const DECISION_SIZE: usize = HEADER_SIZE + DECISION_LEN;

// ── Message type codes ────────────────────────────────────────────────────────

/// The `type` byte of the header.
///
/// Payload-Card and Decision records share [`MessageType::Payload`]; they are
/// told apart by direction (server → client carries cards, client → server
/// carries decisions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    Offer = 0x02,
    Request = 0x03,
    Payload = 0x04,
}

impl TryFrom<u8> for MessageType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0x02 => Ok(MessageType::Offer),
            0x03 => Ok(MessageType::Request),
            0x04 => Ok(MessageType::Payload),
            _ => Err(()),
        }
    }
}

// ── Records ───────────────────────────────────────────────────────────────────

/// OFFER: broadcast by the server once a second over UDP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferMessage {
    /// TCP port the server accepts game connections on.
    pub tcp_port: u16,
    /// Display name, at most [`NAME_LEN`] bytes once UTF-8 encoded.
    pub server_name: String,
}

/// REQUEST: the first record a client sends after connecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMessage {
    /// Number of rounds to play, `1..=255`.
    pub rounds: u8,
    /// Team display name, at most [`NAME_LEN`] bytes once UTF-8 encoded.
    pub team_name: String,
}

/// PAYLOAD (server → client): a dealt card, or the end of a round.
///
/// For terminal statuses the `rank` and `suit` fields are zero and carry no
/// meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardPayload {
    pub status: RoundStatus,
    pub rank: u16,
    pub suit: u8,
}

impl CardPayload {
    /// A `continue` record carrying `card`.
    pub fn dealt(card: Card) -> Self {
        Self {
            status: RoundStatus::Continue,
            rank: u16::from(card.rank()),
            suit: card.suit() as u8,
        }
    }

    /// A round-ending record with zeroed card fields.
    pub fn finished(status: RoundStatus) -> Self {
        Self {
            status,
            rank: 0,
            suit: 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The card carried by a `continue` record.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] when rank or suit are out of range (always the
    /// case for terminal records).
    pub fn card(&self) -> Result<Card, DomainError> {
        Card::from_wire(self.rank, self.suit)
    }
}

/// PAYLOAD (client → server): the player's choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Hit,
    Stand,
}

impl Decision {
    /// The exact five bytes written to the wire.
    pub fn wire_text(self) -> &'static [u8; DECISION_LEN] {
        match self {
            Decision::Hit => b"Hittt",
            Decision::Stand => b"Stand",
        }
    }

    /// Interprets a received decision field.
    ///
    /// Anything starting with `h` or `H` is a hit; everything else stands.
    pub fn from_wire_text(text: &[u8]) -> Self {
        match text.first() {
            Some(b) if b.eq_ignore_ascii_case(&b'h') => Decision::Hit,
            _ => Decision::Stand,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::Suit;

    #[test]
    fn test_record_sizes_match_wire_layout() {
        assert_eq!(OFFER_SIZE, 39);
        assert_eq!(REQUEST_SIZE, 38);
        assert_eq!(CARD_PAYLOAD_SIZE, 9);
        assert_eq!(DECISION_SIZE, 10);
    }

    #[test]
    fn test_message_type_try_from_rejects_unknown() {
        assert_eq!(MessageType::try_from(0x04), Ok(MessageType::Payload));
        assert_eq!(MessageType::try_from(0x01), Err(()));
    }

    #[test]
    fn test_decision_from_wire_text_is_case_insensitive() {
        assert_eq!(Decision::from_wire_text(b"Hittt"), Decision::Hit);
        assert_eq!(Decision::from_wire_text(b"hit\0\0"), Decision::Hit);
        assert_eq!(Decision::from_wire_text(b"Stand"), Decision::Stand);
        assert_eq!(Decision::from_wire_text(b"xyz\0\0"), Decision::Stand);
        assert_eq!(Decision::from_wire_text(b""), Decision::Stand);
    }

    #[test]
    fn test_card_payload_dealt_carries_rank_and_suit() {
        let card = Card::new(12, Suit::Club).unwrap();
        let payload = CardPayload::dealt(card);
        assert_eq!(payload.status, RoundStatus::Continue);
        assert_eq!(payload.rank, 12);
        assert_eq!(payload.suit, 2);
        assert_eq!(payload.card(), Ok(card));
    }

    #[test]
    fn test_card_payload_finished_zeroes_card_fields() {
        let payload = CardPayload::finished(RoundStatus::Win);
        assert!(payload.is_terminal());
        assert_eq!((payload.rank, payload.suit), (0, 0));
        assert!(payload.card().is_err());
    }
}
