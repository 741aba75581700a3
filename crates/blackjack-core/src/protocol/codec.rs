//! Binary codec for encoding and decoding Blackijecky records.
//!
//! Wire format:
//! ```text
//! [magic:4][msg_type:1][body:N]
//! ```
//! All multi-byte integers are big-endian.  Every field is always present, and
//! each record type has a fixed total size ([`Record::SIZE`]).

use thiserror::Error;

use crate::domain::round::RoundStatus;
use crate::protocol::messages::{
    CardPayload, Decision, MessageType, OfferMessage, RequestMessage, CARD_PAYLOAD_SIZE,
    DECISION_LEN, DECISION_SIZE, HEADER_SIZE, MAGIC_COOKIE, NAME_LEN, OFFER_SIZE, REQUEST_SIZE,
};

/// Errors that can occur during record decoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The byte slice is shorter than the record's fixed size.
    #[error("truncated record: need {needed} bytes, got {available}")]
    TruncatedRecord { needed: usize, available: usize },

    /// The first four bytes are not [`MAGIC_COOKIE`].
    #[error("bad magic cookie: 0x{0:08X}")]
    BadMagic(u32),

    /// The type byte does not match the record expected in this slot.
    #[error("unexpected message type: expected {expected:?}, found 0x{found:02X}")]
    UnexpectedType { expected: MessageType, found: u8 },

    /// A body field could not be parsed (status out of range, invalid UTF-8, etc.).
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl ProtocolError {
    /// `true` for records that arrived whole but with bad contents.
    ///
    /// These may be discarded while the connection continues; truncation
    /// cannot be recovered from.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, ProtocolError::TruncatedRecord { .. })
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// A fixed-layout wire record.
///
/// Implementors only describe their body; the header and size checks are
/// shared by the provided [`Record::encode`] and [`Record::decode`].
///
/// # Examples
///
/// ```rust
/// use blackjack_core::protocol::codec::Record;
/// use blackjack_core::protocol::messages::RequestMessage;
///
/// let msg = RequestMessage { rounds: 3, team_name: "TeamPlayer".to_string() };
/// let bytes = msg.encode();
/// assert_eq!(bytes.len(), RequestMessage::SIZE);
/// assert_eq!(RequestMessage::decode(&bytes).unwrap(), msg);
/// ```
pub trait Record: Sized {
    /// Header type byte this record is sent with.
    const MESSAGE_TYPE: MessageType;

    /// Total encoded size, header included.
    const SIZE: usize;

    /// Appends exactly `SIZE - HEADER_SIZE` body bytes.
    fn encode_body(&self, buf: &mut Vec<u8>);

    /// Parses a body slice of exactly `SIZE - HEADER_SIZE` bytes.
    fn decode_body(body: &[u8]) -> Result<Self, ProtocolError>;

    /// Encodes the full record, header included.
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::SIZE);
        buf.extend_from_slice(&MAGIC_COOKIE.to_be_bytes());
        buf.push(Self::MESSAGE_TYPE as u8);
        self.encode_body(&mut buf);
        debug_assert_eq!(buf.len(), Self::SIZE);
        buf
    }

    /// Decodes one record from the beginning of `bytes`.
    ///
    /// Bytes beyond [`Record::SIZE`] are ignored.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::TruncatedRecord`] when fewer than `SIZE` bytes are
    /// given, otherwise a malformed-record variant on magic, type, or body
    /// mismatch.  Short input is never zero-filled.
    fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        if bytes.len() < Self::SIZE {
            return Err(ProtocolError::TruncatedRecord {
                needed: Self::SIZE,
                available: bytes.len(),
            });
        }

        let magic = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if magic != MAGIC_COOKIE {
            return Err(ProtocolError::BadMagic(magic));
        }

        let found = bytes[4];
        if found != Self::MESSAGE_TYPE as u8 {
            return Err(ProtocolError::UnexpectedType {
                expected: Self::MESSAGE_TYPE,
                found,
            });
        }

        Self::decode_body(&bytes[HEADER_SIZE..Self::SIZE])
    }
}

// ── Per-record bodies ─────────────────────────────────────────────────────────

impl Record for OfferMessage {
    const MESSAGE_TYPE: MessageType = MessageType::Offer;
    const SIZE: usize = OFFER_SIZE;

    fn encode_body(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.tcp_port.to_be_bytes());
        write_padded_name(buf, &self.server_name);
    }

    fn decode_body(p: &[u8]) -> Result<Self, ProtocolError> {
        Ok(Self {
            tcp_port: u16::from_be_bytes([p[0], p[1]]),
            server_name: read_padded_name(&p[2..2 + NAME_LEN])?,
        })
    }
}

impl Record for RequestMessage {
    const MESSAGE_TYPE: MessageType = MessageType::Request;
    const SIZE: usize = REQUEST_SIZE;

    fn encode_body(&self, buf: &mut Vec<u8>) {
        buf.push(self.rounds);
        write_padded_name(buf, &self.team_name);
    }

    fn decode_body(p: &[u8]) -> Result<Self, ProtocolError> {
        Ok(Self {
            rounds: p[0],
            team_name: read_padded_name(&p[1..1 + NAME_LEN])?,
        })
    }
}

impl Record for CardPayload {
    const MESSAGE_TYPE: MessageType = MessageType::Payload;
    const SIZE: usize = CARD_PAYLOAD_SIZE;

    fn encode_body(&self, buf: &mut Vec<u8>) {
        buf.push(self.status as u8);
        buf.extend_from_slice(&self.rank.to_be_bytes());
        buf.push(self.suit);
    }

    fn decode_body(p: &[u8]) -> Result<Self, ProtocolError> {
        let status = RoundStatus::try_from(p[0])
            .map_err(|s| ProtocolError::MalformedPayload(format!("unknown round status: {s}")))?;
        Ok(Self {
            status,
            rank: u16::from_be_bytes([p[1], p[2]]),
            suit: p[3],
        })
    }
}

impl Record for Decision {
    const MESSAGE_TYPE: MessageType = MessageType::Payload;
    const SIZE: usize = DECISION_SIZE;

    fn encode_body(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.wire_text());
    }

    fn decode_body(p: &[u8]) -> Result<Self, ProtocolError> {
        Ok(Decision::from_wire_text(&p[..DECISION_LEN]))
    }
}

// ── Primitive helpers ─────────────────────────────────────────────────────────

/// Writes `name` as exactly [`NAME_LEN`] bytes: UTF-8, truncated on a
/// character boundary, NUL-padded.
fn write_padded_name(buf: &mut Vec<u8>, name: &str) {
    let mut end = name.len().min(NAME_LEN);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    buf.extend_from_slice(&name.as_bytes()[..end]);
    buf.resize(buf.len() + (NAME_LEN - end), 0);
}

/// Reads a NUL-padded UTF-8 name field, dropping the padding.
fn read_padded_name(field: &[u8]) -> Result<String, ProtocolError> {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    std::str::from_utf8(&field[..end])
        .map(str::to_string)
        .map_err(|e| ProtocolError::MalformedPayload(format!("invalid UTF-8 in name: {e}")))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::{Card, Suit};

    fn round_trip<R: Record + std::fmt::Debug + PartialEq>(msg: &R) -> R {
        let encoded = msg.encode();
        assert_eq!(encoded.len(), R::SIZE, "encoded size must be fixed");
        R::decode(&encoded).expect("decode failed")
    }

    // ── Offer ────────────────────────────────────────────────────────────────

    #[test]
    fn test_offer_round_trip() {
        let msg = OfferMessage {
            tcp_port: 12345,
            server_name: "TeamDealer".to_string(),
        };
        assert_eq!(round_trip(&msg), msg);
    }

    #[test]
    fn test_offer_exact_byte_layout() {
        // Arrange
        let msg = OfferMessage {
            tcp_port: 0x3039,
            server_name: "AB".to_string(),
        };

        // Act
        let bytes = msg.encode();

        // Assert
        assert_eq!(&bytes[..4], &[0xAB, 0xCD, 0xDC, 0xBA]);
        assert_eq!(bytes[4], 0x02);
        assert_eq!(&bytes[5..7], &[0x30, 0x39]);
        assert_eq!(&bytes[7..9], b"AB");
        assert!(bytes[9..].iter().all(|&b| b == 0), "name must be NUL-padded");
    }

    #[test]
    fn test_offer_name_longer_than_field_is_truncated() {
        let msg = OfferMessage {
            tcp_port: 1,
            server_name: "x".repeat(40),
        };
        let decoded = round_trip(&msg);
        assert_eq!(decoded.server_name, "x".repeat(NAME_LEN));
    }

    #[test]
    fn test_multibyte_name_truncates_on_char_boundary() {
        // 11 three-byte characters = 33 bytes; only 10 fit in 32 bytes.
        let msg = RequestMessage {
            rounds: 1,
            team_name: "€".repeat(11),
        };
        let decoded = round_trip(&msg);
        assert_eq!(decoded.team_name, "€".repeat(10));
    }

    // ── Request ──────────────────────────────────────────────────────────────

    #[test]
    fn test_request_round_trip() {
        let msg = RequestMessage {
            rounds: 255,
            team_name: "TeamPlayer".to_string(),
        };
        assert_eq!(round_trip(&msg), msg);
    }

    #[test]
    fn test_request_empty_name_round_trip() {
        let msg = RequestMessage {
            rounds: 1,
            team_name: String::new(),
        };
        assert_eq!(round_trip(&msg), msg);
    }

    #[test]
    fn test_request_invalid_utf8_name_is_malformed() {
        // Arrange
        let mut bytes = RequestMessage {
            rounds: 1,
            team_name: "ok".to_string(),
        }
        .encode();
        bytes[6] = 0xFF;

        // Act
        let result = RequestMessage::decode(&bytes);

        // Assert
        assert!(matches!(result, Err(ProtocolError::MalformedPayload(_))));
    }

    // ── Payload-Card ─────────────────────────────────────────────────────────

    #[test]
    fn test_card_payload_round_trip() {
        let msg = CardPayload::dealt(Card::new(13, Suit::Spade).unwrap());
        assert_eq!(round_trip(&msg), msg);
    }

    #[test]
    fn test_card_payload_exact_byte_layout() {
        let bytes = CardPayload::dealt(Card::new(10, Suit::Diamond).unwrap()).encode();
        assert_eq!(&bytes[4..], &[0x04, 0x00, 0x00, 0x0A, 0x01]);
    }

    #[test]
    fn test_card_payload_terminal_round_trip() {
        let msg = CardPayload::finished(RoundStatus::Tie);
        assert_eq!(round_trip(&msg), msg);
    }

    #[test]
    fn test_card_payload_unknown_status_is_malformed() {
        let mut bytes = CardPayload::finished(RoundStatus::Win).encode();
        bytes[5] = 9;
        assert!(matches!(
            CardPayload::decode(&bytes),
            Err(ProtocolError::MalformedPayload(_))
        ));
    }

    // ── Decision ─────────────────────────────────────────────────────────────

    #[test]
    fn test_decision_round_trip() {
        assert_eq!(round_trip(&Decision::Hit), Decision::Hit);
        assert_eq!(round_trip(&Decision::Stand), Decision::Stand);
    }

    #[test]
    fn test_decision_wire_text() {
        assert_eq!(&Decision::Hit.encode()[5..], b"Hittt");
        assert_eq!(&Decision::Stand.encode()[5..], b"Stand");
    }

    // ── Error paths ──────────────────────────────────────────────────────────

    #[test]
    fn test_decode_short_input_is_truncated_not_zero_filled() {
        let bytes = RequestMessage {
            rounds: 3,
            team_name: "t".to_string(),
        }
        .encode();

        let result = RequestMessage::decode(&bytes[..37]);

        assert_eq!(
            result,
            Err(ProtocolError::TruncatedRecord {
                needed: 38,
                available: 37
            })
        );
    }

    #[test]
    fn test_decode_bad_magic_is_rejected() {
        let mut bytes = Decision::Stand.encode();
        bytes[0] = 0x00;
        assert_eq!(
            Decision::decode(&bytes),
            Err(ProtocolError::BadMagic(0x00CD_DCBA))
        );
    }

    #[test]
    fn test_decode_wrong_type_is_rejected() {
        // An offer-typed header where a request is expected.
        let mut bytes = RequestMessage {
            rounds: 1,
            team_name: String::new(),
        }
        .encode();
        bytes[4] = MessageType::Offer as u8;

        assert_eq!(
            RequestMessage::decode(&bytes),
            Err(ProtocolError::UnexpectedType {
                expected: MessageType::Request,
                found: 0x02
            })
        );
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let mut bytes = CardPayload::finished(RoundStatus::Loss).encode();
        bytes.extend_from_slice(&[0xEE; 4]);
        assert_eq!(
            CardPayload::decode(&bytes),
            Ok(CardPayload::finished(RoundStatus::Loss))
        );
    }

    #[test]
    fn test_is_malformed_classification() {
        assert!(ProtocolError::BadMagic(0).is_malformed());
        assert!(ProtocolError::MalformedPayload(String::new()).is_malformed());
        assert!(!ProtocolError::TruncatedRecord {
            needed: 9,
            available: 3
        }
        .is_malformed());
    }
}
