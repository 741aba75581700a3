//! # blackjack-core
//!
//! Shared library for Blackijecky containing the fixed-layout wire codec, the
//! stream reassembler, and the blackjack domain entities.
//!
//! This crate is used by both the server and the client applications.
//! It never opens a socket: the record stream is generic over any
//! `AsyncRead + AsyncWrite` transport, which keeps everything here testable
//! with in-memory pipes.
//!
//! # Architecture overview (for beginners)
//!
//! Blackijecky is a LAN blackjack game.  A server advertises itself over UDP
//! broadcast, clients pick up the advertisement, connect over TCP, ask for a
//! number of rounds, and then play those rounds one after the other.
//!
//! This crate (`blackjack-core`) is the shared foundation.  It defines:
//!
//! - **`protocol`** – How bytes travel over the network.  Every record has a
//!   fixed size (Offer 39 B, Request 38 B, Payload-Card 9 B, Decision 10 B),
//!   so a reader only ever needs to know *which* record it expects next.
//!   The reassembler turns TCP's byte stream back into those records.
//!
//! - **`domain`** – Pure game rules with no I/O: cards, the deck, hand totals
//!   with soft aces, the dealer's drawing rule, round resolution, and the
//!   per-session win/loss/tie tally.
//!
//! - **`config`** – Where the binaries' TOML config files live and how they
//!   are read.  Each binary owns its own schema.

pub mod config;
pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `blackjack_core::Hand` instead of `blackjack_core::domain::hand::Hand`.
pub use domain::card::{Card, Suit};
pub use domain::deck::{CardSource, Deck, StackedDeck};
pub use domain::hand::{hand_total, Hand};
pub use domain::round::{dealer_should_hit, resolve, RoundStatus};
pub use domain::session::{clamp_rounds, Session, SessionTally};
pub use domain::DomainError;
pub use protocol::codec::{ProtocolError, Record};
pub use protocol::messages::{CardPayload, Decision, OfferMessage, RequestMessage};
pub use protocol::stream::{RecordStream, StreamError};
