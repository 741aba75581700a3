//! Domain entities for Blackijecky.
//!
//! This module contains the game rules with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain**.  Domain code:
//!
//! - Contains the core rules of the application.
//! - Has **no** imports from network libraries, file systems, or consoles.
//! - Can be compiled and tested on any platform without any external setup.
//!
//! Both the server's round engine and the client's round tracker are built on
//! these types, so the two sides agree on hand totals by construction.

use thiserror::Error;

pub mod card;
pub mod deck;
pub mod hand;
pub mod round;
pub mod session;

/// Errors raised when constructing domain values from untrusted input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Card ranks run from 1 (ace) to 13 (king).
    #[error("invalid card rank: {0} (expected 1..=13)")]
    InvalidRank(u16),

    /// Suits are encoded as 0..=3.
    #[error("invalid suit: {0} (expected 0..=3)")]
    InvalidSuit(u8),

    /// A session must play at least one round.
    #[error("round count must be between 1 and 255, got {0}")]
    InvalidRoundCount(u8),
}
