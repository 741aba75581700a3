//! Application layer use cases for the server.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure game rules in `blackjack_core`) and the infrastructure (sockets,
//! config files).  Use cases here are generic over the transport, so every
//! one of them can be driven from an in-memory pipe in tests.
//!
//! # Sub-modules
//!
//! - **`round_engine`** – Deals one round to a connected player and plays the
//!   dealer's hand.  The order in which it sends cards is what lets the client
//!   work out who owns each card.
//!
//! - **`host_session`** – Handles the Request handshake and then runs the
//!   requested number of rounds, keeping the win/loss/tie tally.

pub mod host_session;
pub mod round_engine;
