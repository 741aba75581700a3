//! Application layer use cases for the client.
//!
//! # Sub-modules
//!
//! - **`track_round`** – The ownership inference state machine.  Given the
//!   stream of Payload-Card records and the decisions already sent, it decides
//!   whether each card went to the player or the dealer.  Pure logic with no
//!   I/O, so every ordering rule is unit-tested on its own.
//!
//! - **`play_session`** – The round loop: reads records, feeds the tracker,
//!   asks a [`play_session::DecisionMaker`] for hit/stand when the server is
//!   waiting, and keeps the session tally.

pub mod play_session;
pub mod track_round;
