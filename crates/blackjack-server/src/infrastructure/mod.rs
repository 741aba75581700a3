//! Infrastructure layer for the server.
//!
//! Contains OS-facing adapters: the UDP offer broadcaster, the TCP connection
//! supervisor, and the TOML configuration loader.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `blackjack_core`, but MUST NOT be imported by the `application` layer.

pub mod network;
pub mod storage;
