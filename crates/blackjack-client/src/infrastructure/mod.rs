//! Infrastructure layer for the client.
//!
//! OS-facing adapters: the UDP offer listener, the TCP connection, the
//! terminal, and the TOML configuration loader.

pub mod console;
pub mod network;
pub mod storage;
