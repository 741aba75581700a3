//! Network infrastructure for the client.
//!
//! # Sub-modules
//!
//! - **`discovery`** – Listens on the well-known UDP port until a server's
//!   Offer arrives.
//!
//! - **`connection`** – Opens the TCP connection to the offering server and
//!   sends the Request record that starts the session.

pub mod connection;
pub mod discovery;
