//! Network infrastructure for the server.
//!
//! # Sub-modules
//!
//! - **`discovery`** – Broadcasts an Offer record on the LAN once per second so
//!   clients can find the server without knowing its address.
//!
//! - **`supervisor`** – Owns the TCP listener and runs every accepted
//!   connection as an independent session task.
//!
//! - **`local_addr`** – Works out which LAN address to print in the startup
//!   banner.

pub mod discovery;
pub mod local_addr;
pub mod supervisor;
