//! Storage infrastructure: configuration file loading.
//!
//! The server keeps no state between runs.  The only file it touches is its
//! optional TOML configuration, which is read once at startup.

pub mod config;
