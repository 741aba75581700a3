//! TOML-based configuration for the server.
//!
//! The file is optional.  When present it lives at the platform-appropriate
//! location:
//! - Windows:  `%APPDATA%\Blackijecky\server.toml`
//! - Linux:    `~/.config/blackijecky/server.toml`
//! - macOS:    `~/Library/Application Support/Blackijecky/server.toml`
//!
//! A different file can be named with `--config`.  Example:
//!
//! ```toml
//! [server]
//! name = "TeamDealer"
//! log_level = "debug"
//!
//! [network]
//! tcp_port = 12345
//! bind_address = "0.0.0.0"
//! discovery_port = 13122
//! broadcast_address = "255.255.255.255"
//! ```
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration.

use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

pub use blackjack_core::config::ConfigError;
use blackjack_core::config;
use blackjack_core::protocol::DISCOVERY_PORT;
use serde::{Deserialize, Serialize};

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "server.toml";

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub network: NetworkConfig,
}

/// Identity and logging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    /// Display name advertised in every Offer (at most 32 bytes on the wire).
    #[serde(default = "default_name")]
    pub name: String,
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Ports and addresses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// TCP port for game sessions.  `0` lets the OS choose.
    #[serde(default = "default_tcp_port")]
    pub tcp_port: u16,
    /// Interface to accept connections on.
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,
    /// UDP port Offers are broadcast to.
    #[serde(default = "default_discovery_port")]
    pub discovery_port: u16,
    /// Destination address for Offers.
    #[serde(default = "default_broadcast_address")]
    pub broadcast_address: IpAddr,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_name() -> String {
    "TeamDealer".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_tcp_port() -> u16 {
    12345
}
fn default_bind_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}
fn default_discovery_port() -> u16 {
    DISCOVERY_PORT
}
fn default_broadcast_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::BROADCAST)
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            tcp_port: default_tcp_port(),
            bind_address: default_bind_address(),
            discovery_port: default_discovery_port(),
            broadcast_address: default_broadcast_address(),
        }
    }
}

// ── Config loading ────────────────────────────────────────────────────────────

/// Resolves the default config file path.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    config::config_file_path(CONFIG_FILE_NAME)
}

/// Loads the configuration from `path`, or from [`config_file_path`] when
/// `path` is `None`.
///
/// A missing file at the default location is not an error and yields
/// `ServerConfig::default()`.  A missing file that was named explicitly is.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    config::load_toml(path, CONFIG_FILE_NAME)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
