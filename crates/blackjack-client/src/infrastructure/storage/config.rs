//! TOML-based configuration for the client.
//!
//! Optional file at the platform-appropriate location:
//! - Windows:  `%APPDATA%\Blackijecky\client.toml`
//! - Linux:    `~/.config/blackijecky/client.toml`
//! - macOS:    `~/Library/Application Support/Blackijecky/client.toml`
//!
//! ```toml
//! [client]
//! team_name = "TeamPlayer"
//! log_level = "info"
//!
//! [network]
//! discovery_port = 13122
//!
//! [strategy]
//! stand_on = 17
//! ```

use std::path::{Path, PathBuf};

pub use blackjack_core::config::ConfigError;
use blackjack_core::config;
use blackjack_core::protocol::DISCOVERY_PORT;
use serde::{Deserialize, Serialize};

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "client.toml";

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    #[serde(default)]
    pub client: ClientSection,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub strategy: StrategyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientSection {
    /// Name sent in the Request record.
    #[serde(default = "default_team_name")]
    pub team_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// UDP port to listen on for Offers.
    #[serde(default = "default_discovery_port")]
    pub discovery_port: u16,
}

/// Settings for the automatic player (`--auto`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategyConfig {
    /// The automatic player stands once its total reaches this value.
    #[serde(default = "default_stand_on")]
    pub stand_on: u8,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_team_name() -> String {
    "TeamPlayer".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_discovery_port() -> u16 {
    DISCOVERY_PORT
}
fn default_stand_on() -> u8 {
    17
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            team_name: default_team_name(),
            log_level: default_log_level(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            discovery_port: default_discovery_port(),
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            stand_on: default_stand_on(),
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
/// `ClientConfig::default()`.  A missing file that was named explicitly is.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    config::load_toml(path, CONFIG_FILE_NAME)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
