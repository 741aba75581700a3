//! Shared config-file plumbing for the server and client binaries.
//!
//! Each binary defines its own TOML schema; this module only knows where
//! config files live and how to read one.  The platform directory is:
//! - Windows:  `%APPDATA%\Blackijecky\`
//! - Linux:    `$XDG_CONFIG_HOME/blackijecky/` or `~/.config/blackijecky/`
//! - macOS:    `~/Library/Application Support/Blackijecky/`

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Path of `file_name` inside the platform config directory.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path(file_name: &str) -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join(file_name))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads a TOML config from `path`, or from `file_name` in the platform
/// config directory when `path` is `None`.
///
/// A missing file at the default location is not an error and yields
/// `T::default()`.  A missing file that was named explicitly is.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_toml<T>(path: Option<&Path>, file_name: &str) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default,
{
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => match config_file_path(file_name) {
            Ok(p) => (p, false),
            Err(_) => return Ok(T::default()),
        },
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !explicit => Ok(T::default()),
        Err(source) => Err(ConfigError::Io { path, source }),
    }
}

/// Resolves the platform config base directory including the `Blackijecky`
/// subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Blackijecky"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("blackijecky"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("Blackijecky")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use uuid::Uuid;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Sample {
        #[serde(default)]
        name: String,
    }

    fn temp_file(content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("blackijecky_core_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sample.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_toml_reads_explicit_file() {
        // Arrange
        let path = temp_file("name = \"Casino\"\n");

        // Act
        let sample: Sample = load_toml(Some(&path), "sample.toml").unwrap();

        // Assert
        assert_eq!(sample.name, "Casino");
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_load_toml_missing_explicit_file_is_io_error() {
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/sample.toml");

        let result: Result<Sample, _> = load_toml(Some(&path), "sample.toml");

        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_toml_malformed_file_is_parse_error() {
        let path = temp_file("[[[ not valid toml");

        let result: Result<Sample, _> = load_toml(Some(&path), "sample.toml");

        assert!(matches!(result, Err(ConfigError::Parse(_))));
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_config_file_path_ends_with_file_name() {
        if let Ok(path) = config_file_path("server.toml") {
            assert!(path.ends_with("blackijecky/server.toml") || path.ends_with("Blackijecky/server.toml"), "got {path:?}");
        }
        // NoPlatformConfigDir in a stripped environment is also acceptable.
    }
}
