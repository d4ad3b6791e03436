//! User configuration for the geodraw CLI.
//!
//! Read from `config.json` in the geodraw config directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

/// Default bound on each undo/redo stack
const DEFAULT_UNDO_HISTORY: usize = 100;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory of the shape store; the XDG data dir when unset
    pub storage_path: Option<PathBuf>,
    pub undo_history: usize,
    pub drawing_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: None,
            undo_history: DEFAULT_UNDO_HISTORY,
            drawing_enabled: true,
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location.
    ///
    /// A missing or unreadable file yields the defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if !path.exists() {
            debug!(?path, "no config file, using defaults");
            return Self::default();
        }
        match Self::read(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(?path, "ignoring config: {e:#}");
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
    }

    /// Get the config file path
    pub fn default_path() -> PathBuf {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".config")
            });
        config_dir.join("geodraw").join("config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.json")));
        assert_eq!(config, Config::default());
        assert_eq!(config.undo_history, 100);
        assert!(config.drawing_enabled);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"undo_history": 5}"#).unwrap();

        let config = Config::load(Some(&path));
        assert_eq!(config.undo_history, 5);
        assert!(config.drawing_enabled);
        assert!(config.storage_path.is_none());
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(Config::load(Some(&path)), Config::default());
    }
}
