//! Configuration file support for lanes
//!
//! Reads from .lanes/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::db::LANES_DIR;
use crate::model::ViewKind;

pub const CONFIG_FILE: &str = "config.toml";

/// A config file that exists but could not be used
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("ignoring malformed {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Configuration structure
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Board settings
    #[serde(default)]
    pub board: BoardConfig,

    /// Log settings
    #[serde(default)]
    pub log: LogConfig,
}

/// Board-related configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BoardConfig {
    /// Name shown in the TUI header
    #[serde(default = "default_name")]
    pub name: String,

    /// View the TUI opens in ("status" or "context")
    #[serde(default)]
    pub default_view: ViewKind,

    /// Status given to tasks created from the context view
    #[serde(default = "default_status")]
    pub default_status: String,

    /// Context given to tasks created from the status view
    #[serde(default = "default_context")]
    pub default_context: String,

    /// Stack columns vertically instead of side by side
    #[serde(default)]
    pub vertical: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LogConfig {
    /// Filter used when LANES_LOG is unset, e.g. "info" or "lanes=debug"
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_name() -> String {
    "Lanes".to_string()
}

fn default_status() -> String {
    "todo".to_string()
}

fn default_context() -> String {
    "c1".to_string()
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            default_view: ViewKind::default(),
            default_status: default_status(),
            default_context: default_context(),
            vertical: false,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Config {
    /// Load config from .lanes/config.toml
    /// Returns default config if no file is found; a file that exists but
    /// can't be read or parsed is an error the caller decides how to report
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit path. A missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Find config.toml by walking up directory tree
    fn find_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut dir = current_dir.as_path();

        loop {
            let config_path = dir.join(LANES_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            match dir.parent() {
                Some(parent) => dir = parent,
                None => break,
            }
        }
        None
    }

    /// Serialized defaults, written by `lanes init`
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}
