//! Editor configuration persisted as JSON.
//!
//! The file lives at `<config dir>/jp-edit/config.json` (for example
//! `~/.config/jp-edit/config.json` on Linux). Every field has a default, so a
//! partial file is valid and a missing file means "all defaults".

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application name used for the config subdirectory.
const APP_NAME: &str = "jp-edit";

/// Config filename within the application directory.
const CONFIG_FILENAME: &str = "config.json";

/// User-tunable settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Insert spaces instead of a tab character for the tab command.
    pub expand_tab: bool,
    /// Number of spaces inserted per tab when `expand_tab` is set.
    pub tab_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "warn".to_string(),
            expand_tab: false,
            tab_width: 4,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write config {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Returns the path to the config file, or `None` if the platform config
/// directory cannot be determined.
pub fn config_file_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join(APP_NAME).join(CONFIG_FILENAME))
}

impl Config {
    /// Reads the config at `path`. A missing file yields the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the config from the default location.
    ///
    /// Any failure is logged and the defaults are used.
    pub fn load() -> Self {
        let Some(path) = config_file_path() else {
            tracing::warn!("could not determine the config directory, using defaults");
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Writes the config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let write_err = |source: io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json).map_err(write_err)?;
        fs::rename(&temp_path, path).map_err(write_err)?;
        Ok(())
    }

    /// Text inserted by the tab command.
    pub fn tab_text(&self) -> String {
        if self.expand_tab {
            " ".repeat(self.tab_width.max(1))
        } else {
            "\t".to_string()
        }
    }
}
