// Author: Dustin Pilgrim
// License: MIT

pub mod model;
pub mod store;

use std::fmt;
use std::io;

pub use model::{ColorMode, FontSource, Settings};
pub use store::{JsonFileStore, SettingsStore, default_settings_path, load_settings};
#[cfg(test)]
pub use store::MemoryStore;

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Json(serde_json::Error),
    /// The in-memory store's lock was poisoned by a panicking writer.
    Poisoned,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "Settings format error: {}", e),
            ConfigError::Poisoned => write!(f, "Settings store is poisoned"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Poisoned => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err)
    }
}
