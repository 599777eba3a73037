/// Structured error types for relaydb-core.
///
/// Uses `thiserror` so the store crate can wrap these as sources of its own
/// bootstrap errors.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for relaydb-core operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Config file could not be read
    #[error("Failed to read config file {path:?}: {source}")]
    ConfigRead { path: PathBuf, source: io::Error },

    /// Config file is not valid TOML for [`crate::config::Settings`]
    #[error("Failed to parse config file (invalid TOML): {source}")]
    ConfigParse {
        #[from]
        source: toml::de::Error,
    },

    /// Config override had an unusable value
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidOverride {
        key: String,
        value: String,
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for relaydb-core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create a config read error
    pub fn config_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ConfigRead {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid override error
    pub fn invalid_override(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidOverride {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}
