//! Error types for the configuration system

use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("Failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("Failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config file is not well-formed INI
    #[error("Failed to parse config file at {path}, line {line}: {message}")]
    ParseError {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A setting holds text that does not coerce to its declared type
    #[error("Invalid value for [{section}] {key}: expected {expected}, got '{value}'")]
    InvalidSettingValue {
        section: String,
        key: String,
        value: String,
        expected: &'static str,
    },

    /// Attempted to set a key in a section the config does not declare
    #[error("No section named [{0}]")]
    UnknownSection(String),

    /// Key that would not read back as the same key once written
    #[error("'{key}' cannot be used as a key in [{section}]")]
    InvalidKey { section: String, key: String },

    /// User data could not be encoded or decoded as JSON
    #[error("User data JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Failed to create a parent directory
    #[error("Failed to create directory at {path}: {source}")]
    DirectoryCreationError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Default directory path could not be determined
    #[error("Could not determine directory path: {reason}")]
    PathResolutionError { reason: String },
}

impl ConfigError {
    /// Returns `(section, key)` for errors tied to a single setting
    pub fn setting(&self) -> Option<(&str, &str)> {
        match self {
            ConfigError::InvalidSettingValue { section, key, .. }
            | ConfigError::InvalidKey { section, key } => Some((section.as_str(), key.as_str())),
            _ => None,
        }
    }
}
