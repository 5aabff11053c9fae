//! Error types for the settings crate.

use std::io;

use millsurf_core::ConfigurationError;
use thiserror::Error;

/// Errors that can occur while loading, saving or validating settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error.
    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// The file extension is neither `.json` nor `.toml`.
    #[error("Config file must be .json or .toml: {0}")]
    UnsupportedFormat(String),

    /// An output setting is out of range.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// A simulation parameter is out of range.
    #[error("Config error: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
