//! Error types for the flytax-core library.
//!
//! Field resolution itself never fails: unparseable numbers and unmatched
//! labels are `None` at the tier where they occur. The errors below belong to
//! the layers around it (configuration and parser output handling).

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the flytax library.
#[derive(Error, Debug)]
pub enum FlytaxError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to loading and validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for `FlytaxConfig`.
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// A configuration value is out of range.
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Result type for the flytax library.
pub type Result<T> = std::result::Result<T, FlytaxError>;
