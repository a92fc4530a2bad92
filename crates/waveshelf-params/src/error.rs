//! Error types for parameter handling.

use thiserror::Error;

/// Errors raised while loading or validating a shelf configuration.
#[derive(Error, Debug)]
pub enum ParamsError {
    /// Reading the configuration file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or schema error.
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("cannot write TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// JSON syntax or schema error.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("invalid parameter `{field}`: {reason}")]
    Invalid {
        /// Dotted field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl ParamsError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for parameter operations.
pub type Result<T> = std::result::Result<T, ParamsError>;
