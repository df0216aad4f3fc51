//! Error types for the brewguide service.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the brewguide service.
#[derive(Error, Debug)]
pub enum Error {
    /// Catalog file could not be parsed.
    #[error("Invalid catalog: {message}")]
    InvalidCatalog {
        /// Description of the catalog error.
        message: String,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (unexpected state).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl Error {
    /// Creates an invalid-catalog error with the given message.
    #[must_use]
    pub fn invalid_catalog(message: impl Into<String>) -> Self {
        Self::InvalidCatalog {
            message: message.into(),
        }
    }

    /// Creates an invalid-configuration error with the given message.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Creates an internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
