//! # Error Handling
//!
//! Crate-wide error type and result alias. Every fallible operation in the
//! application returns [`Result`], and external error types are converted
//! into [`Error`] via `#[from]` implementations so callers can use `?`
//! throughout.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The application error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A plain error message.
    #[error("{0}")]
    Message(String),

    /// An error message wrapping an underlying cause.
    #[error("{message}: {source}")]
    WithSource {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Git(#[from] git2::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// Creates a new error from a message.
    pub fn new(message: &str) -> Self {
        Error::Message(message.to_string())
    }

    /// Creates a new error from a message and an underlying source error.
    pub fn with_source(
        message: &str, source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Error::WithSource {
            message: message.to_string(),
            source,
        }
    }
}
