//! Common error types used throughout passsync.
//!
//! This module provides a unified error type covering the failure cases the
//! daemon can hit: local database errors, filesystem I/O, remote backend
//! errors, and invalid configuration.

/// Common error type for passsync.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A local database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A remote backend call failed.
    #[error("Remote error: {0}")]
    Remote(String),

    /// Invalid input or configuration was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new Remote error.
    pub fn remote<S: Into<String>>(msg: S) -> Self {
        Self::Remote(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
