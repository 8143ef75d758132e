//! Error types for grid decoding and lookups.

use std::path::Path;

use thiserror::Error;

/// Errors that can occur while cataloging or reading grid files.
#[derive(Error, Debug)]
pub enum GridError {
    /// The header could not be read (file missing, unreadable or too short).
    #[error("failed to decode grid header: {0}")]
    Decode(String),

    /// The header was read but violates a structural invariant.
    #[error("invalid grid header: {0}")]
    InvalidHeader(String),

    /// I/O failure while reading grid values.
    #[error("grid I/O error: {0}")]
    Io(String),

    /// The data directory could not be scanned.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The concurrency gate was closed while waiting for a slot.
    #[error("concurrency gate closed")]
    GateClosed,
}

impl GridError {
    /// Create a Decode error tagged with the offending path.
    pub fn decode(path: &Path, msg: impl std::fmt::Display) -> Self {
        Self::Decode(format!("{}: {}", path.display(), msg))
    }

    /// Create an InvalidHeader error.
    pub fn invalid_header(msg: impl Into<String>) -> Self {
        Self::InvalidHeader(msg.into())
    }

    /// Create an Io error tagged with the offending path.
    pub fn io(path: &Path, msg: impl std::fmt::Display) -> Self {
        Self::Io(format!("{}: {}", path.display(), msg))
    }

    /// Create a Catalog error.
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }
}

impl From<std::io::Error> for GridError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
