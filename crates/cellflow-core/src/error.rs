//! Error types for cellflow-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Structural errors. Any of these aborts the requested operation and
/// leaves the sheet exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Coordinate outside the sheet bounds, or unparseable A1 notation
    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    /// The new formula would make a cell reachable from itself
    #[error("Circular dependency involving cell {0}")]
    CircularDependency(String),

    /// Malformed formula text
    #[error("Formula parse error: {0}")]
    FormulaParse(String),
}

impl Error {
    /// Shorthand for an [`Error::InvalidPosition`] naming the offending input
    pub fn invalid_position<S: Into<String>>(what: S) -> Self {
        Error::InvalidPosition(what.into())
    }
}
