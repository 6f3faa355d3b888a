//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while parsing a formula
///
/// Evaluation never fails with this type: evaluation problems are
/// [`cellflow_core::FormulaErrorKind`] values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// Formula parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Numeric literal that is malformed or not representable
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

impl From<FormulaError> for cellflow_core::Error {
    fn from(err: FormulaError) -> Self {
        cellflow_core::Error::FormulaParse(err.to_string())
    }
}
