//! Cell value types

use std::fmt;

/// The result of reading a cell
///
/// Errors are data here: a formula that divides by zero yields
/// `Value::Error(FormulaErrorKind::Arithmetic)`, it does not fail the read.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Literal text (an empty cell reads as empty text)
    Text(String),
    /// Numeric formula result
    Number(f64),
    /// Formula evaluation error (#REF!, #VALUE!, #ARITHM!)
    Error(FormulaErrorKind),
}

impl Value {
    /// The value of a cell that holds nothing
    pub fn empty() -> Self {
        Value::Text(String::new())
    }

    /// Check if the value is an error
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Coerce the value into a formula operand
    ///
    /// Empty text counts as zero, other text must be a finite number in full,
    /// and errors propagate unchanged.
    pub fn to_operand(&self) -> Result<f64, FormulaErrorKind> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Text(s) if s.is_empty() => Ok(0.0),
            Value::Text(s) => s
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or(FormulaErrorKind::Value),
            Value::Error(e) => Err(*e),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::empty()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<FormulaErrorKind> for Value {
    fn from(e: FormulaErrorKind) -> Self {
        Value::Error(e)
    }
}

impl From<Result<f64, FormulaErrorKind>> for Value {
    fn from(result: Result<f64, FormulaErrorKind>) -> Self {
        match result {
            Ok(n) => Value::Number(n),
            Err(e) => Value::Error(e),
        }
    }
}

/// Errors a formula can evaluate to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormulaErrorKind {
    /// #REF! - Reference outside the sheet
    Ref,
    /// #VALUE! - Operand is text that is not a number
    Value,
    /// #ARITHM! - Result is not a finite number (e.g. division by zero)
    Arithmetic,
}

impl FormulaErrorKind {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            FormulaErrorKind::Ref => "#REF!",
            FormulaErrorKind::Value => "#VALUE!",
            FormulaErrorKind::Arithmetic => "#ARITHM!",
        }
    }
}

impl fmt::Display for FormulaErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
