//! # cellflow-core
//!
//! Leaf types shared by every cellflow crate:
//! - [`Position`] and [`Size`] - validated grid coordinates and bounding boxes
//! - [`Value`] and [`FormulaErrorKind`] - what reading a cell produces
//! - [`Error`] - structural failures raised at the API boundary
//!
//! ## Example
//!
//! ```rust
//! use cellflow_core::{Position, Value};
//!
//! let pos = Position::parse("C3").unwrap();
//! assert_eq!((pos.row, pos.col), (2, 2));
//! assert_eq!(pos.to_string(), "C3");
//!
//! assert_eq!(Value::Number(2.0).to_string(), "2");
//! ```

pub mod error;
pub mod position;
pub mod value;

pub use error::{Error, Result};
pub use position::{Position, Size};
pub use value::{FormulaErrorKind, Value};

/// Number of addressable rows in a sheet
pub const MAX_ROWS: u32 = 16_384;

/// Number of addressable columns in a sheet
pub const MAX_COLS: u32 = 16_384;

/// Leading character that marks cell text as a formula
pub const FORMULA_SIGN: char = '=';

/// Leading character that keeps the rest of the text literal
pub const ESCAPE_SIGN: char = '\'';
