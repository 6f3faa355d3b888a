//! # cellflow
//!
//! A single-sheet spreadsheet engine that keeps formula results consistent
//! with their inputs.
//!
//! ## Features
//!
//! - Cells hold text, numbers or arithmetic formulas over other cells
//! - Formula results are computed on first read and cached
//! - Writes drop exactly the cached results they can affect
//! - Circular formulas are rejected before anything is changed
//!
//! ## Example
//!
//! ```rust
//! use cellflow::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! let a1 = Position::parse("A1").unwrap();
//! let b1 = Position::parse("B1").unwrap();
//!
//! sheet.set_cell(a1, "20").unwrap();
//! sheet.set_cell(b1, "=A1 * 2 + 2").unwrap();
//! assert_eq!(sheet.value(b1).unwrap(), Value::Number(42.0));
//!
//! sheet.set_cell(a1, "1").unwrap();
//! assert_eq!(sheet.value(b1).unwrap(), Value::Number(4.0));
//!
//! // B1 := ... A1, A1 := B1 would loop
//! assert!(sheet.set_cell(a1, "=B1").is_err());
//! ```

pub mod cell;
mod graph;
pub mod prelude;
pub mod sheet;
mod storage;

pub use cell::{Cell, CellContent};
pub use sheet::{CellHandle, Sheet};

// Re-export core types
pub use cellflow_core::{
    Error, FormulaErrorKind, Position, Result, Size, Value, ESCAPE_SIGN, FORMULA_SIGN, MAX_COLS,
    MAX_ROWS,
};

// Re-export formula types
pub use cellflow_formula::{CellLookup, Formula, FormulaError, FormulaExpr};
