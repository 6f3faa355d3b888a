//! # cellflow-formula
//!
//! Formula engine for cellflow.
//!
//! This crate provides:
//! - Formula parsing (text → AST) for arithmetic over numbers and cell references
//! - Canonical re-rendering of a parsed formula
//! - Evaluation against a [`CellLookup`] capability
//! - [`Formula`], a parsed formula that memoizes its last result
//!
//! ## Example
//!
//! ```rust
//! use cellflow_core::{Position, Value};
//! use cellflow_formula::{CellLookup, Formula};
//!
//! struct Constant;
//!
//! impl CellLookup for Constant {
//!     fn value_at(&self, _pos: Position) -> Value {
//!         Value::Number(4.0)
//!     }
//! }
//!
//! let formula = Formula::parse("(A1 + 2) * B2").unwrap();
//! assert_eq!(formula.expression(), "(A1+2)*B2");
//! assert_eq!(formula.evaluate(&Constant), Ok(24.0));
//! assert!(formula.has_cache());
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod formula;
pub mod parser;

pub use ast::{BinaryOperator, FormulaExpr, UnaryOperator};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, CellLookup};
pub use formula::Formula;
pub use parser::parse_expression;
