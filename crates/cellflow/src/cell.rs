//! Cell content and per-cell dependency edges

use std::collections::BTreeSet;

use cellflow_core::{Position, Result, Value, ESCAPE_SIGN, FORMULA_SIGN};
use cellflow_formula::{CellLookup, Formula};

/// What a cell holds
#[derive(Debug, Default)]
pub enum CellContent {
    /// Never assigned, or assigned empty text
    #[default]
    Empty,
    /// Raw text. A leading [`ESCAPE_SIGN`] is kept in the text but not in the value.
    Text(String),
    /// Parsed formula with its cached result
    Formula(Formula),
}

impl CellContent {
    /// Classify and parse cell text
    ///
    /// Fails only on malformed formula text.
    pub fn from_text(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Ok(CellContent::Empty);
        }
        match text.strip_prefix(FORMULA_SIGN) {
            Some(expression) if !expression.is_empty() => {
                Ok(CellContent::Formula(Formula::parse(expression)?))
            }
            _ => Ok(CellContent::Text(text.to_string())),
        }
    }

    /// Cells a formula reads; empty for any other content
    pub fn referenced_cells(&self) -> &[Position] {
        match self {
            CellContent::Formula(formula) => formula.referenced_cells(),
            CellContent::Empty | CellContent::Text(_) => &[],
        }
    }

    pub fn text(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Text(text) => text.clone(),
            CellContent::Formula(formula) => format!("{}{}", FORMULA_SIGN, formula.expression()),
        }
    }

    pub fn value(&self, lookup: &dyn CellLookup) -> Value {
        match self {
            CellContent::Empty => Value::empty(),
            CellContent::Text(text) => {
                let shown = text.strip_prefix(ESCAPE_SIGN).unwrap_or(text);
                Value::Text(shown.to_string())
            }
            CellContent::Formula(formula) => formula.evaluate(lookup).into(),
        }
    }
}

/// One grid entry
///
/// Edges are stored as positions and resolved through the sheet on every
/// traversal. `a` is in `b.references` exactly when `b` is in `a.dependents`.
#[derive(Debug, Default)]
pub struct Cell {
    pub(crate) content: CellContent,
    /// Cells this cell's formula reads
    pub(crate) references: BTreeSet<Position>,
    /// Cells whose formulas read this cell
    pub(crate) dependents: BTreeSet<Position>,
    /// Set through the sheet, as opposed to kept only for its readers
    pub(crate) written: bool,
}

impl Cell {
    pub fn content(&self) -> &CellContent {
        &self.content
    }

    /// Text as entered; formulas are re-rendered canonically
    pub fn text(&self) -> String {
        self.content.text()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.content, CellContent::Empty)
    }

    pub fn is_formula(&self) -> bool {
        matches!(self.content, CellContent::Formula(_))
    }

    /// Whether a formula result is currently memoized
    pub fn has_cache(&self) -> bool {
        match &self.content {
            CellContent::Formula(formula) => formula.has_cache(),
            _ => false,
        }
    }

    /// Drop the memoized result. Returns whether there was one.
    pub(crate) fn clear_cache(&mut self) -> bool {
        match &mut self.content {
            CellContent::Formula(formula) if formula.has_cache() => {
                formula.clear_cache();
                true
            }
            _ => false,
        }
    }

    /// Compute (or reuse) the value, reading other cells through `lookup`
    pub(crate) fn value(&self, lookup: &dyn CellLookup) -> Value {
        self.content.value(lookup)
    }
}
