//! Parsed formula with a memoized result

use crate::ast::FormulaExpr;
use crate::error::FormulaResult;
use crate::evaluator::{evaluate, CellLookup};
use crate::parser::parse_expression;
use cellflow_core::{FormulaErrorKind, Position};
use once_cell::unsync::OnceCell;

/// A parsed formula
///
/// The result of the last evaluation is kept until [`Formula::clear_cache`]
/// is called. Whoever owns the formula is responsible for clearing the cache
/// when any referenced cell changes.
#[derive(Debug)]
pub struct Formula {
    ast: FormulaExpr,
    /// Distinct in-bounds references, sorted row-major
    referenced_cells: Vec<Position>,
    cache: OnceCell<Result<f64, FormulaErrorKind>>,
}

impl Formula {
    /// Parse formula text without the leading `=`
    pub fn parse(expression: &str) -> FormulaResult<Self> {
        let ast = parse_expression(expression)?;

        let mut referenced_cells = Vec::new();
        ast.collect_cells(&mut referenced_cells);
        referenced_cells.retain(Position::is_valid);
        referenced_cells.sort_unstable();
        referenced_cells.dedup();

        Ok(Self {
            ast,
            referenced_cells,
            cache: OnceCell::new(),
        })
    }

    /// The parsed expression tree
    pub fn ast(&self) -> &FormulaExpr {
        &self.ast
    }

    /// Cells this formula reads
    pub fn referenced_cells(&self) -> &[Position] {
        &self.referenced_cells
    }

    /// Canonical text of the formula, without the leading `=`
    pub fn expression(&self) -> String {
        self.ast.to_string()
    }

    /// Evaluate, or return the cached result if there is one
    pub fn evaluate(&self, lookup: &dyn CellLookup) -> Result<f64, FormulaErrorKind> {
        *self.cache.get_or_init(|| evaluate(&self.ast, lookup))
    }

    pub fn has_cache(&self) -> bool {
        self.cache.get().is_some()
    }

    pub fn clear_cache(&mut self) {
        self.cache.take();
    }
}
