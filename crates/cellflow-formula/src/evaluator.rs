//! Formula evaluator
//!
//! Evaluates formula ASTs against a [`CellLookup`] to produce numbers or
//! [`FormulaErrorKind`] values.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use cellflow_core::{FormulaErrorKind, Position, Value};

/// Read-only access to cell values during evaluation
///
/// Implementations return `Value::Text("")` for positions that hold no cell.
/// Positions handed to `value_at` are always inside the sheet bounds.
pub trait CellLookup {
    fn value_at(&self, pos: Position) -> Value;
}

/// Evaluate a formula expression
///
/// The first error met (left to right) is the result.
pub fn evaluate(expr: &FormulaExpr, lookup: &dyn CellLookup) -> Result<f64, FormulaErrorKind> {
    match expr {
        FormulaExpr::Number(n) => Ok(*n),

        FormulaExpr::CellRef(pos) => {
            if !pos.is_valid() {
                return Err(FormulaErrorKind::Ref);
            }
            lookup.value_at(*pos).to_operand()
        }

        FormulaExpr::BinaryOp { op, left, right } => {
            let l = evaluate(left, lookup)?;
            let r = evaluate(right, lookup)?;
            evaluate_binary_op(*op, l, r)
        }

        FormulaExpr::UnaryOp { op, operand } => {
            let n = evaluate(operand, lookup)?;
            Ok(match op {
                UnaryOperator::Plus => n,
                UnaryOperator::Negate => -n,
            })
        }
    }
}

/// Evaluate a binary operation; non-finite results become #ARITHM!
fn evaluate_binary_op(op: BinaryOperator, l: f64, r: f64) -> Result<f64, FormulaErrorKind> {
    let result = match op {
        BinaryOperator::Add => l + r,
        BinaryOperator::Subtract => l - r,
        BinaryOperator::Multiply => l * r,
        BinaryOperator::Divide => l / r,
    };

    if result.is_finite() {
        Ok(result)
    } else {
        Err(FormulaErrorKind::Arithmetic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapLookup(HashMap<Position, Value>);

    impl MapLookup {
        fn with(mut self, cell: &str, value: impl Into<Value>) -> Self {
            self.0.insert(Position::parse(cell).unwrap(), value.into());
            self
        }
    }

    impl CellLookup for MapLookup {
        fn value_at(&self, pos: Position) -> Value {
            self.0.get(&pos).cloned().unwrap_or_default()
        }
    }

    fn eval_with(formula: &str, lookup: &MapLookup) -> Result<f64, FormulaErrorKind> {
        let ast = parse_expression(formula).unwrap();
        evaluate(&ast, lookup)
    }

    fn eval(formula: &str) -> Result<f64, FormulaErrorKind> {
        eval_with(formula, &MapLookup::default())
    }

    #[test]
    fn test_evaluate_arithmetic() {
        assert_eq!(eval("1+2"), Ok(3.0));
        assert_eq!(eval("10-3"), Ok(7.0));
        assert_eq!(eval("4*5"), Ok(20.0));
        assert_eq!(eval("20/4"), Ok(5.0));
    }

    #[test]
    fn test_evaluate_precedence() {
        assert_eq!(eval("1+2*3"), Ok(7.0));
        assert_eq!(eval("(1+2)*3"), Ok(9.0));
        assert_eq!(eval("8-4-2"), Ok(2.0));
        assert_eq!(eval("2+3*4-5"), Ok(9.0));
    }

    #[test]
    fn test_evaluate_unary() {
        assert_eq!(eval("-5"), Ok(-5.0));
        assert_eq!(eval("--5"), Ok(5.0));
        assert_eq!(eval("+5"), Ok(5.0));
        assert_eq!(eval("2*-3"), Ok(-6.0));
    }

    #[test]
    fn test_evaluate_division_by_zero() {
        assert_eq!(eval("1/0"), Err(FormulaErrorKind::Arithmetic));
        assert_eq!(eval("0/0"), Err(FormulaErrorKind::Arithmetic));
        assert_eq!(eval("1e308*10"), Err(FormulaErrorKind::Arithmetic));
    }

    #[test]
    fn test_evaluate_references() {
        let lookup = MapLookup::default()
            .with("A1", 10.0)
            .with("B1", "5")
            .with("C1", "");
        assert_eq!(eval_with("A1+B1", &lookup), Ok(15.0));
        assert_eq!(eval_with("A1*C1", &lookup), Ok(0.0));
        // Never-written cells read as zero
        assert_eq!(eval_with("Z99+1", &lookup), Ok(1.0));
    }

    #[test]
    fn test_evaluate_reference_errors() {
        let lookup = MapLookup::default()
            .with("A1", "meow")
            .with("B1", FormulaErrorKind::Arithmetic);
        assert_eq!(eval_with("A1+1", &lookup), Err(FormulaErrorKind::Value));
        assert_eq!(eval_with("B1+1", &lookup), Err(FormulaErrorKind::Arithmetic));
        assert_eq!(eval_with("ZZZZ1+1", &lookup), Err(FormulaErrorKind::Ref));
        assert_eq!(eval_with("A99999", &lookup), Err(FormulaErrorKind::Ref));
    }

    #[test]
    fn test_first_error_wins() {
        let lookup = MapLookup::default().with("A1", "meow");
        assert_eq!(eval_with("A1/0", &lookup), Err(FormulaErrorKind::Value));
        assert_eq!(eval_with("(1/0)+A1", &lookup), Err(FormulaErrorKind::Arithmetic));
    }
}
