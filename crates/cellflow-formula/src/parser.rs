//! Formula parser
//!
//! A recursive descent parser for arithmetic formulas with proper operator precedence.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use cellflow_core::{FormulaErrorKind, Position};

/// Deepest run of parentheses and unary signs accepted
const MAX_NESTING: usize = 256;

/// Deepest expression tree accepted, operator chains included
const MAX_DEPTH: usize = 1024;

/// Expression together with the depth of its tree
type Node = (FormulaExpr, usize);

/// Parse formula text (without the leading `=`) into an AST
///
/// # Example
/// ```rust
/// use cellflow_formula::parse_expression;
///
/// let ast = parse_expression("1+2").unwrap();
/// let ast = parse_expression("(A1 + B2) / 2").unwrap();
/// assert!(parse_expression("1+").is_err());
/// ```
pub fn parse_expression(expression: &str) -> FormulaResult<FormulaExpr> {
    let mut parser = FormulaParser::new(expression)?;
    let (expr, _) = parser.parse_expression()?;

    // Make sure we consumed all input
    if parser.current_token() != &Token::Eof {
        return Err(FormulaError::Parse(format!(
            "Unexpected {:?} after expression",
            parser.current_token()
        )));
    }

    Ok(expr)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    CellRef(Position),

    Plus,
    Minus,
    Star,
    Slash,

    LeftParen,
    RightParen,

    Eof,
}

/// Formula parser
struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
    current_token: Token,
    nesting: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str) -> FormulaResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            current_token: Token::Eof,
            nesting: 0,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> FormulaResult<()> {
        self.current_token = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> FormulaResult<Token> {
        self.skip_whitespace();

        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        if c.is_ascii_alphabetic() {
            return self.scan_cell_reference();
        }

        let invalid_ref = FormulaErrorKind::Ref.as_str();
        if self.input[self.pos..].starts_with(invalid_ref) {
            self.pos += invalid_ref.len();
            return Ok(Token::CellRef(Position::NONE));
        }

        Err(FormulaError::Parse(format!(
            "Unexpected character '{}' at offset {}",
            c, self.pos
        )))
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        // Integer part
        self.skip_digits();

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            self.skip_digits();
        }

        // Exponent part
        if self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek_char().map_or(false, |c| c == '+' || c == '-') {
                self.advance();
            }
            self.skip_digits();
        }

        let num_str = &self.input[start..self.pos];
        match num_str.parse::<f64>() {
            Ok(num) if num.is_finite() => Ok(Token::Number(num)),
            _ => Err(FormulaError::InvalidNumber(num_str.to_string())),
        }
    }

    fn scan_cell_reference(&mut self) -> FormulaResult<Token> {
        let start = self.pos;
        while self
            .peek_char()
            .map_or(false, |c| c.is_ascii_alphanumeric())
        {
            self.advance();
        }

        let text = &self.input[start..self.pos];
        // Out-of-bounds references are kept: they evaluate to #REF!
        Position::parse_unchecked(text)
            .map(|pos| if pos.is_valid() { pos } else { Position::NONE })
            .map(Token::CellRef)
            .ok_or_else(|| FormulaError::Parse(format!("'{}' is not a cell reference", text)))
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn skip_digits(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn current_token(&self) -> &Token {
        &self.current_token
    }

    fn consume(&mut self) -> FormulaResult<Token> {
        let token = std::mem::replace(&mut self.current_token, Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if self.current_token() == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(FormulaError::Parse(format!(
                "Expected {:?}, got {:?}",
                expected,
                self.current_token()
            )))
        }
    }

    fn enter_nested(&mut self) -> FormulaResult<()> {
        self.nesting += 1;
        if self.nesting > MAX_NESTING {
            return Err(FormulaError::Parse("formula nested too deeply".to_string()));
        }
        Ok(())
    }

    fn node(&self, expr: FormulaExpr, depth: usize) -> FormulaResult<Node> {
        if depth > MAX_DEPTH {
            return Err(FormulaError::Parse("formula nested too deeply".to_string()));
        }
        Ok((expr, depth))
    }

    fn binary(&self, op: BinaryOperator, left: Node, right: Node) -> FormulaResult<Node> {
        let depth = left.1.max(right.1) + 1;
        let expr = FormulaExpr::BinaryOp {
            op,
            left: Box::new(left.0),
            right: Box::new(right.0),
        };
        self.node(expr, depth)
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Addition/Subtraction: +, -
    // 2. Multiplication/Division: *, /
    // 3. Unary: +, -
    // 4. Primary: numbers, references, parentheses

    fn parse_expression(&mut self) -> FormulaResult<Node> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> FormulaResult<Node> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_multiplicative()?;
            left = self.binary(op, left, right)?;
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<Node> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_unary()?;
            left = self.binary(op, left, right)?;
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<Node> {
        let op = match self.current_token() {
            Token::Minus => UnaryOperator::Negate,
            Token::Plus => UnaryOperator::Plus,
            _ => return self.parse_primary(),
        };

        self.enter_nested()?;
        self.consume()?;
        let (operand, depth) = self.parse_unary()?;
        self.nesting -= 1;
        let expr = FormulaExpr::UnaryOp {
            op,
            operand: Box::new(operand),
        };
        self.node(expr, depth + 1)
    }

    fn parse_primary(&mut self) -> FormulaResult<Node> {
        match self.current_token().clone() {
            Token::Number(n) => {
                self.consume()?;
                Ok((FormulaExpr::Number(n), 1))
            }

            Token::CellRef(pos) => {
                self.consume()?;
                Ok((FormulaExpr::CellRef(pos), 1))
            }

            Token::LeftParen => {
                self.enter_nested()?;
                self.consume()?;
                let node = self.parse_expression()?;
                self.expect(&Token::RightParen)?;
                self.nesting -= 1;
                Ok(node)
            }

            token => Err(FormulaError::Parse(format!("Unexpected token: {:?}", token))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cell(text: &str) -> FormulaExpr {
        FormulaExpr::CellRef(Position::parse(text).unwrap())
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_expression("42").unwrap(), FormulaExpr::Number(42.0));
        assert_eq!(parse_expression("3.14").unwrap(), FormulaExpr::Number(3.14));
        assert_eq!(parse_expression(".5").unwrap(), FormulaExpr::Number(0.5));
        assert_eq!(parse_expression("1e3").unwrap(), FormulaExpr::Number(1000.0));
    }

    #[test]
    fn test_parse_cell_reference() {
        assert_eq!(parse_expression("A1").unwrap(), cell("A1"));
        assert_eq!(parse_expression("  XFD16384 ").unwrap(), cell("XFD16384"));
    }

    #[test]
    fn test_parse_out_of_bounds_reference() {
        for text in ["ZZZZ1", "A99999", "XFE1", "#REF!"] {
            assert_eq!(
                parse_expression(text).unwrap(),
                FormulaExpr::CellRef(Position::NONE),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_parse_precedence() {
        let ast = parse_expression("1+2*3").unwrap();
        if let FormulaExpr::BinaryOp { op, left, right } = ast {
            assert_eq!(op, BinaryOperator::Add);
            assert_eq!(*left, FormulaExpr::Number(1.0));
            assert!(matches!(
                *right,
                FormulaExpr::BinaryOp {
                    op: BinaryOperator::Multiply,
                    ..
                }
            ));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_parse_left_associative() {
        let ast = parse_expression("8-4-2").unwrap();
        if let FormulaExpr::BinaryOp { op, left, right } = ast {
            assert_eq!(op, BinaryOperator::Subtract);
            assert!(matches!(*left, FormulaExpr::BinaryOp { .. }));
            assert_eq!(*right, FormulaExpr::Number(2.0));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_parse_unary() {
        let ast = parse_expression("-+5").unwrap();
        if let FormulaExpr::UnaryOp { op, operand } = ast {
            assert_eq!(op, UnaryOperator::Negate);
            assert!(matches!(
                *operand,
                FormulaExpr::UnaryOp {
                    op: UnaryOperator::Plus,
                    ..
                }
            ));
        } else {
            panic!("Expected UnaryOp");
        }
    }

    #[test]
    fn test_parse_errors() {
        for text in [
            "", "1+", "(1", "1)", "A", "a1", "A1B", "1 2", "$A$1", "SUM(A1)", "1e", "1e999",
            "1;2", "\"x\"", "#", "#REF", "#VALUE!",
        ] {
            assert!(parse_expression(text).is_err(), "{text:?} should not parse");
        }
    }

    fn nested(depth: usize) -> String {
        format!("{}1{}", "(".repeat(depth), ")".repeat(depth))
    }

    fn assert_too_deep(text: &str) {
        match parse_expression(text) {
            Err(FormulaError::Parse(msg)) => assert_eq!(msg, "formula nested too deeply"),
            other => panic!("Expected nesting error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_parse_nesting_limit() {
        assert_eq!(
            parse_expression(&nested(MAX_NESTING)).unwrap(),
            FormulaExpr::Number(1.0)
        );
        assert_too_deep(&nested(MAX_NESTING + 1));
        assert_too_deep(&nested(10_000));
        assert_too_deep(&format!("{}1", "-".repeat(10_000)));
    }

    #[test]
    fn test_parse_depth_limit_covers_operator_chains() {
        let chain = |terms: usize| vec!["A1"; terms].join("+");
        assert!(parse_expression(&chain(MAX_DEPTH)).is_ok());
        assert_too_deep(&chain(MAX_DEPTH + 2));
        assert_too_deep(&chain(100_000));
    }
}
