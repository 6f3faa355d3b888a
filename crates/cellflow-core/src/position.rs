//! Grid coordinates and printable sizes

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// Maximum number of column letters accepted in A1 notation (XFD-style)
const MAX_COLUMN_LETTERS: usize = 3;

/// A cell position (e.g., "A1")
///
/// Rows and columns are 0-based internally and 1-based / lettered in display.
/// Positions order row-major, which is the order referenced cells are
/// reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Row index (0-based)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ...)
    pub col: u32,
}

impl Position {
    /// Create a position from 0-based indices. The result is not validated.
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Stand-in for any reference outside the sheet; spelled `#REF!` in formulas
    pub const NONE: Position = Position::new(u32::MAX, u32::MAX);

    /// Whether the position lies inside the sheet bounds
    pub fn is_valid(&self) -> bool {
        self.row < MAX_ROWS && self.col < MAX_COLS
    }

    /// Return the position itself, or [`Error::InvalidPosition`] if it is out of bounds
    pub fn validate(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(Error::invalid_position(format!(
                "({}, {}) outside {}x{} sheet",
                self.row, self.col, MAX_ROWS, MAX_COLS
            )))
        }
    }

    /// Parse a position from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use cellflow_core::Position;
    ///
    /// let pos = Position::parse("B12").unwrap();
    /// assert_eq!(pos.row, 11);
    /// assert_eq!(pos.col, 1);
    ///
    /// assert!(Position::parse("a1").is_err());
    /// assert!(Position::parse("A0").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let pos = Self::parse_unchecked(s)
            .ok_or_else(|| Error::invalid_position(format!("'{}' is not A1 notation", s)))?;
        pos.validate()
            .map_err(|_| Error::invalid_position(format!("'{}' is outside the sheet", s)))
    }

    /// Parse A1 notation without checking sheet bounds
    ///
    /// Returns `None` only when the text is not shaped like a reference.
    /// Overlong coordinates saturate, so they come back as invalid positions
    /// rather than wrapping around.
    pub fn parse_unchecked(s: &str) -> Option<Self> {
        let letters_end = s
            .find(|c: char| !c.is_ascii_uppercase())
            .unwrap_or(s.len());
        let (letters, digits) = s.split_at(letters_end);

        if letters.is_empty() || digits.is_empty() {
            return None;
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let col = Self::letters_to_column(letters);
        let row = digits.bytes().fold(0u32, |acc, b| {
            acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
        });

        // Rows are 1-based in notation
        if row == 0 {
            return None;
        }

        Some(Self::new(row - 1, col))
    }

    /// Convert a column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u32) -> String {
        let mut result = String::new();
        let mut n = u64::from(col) + 1; // 1-based for calculation

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert upper-case column letters to an index (A = 0, Z = 25, AA = 26, etc.)
    ///
    /// Columns with more than three letters are beyond any sheet and map to
    /// `u32::MAX`.
    pub fn letters_to_column(letters: &str) -> u32 {
        if letters.len() > MAX_COLUMN_LETTERS {
            return u32::MAX;
        }
        let col = letters
            .bytes()
            .fold(0u32, |acc, b| acc * 26 + u32::from(b - b'A') + 1);
        col - 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::column_to_letters(self.col), u64::from(self.row) + 1)
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Size of the printable area of a sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub rows: u32,
    pub cols: u32,
}

impl Size {
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(Position::column_to_letters(0), "A");
        assert_eq!(Position::column_to_letters(25), "Z");
        assert_eq!(Position::column_to_letters(26), "AA");
        assert_eq!(Position::column_to_letters(701), "ZZ");
        assert_eq!(Position::column_to_letters(702), "AAA");
        assert_eq!(Position::column_to_letters(16383), "XFD");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(Position::letters_to_column("A"), 0);
        assert_eq!(Position::letters_to_column("AB"), 27);
        assert_eq!(Position::letters_to_column("XFD"), 16383);
        assert_eq!(Position::letters_to_column("ABCD"), u32::MAX);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Position::parse("A1").unwrap(), Position::new(0, 0));
        assert_eq!(Position::parse("C3").unwrap(), Position::new(2, 2));
        assert_eq!(Position::parse("XFD16384").unwrap(), Position::new(16383, 16383));
        assert_eq!("AB10".parse::<Position>().unwrap(), Position::new(9, 27));
    }

    #[test]
    fn test_parse_errors() {
        for text in ["", "A", "1", "A0", "a1", "$A$1", " A1", "A1 ", "1A", "A-1"] {
            assert!(Position::parse(text).is_err(), "{text:?} should not parse");
        }
        // Well-formed but outside the sheet
        assert!(matches!(
            Position::parse("XFE1"),
            Err(Error::InvalidPosition(_))
        ));
        assert!(Position::parse("A16385").is_err());
        assert!(Position::parse("ZZZZ1").is_err());
        assert!(Position::parse("A99999999999").is_err());
    }

    #[test]
    fn test_parse_unchecked_keeps_out_of_bounds() {
        let pos = Position::parse_unchecked("A99999").unwrap();
        assert_eq!(pos.row, 99998);
        assert!(!pos.is_valid());

        let pos = Position::parse_unchecked("A99999999999").unwrap();
        assert_eq!(pos.row, u32::MAX - 1);
        assert!(!pos.is_valid());
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(0, 0).to_string(), "A1");
        assert_eq!(Position::new(99, 2).to_string(), "C100");
        assert_eq!(Position::new(0, 27).to_string(), "AB1");
    }

    #[test]
    fn test_ordering_is_row_major() {
        let mut cells = vec![
            Position::new(1, 0),
            Position::new(0, 5),
            Position::new(0, 1),
        ];
        cells.sort();
        assert_eq!(
            cells,
            vec![Position::new(0, 1), Position::new(0, 5), Position::new(1, 0)]
        );
    }

    #[test]
    fn test_error_messages_name_the_input() {
        assert_eq!(
            Position::parse("A0"),
            Err(Error::InvalidPosition("'A0' is not A1 notation".into()))
        );
        assert_eq!(
            Position::parse("XFE1"),
            Err(Error::InvalidPosition("'XFE1' is outside the sheet".into()))
        );
        assert!(!Position::NONE.is_valid());
    }

    #[test]
    fn test_validate() {
        assert!(Position::new(16383, 0).validate().is_ok());
        assert!(Position::new(16384, 0).validate().is_err());
        assert!(Position::new(0, 16384).validate().is_err());
    }
}
