//! A1-style cell references.
//!
//! The template layout is described in spreadsheet terms ("the code goes in
//! B3"), so the model keeps A1 parsing/printing next to the numeric
//! (row, column) form used everywhere else.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A 1-based (row, column) cell reference.
///
/// Ordering is row-major, which gives sheet cell maps a natural top-to-bottom,
/// left-to-right iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// Error parsing an A1-style reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1ParseError(pub String);

impl fmt::Display for A1ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid cell reference '{}'", self.0)
    }
}

impl std::error::Error for A1ParseError {}

impl FromStr for CellRef {
    type Err = A1ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let letters: String = trimmed
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        let digits = &trimmed[letters.len()..];

        if letters.is_empty() || digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(A1ParseError(s.to_string()));
        }

        let col = letters.chars().fold(0u32, |acc, c| {
            acc * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1)
        });
        let row: u32 = digits.parse().map_err(|_| A1ParseError(s.to_string()))?;

        if row == 0 {
            return Err(A1ParseError(s.to_string()));
        }

        Ok(CellRef { row, col })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut letters = Vec::new();
        let mut n = self.col;
        while n > 0 {
            n -= 1;
            letters.push(b'A' + (n % 26) as u8);
            n /= 26;
        }
        letters.reverse();
        for c in letters {
            write!(f, "{}", c as char)?;
        }
        write!(f, "{}", self.row)
    }
}

impl TryFrom<String> for CellRef {
    type Error = A1ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CellRef> for String {
    fn from(r: CellRef) -> String {
        r.to_string()
    }
}
