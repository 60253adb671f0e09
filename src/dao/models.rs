//! Cell addressing and raw cell values shared by every sheet store.
//!
//! Addresses use spreadsheet conventions: columns are letters (`A`, `B`, ..., `AA`) and
//! rows start at 1, so `CellRef::new(1, 1)` is `A1`.

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static A1_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)$").expect("valid A1 pattern")
});

/// Column numbers for the letters used by the fixed sheet layout.
pub mod col {
    /// Column `A`.
    pub const A: u32 = 1;
    /// Column `B`.
    pub const B: u32 = 2;
    /// Column `D`.
    pub const D: u32 = 4;
    /// Column `E`.
    pub const E: u32 = 5;
    /// Column `F`.
    pub const F: u32 = 6;
    /// Column `G`.
    pub const G: u32 = 7;
    /// Column `I`.
    pub const I: u32 = 9;
    /// Column `L`.
    pub const L: u32 = 12;
    /// Column `O`.
    pub const O: u32 = 15;
}

/// Error returned when an address or range cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The text is not in `<letters><digits>` form or overflows.
    #[error("invalid cell address `{0}`")]
    InvalidCell(String),
    /// The text is not in `<cell>:<cell>` form.
    #[error("invalid cell range `{0}`")]
    InvalidRange(String),
    /// Row or column coordinate was zero.
    #[error("cell coordinates are 1-based (got row {row}, column {column})")]
    ZeroCoordinate {
        /// Row that was supplied.
        row: u32,
        /// Column that was supplied.
        column: u32,
    },
}

/// A single cell location, 1-based like the spreadsheet it mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    /// Row number (1 is the first row).
    pub row: u32,
    /// Column number (1 is column `A`).
    pub column: u32,
}

impl CellRef {
    /// Build a reference from a column and a row.
    pub const fn new(column: u32, row: u32) -> Self {
        Self { row, column }
    }

    /// Build a reference from host-reported coordinates, rejecting zeros.
    pub fn from_coordinates(row: u32, column: u32) -> Result<Self, AddressError> {
        if row == 0 || column == 0 {
            return Err(AddressError::ZeroCoordinate { row, column });
        }
        Ok(Self::new(column, row))
    }

    /// Convert a column number to its letters (1 -> A, 26 -> Z, 27 -> AA).
    pub fn column_letters(column: u32) -> String {
        let mut letters = Vec::new();
        let mut n = column;
        while n > 0 {
            n -= 1;
            letters.push(b'A' + (n % 26) as u8);
            n /= 26;
        }
        letters.reverse();
        String::from_utf8(letters).unwrap_or_default()
    }

    fn parse_a1(text: &str) -> Option<Self> {
        let caps = A1_PATTERN.captures(text.trim())?;

        let mut column = 0u32;
        for byte in caps["letters"].to_ascii_uppercase().bytes() {
            let digit = u32::from(byte - b'A') + 1;
            column = column.checked_mul(26)?.checked_add(digit)?;
        }

        let row = caps["numbers"].parse::<u32>().ok()?;
        if row == 0 {
            return None;
        }

        Some(Self::new(column, row))
    }
}

impl FromStr for CellRef {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| AddressError::InvalidCell(s.to_string()))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::column_letters(self.column), self.row)
    }
}

/// Inclusive rectangle of cells, e.g. `E23:O24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// Top-left corner.
    pub start: CellRef,
    /// Bottom-right corner.
    pub end: CellRef,
}

impl CellRange {
    /// Build a range from two corners given in any order.
    pub fn new(a: CellRef, b: CellRef) -> Self {
        Self {
            start: CellRef::new(a.column.min(b.column), a.row.min(b.row)),
            end: CellRef::new(a.column.max(b.column), a.row.max(b.row)),
        }
    }

    /// Whether `cell` lies inside the rectangle.
    pub fn contains(&self, cell: CellRef) -> bool {
        (self.start.row..=self.end.row).contains(&cell.row)
            && (self.start.column..=self.end.column).contains(&cell.column)
    }

    /// Rows covered by the range, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = u32> + use<> {
        self.start.row..=self.end.row
    }

    /// Every cell of one row of the range, left to right.
    pub fn row_cells(&self, row: u32) -> impl Iterator<Item = CellRef> + use<> {
        (self.start.column..=self.end.column).map(move |column| CellRef::new(column, row))
    }
}

impl FromStr for CellRange {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once(':')
            .ok_or_else(|| AddressError::InvalidRange(s.to_string()))?;
        let start = start
            .parse::<CellRef>()
            .map_err(|_| AddressError::InvalidRange(s.to_string()))?;
        let end = end
            .parse::<CellRef>()
            .map_err(|_| AddressError::InvalidRange(s.to_string()))?;
        Ok(Self::new(start, end))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// Raw content of a cell as the host reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Blank cell (`null` in JSON).
    #[default]
    Empty,
    /// Checkbox state.
    Bool(bool),
    /// Any numeric content.
    Number(f64),
    /// Free text, including dropdown selections.
    Text(String),
}

impl CellValue {
    /// Interpret the value as a checkbox state.
    ///
    /// Only a boolean or the exact texts `TRUE` / `FALSE` count; anything else is `None`.
    pub fn as_toggle(&self) -> Option<bool> {
        match self {
            CellValue::Bool(value) => Some(*value),
            CellValue::Text(text) if text == "TRUE" => Some(true),
            CellValue::Text(text) if text == "FALSE" => Some(false),
            _ => None,
        }
    }

    /// Interpret the value as a number. Blank cells count as zero.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Empty => Some(0.0),
            CellValue::Number(value) if value.is_finite() => Some(*value),
            CellValue::Number(_) | CellValue::Bool(_) => None,
            CellValue::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Some(0.0);
                }
                trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
            }
        }
    }

    /// Integer read with leading-digit semantics: `"12abc"` is 12, `3.7` is 3, and
    /// anything without a leading integer is 0.
    pub fn leading_integer(&self) -> i64 {
        match self {
            CellValue::Number(value) if value.is_finite() => value.trunc() as i64,
            CellValue::Text(text) => parse_leading_integer(text).unwrap_or(0),
            _ => 0,
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

fn parse_leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude = rest[..digits_len].parse::<i64>().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Render a number the way the dashboard expects it: shortest form, `0` for zero.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
