//! Raw spreadsheet representation produced by file readers

use std::fmt;

static MISSING: RawCell = RawCell::Missing;

/// One cell as delivered by a reader, before any type resolution
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Missing,
    Number(f64),
    Text(String),
    /// A value the reader recognised as a date or timestamp
    DateTime(String),
}

impl RawCell {
    pub fn is_missing(&self) -> bool {
        matches!(self, RawCell::Missing)
    }

    /// Build a cell from text: empty strings are missing
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            RawCell::Missing
        } else {
            RawCell::Text(text.to_string())
        }
    }
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCell::Missing => Ok(()),
            RawCell::Number(v) => write!(f, "{}", v),
            RawCell::Text(s) | RawCell::DateTime(s) => write!(f, "{}", s),
        }
    }
}

/// A table exactly as read: the reader's header line plus data rows.
///
/// Rows shorter than the header are padded with missing cells when the
/// table is cleaned; longer rows are truncated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<RawCell>>) -> Self {
        Self { headers, rows }
    }

    pub fn ncols(&self) -> usize {
        self.headers.len()
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    /// Cell at (row, col), missing when the row is short
    pub fn cell(&self, row: usize, col: usize) -> &RawCell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&MISSING)
    }
}
