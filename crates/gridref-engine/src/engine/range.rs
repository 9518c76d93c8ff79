//! Rectangular ranges such as `A1:C5`.
//!
//! Corners are normalized on construction, so `C3:A1` and `A1:C3` describe
//! the same rectangle.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::cell_ref::{CellRef, parse_address};
use super::error::{RefError, Result};

/// A normalized rectangle: `start` holds the minimum column/row and `end`
/// the maximum. Each axis keeps the `$` marker of the corner it came from.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellRange {
    pub start: CellRef,
    pub end: CellRef,
}

impl CellRange {
    pub fn new(a: CellRef, b: CellRef) -> CellRange {
        let (min_col, max_col) = if a.col <= b.col {
            ((a.col, a.abs_col), (b.col, b.abs_col))
        } else {
            ((b.col, b.abs_col), (a.col, a.abs_col))
        };
        let (min_row, max_row) = if a.row <= b.row {
            ((a.row, a.abs_row), (b.row, b.abs_row))
        } else {
            ((b.row, b.abs_row), (a.row, a.abs_row))
        };

        CellRange {
            start: CellRef::with_absolute(min_col.0, min_row.0, min_col.1, min_row.1),
            end: CellRef::with_absolute(max_col.0, max_row.0, max_col.1, max_row.1),
        }
    }

    /// Number of cells in the rectangle, or None if it does not fit in `usize`.
    pub fn cell_count(&self) -> Option<usize> {
        let width = (self.end.col - self.start.col).checked_add(1)?;
        let height = (self.end.row - self.start.row).checked_add(1)?;
        width.checked_mul(height)
    }

    pub fn contains(&self, cell: &CellRef) -> bool {
        (self.start.col..=self.end.col).contains(&cell.col)
            && (self.start.row..=self.end.row).contains(&cell.row)
    }

    /// Cells in row-major order (top-left to bottom-right), without `$` markers.
    pub fn cells(&self) -> impl Iterator<Item = CellRef> + use<> {
        let (start_col, end_col) = (self.start.col, self.end.col);
        (self.start.row..=self.end.row)
            .flat_map(move |row| (start_col..=end_col).map(move |col| CellRef::new(col, row)))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

impl std::str::FromStr for CellRange {
    type Err = RefError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        parse_range(s)
    }
}

/// Parse a range like "A1:B5". Exactly one `:` separator is accepted.
pub fn parse_range(range: &str) -> Result<CellRange> {
    let invalid = || RefError::InvalidRangeFormat(range.to_string());
    let parts: Vec<&str> = range.split(':').collect();
    if parts.len() != 2 {
        return Err(invalid());
    }
    let start = parse_address(parts[0]).map_err(|_| invalid())?;
    let end = parse_address(parts[1]).map_err(|_| invalid())?;
    Ok(CellRange::new(start, end))
}

/// Enumerate the addresses between two corners in row-major order.
///
/// Corner order does not matter; output addresses carry no `$` markers.
pub fn cells_in_range(start: &str, end: &str) -> Result<Vec<String>> {
    let range = CellRange::new(parse_address(start)?, parse_address(end)?);
    let mut out = Vec::with_capacity(range.cell_count().unwrap_or(0).min(1 << 16));
    out.extend(range.cells().map(|cell| cell.to_string()));
    Ok(out)
}
