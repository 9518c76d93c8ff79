//! Sheet bounds checks and arrow-key navigation.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::cell_ref::{CellRef, format_address, parse_address};
use super::error::{RefError, Result};

/// Size of a sheet, supplied by the caller on every call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SheetDimension {
    pub rows: usize,
    pub cols: usize,
}

impl SheetDimension {
    pub fn new(rows: usize, cols: usize) -> SheetDimension {
        SheetDimension { rows, cols }
    }

    pub fn contains(&self, cell: &CellRef) -> bool {
        cell.col < self.cols && cell.row < self.rows
    }
}

impl fmt::Display for SheetDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("Unknown direction: {}", s)),
        }
    }
}

/// True iff `addr` parses and lies inside a `max_rows` x `max_cols` sheet.
/// Malformed input is simply invalid.
pub fn is_valid_address(addr: &str, max_rows: usize, max_cols: usize) -> bool {
    parse_address(addr)
        .map(|cell| SheetDimension::new(max_rows, max_cols).contains(&cell))
        .unwrap_or(false)
}

/// Parse `addr` and require it to lie inside `dims`.
pub fn check_bounds(addr: &str, dims: SheetDimension) -> Result<CellRef> {
    let cell = parse_address(addr)?;
    if dims.contains(&cell) {
        Ok(cell)
    } else {
        Err(RefError::OutOfBounds {
            address: addr.to_string(),
            rows: dims.rows,
            cols: dims.cols,
        })
    }
}

/// The cell one step from `cell`, or None at the sheet edge.
pub fn step(cell: CellRef, direction: Direction, dims: SheetDimension) -> Option<CellRef> {
    if !dims.contains(&cell) {
        return None;
    }
    let (col, row) = match direction {
        Direction::Up => (Some(cell.col), cell.row.checked_sub(1)),
        Direction::Down => (Some(cell.col), cell.row.checked_add(1)),
        Direction::Left => (cell.col.checked_sub(1), Some(cell.row)),
        Direction::Right => (cell.col.checked_add(1), Some(cell.row)),
    };
    let moved = CellRef {
        col: col?,
        row: row?,
        ..cell
    };
    dims.contains(&moved).then_some(moved)
}

/// Address of the neighbouring cell for arrow-key movement.
///
/// Returns `Ok(None)` at a sheet edge (no wraparound) or when `addr` is
/// itself outside the sheet. The `$` markers of `addr` are kept.
pub fn get_neighbor(
    addr: &str,
    direction: Direction,
    max_rows: usize,
    max_cols: usize,
) -> Result<Option<String>> {
    let cell = parse_address(addr)?;
    Ok(
        step(cell, direction, SheetDimension::new(max_rows, max_cols)).map(|moved| {
            format_address(moved.col, moved.row, moved.abs_col, moved.abs_row)
        }),
    )
}
