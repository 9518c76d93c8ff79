//! Reference adjustment for structural edits.
//!
//! Rules, applied to the edited axis only:
//! - Insert at P: refs with value >= P become value + 1
//! - Delete at P: refs with value > P become value - 1; value == P dangles
//! - Absolute axes (`$`) never move

use serde::{Deserialize, Serialize};
use std::fmt;

use super::cell_ref::{CellRef, parse_address};
use super::error::{RefError, Result};

/// Error token rendered in place of a dangling reference.
pub const REF_ERROR: &str = "#REF!";

/// A single structural edit: one insert or delete on one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftOperation {
    InsertRow(usize),
    DeleteRow(usize),
    InsertColumn(usize),
    DeleteColumn(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    pub fn get(&self, cell: &CellRef) -> usize {
        match self {
            Axis::Row => cell.row,
            Axis::Column => cell.col,
        }
    }

    pub fn is_absolute(&self, cell: &CellRef) -> bool {
        match self {
            Axis::Row => cell.abs_row,
            Axis::Column => cell.abs_col,
        }
    }

    /// Same reference with this axis moved to `value`; markers are kept.
    pub fn with_value(&self, cell: &CellRef, value: usize) -> CellRef {
        match self {
            Axis::Row => CellRef { row: value, ..*cell },
            Axis::Column => CellRef { col: value, ..*cell },
        }
    }
}

/// Position of an insert or delete, in the `{ row?, col? }` shape used by
/// edit requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineEdit {
    pub row: Option<usize>,
    pub col: Option<usize>,
}

/// Per-axis pinning supplied by the caller, on top of the `$` markers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Absolute {
    pub col: bool,
    pub row: bool,
}

impl ShiftOperation {
    /// Build the single operation described by an insert/delete pair.
    ///
    /// Exactly one of the four positions must be set; anything else is a
    /// caller error reported as [`RefError::InvalidEdit`].
    pub fn from_edits(inserted_at: LineEdit, deleted_at: LineEdit) -> Result<ShiftOperation> {
        let mut ops = [
            inserted_at.row.map(ShiftOperation::InsertRow),
            inserted_at.col.map(ShiftOperation::InsertColumn),
            deleted_at.row.map(ShiftOperation::DeleteRow),
            deleted_at.col.map(ShiftOperation::DeleteColumn),
        ]
        .into_iter()
        .flatten();

        match (ops.next(), ops.next()) {
            (Some(op), None) => Ok(op),
            (None, _) => Err(RefError::InvalidEdit("no insert or delete position given")),
            (Some(_), Some(_)) => Err(RefError::InvalidEdit(
                "only one insert or delete on one axis per call",
            )),
        }
    }

    pub fn axis(&self) -> Axis {
        match self {
            ShiftOperation::InsertRow(_) | ShiftOperation::DeleteRow(_) => Axis::Row,
            ShiftOperation::InsertColumn(_) | ShiftOperation::DeleteColumn(_) => Axis::Column,
        }
    }

    pub fn position(&self) -> usize {
        match *self {
            ShiftOperation::InsertRow(at)
            | ShiftOperation::DeleteRow(at)
            | ShiftOperation::InsertColumn(at)
            | ShiftOperation::DeleteColumn(at) => at,
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(
            self,
            ShiftOperation::InsertRow(_) | ShiftOperation::InsertColumn(_)
        )
    }
}

impl fmt::Display for ShiftOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftOperation::InsertRow(at) => write!(f, "insert row {}", *at as u128 + 1),
            ShiftOperation::DeleteRow(at) => write!(f, "delete row {}", *at as u128 + 1),
            ShiftOperation::InsertColumn(at) => {
                write!(f, "insert column {}", CellRef::col_to_letters(*at))
            }
            ShiftOperation::DeleteColumn(at) => {
                write!(f, "delete column {}", CellRef::col_to_letters(*at))
            }
        }
    }
}

/// Outcome of adjusting one reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefAdjustment {
    Valid(CellRef),
    /// The line the reference pointed at was deleted (or the reference was
    /// pushed past the addressable sheet).
    Dangling { original: CellRef },
}

impl RefAdjustment {
    pub fn is_dangling(&self) -> bool {
        matches!(self, RefAdjustment::Dangling { .. })
    }

    pub fn cell(&self) -> Option<CellRef> {
        match self {
            RefAdjustment::Valid(cell) => Some(*cell),
            RefAdjustment::Dangling { .. } => None,
        }
    }
}

impl fmt::Display for RefAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefAdjustment::Valid(cell) => write!(f, "{}", cell),
            RefAdjustment::Dangling { .. } => f.write_str(REF_ERROR),
        }
    }
}

/// Adjust a parsed reference for one structural edit.
pub fn adjust_cell_ref(cell: CellRef, op: ShiftOperation, absolute: Absolute) -> RefAdjustment {
    let axis = op.axis();
    let pinned = axis.is_absolute(&cell)
        || match axis {
            Axis::Row => absolute.row,
            Axis::Column => absolute.col,
        };
    if pinned {
        return RefAdjustment::Valid(cell);
    }

    let value = axis.get(&cell);
    let at = op.position();
    if op.is_insert() {
        if at > value {
            return RefAdjustment::Valid(cell);
        }
        match value.checked_add(1) {
            Some(moved) => RefAdjustment::Valid(axis.with_value(&cell, moved)),
            None => RefAdjustment::Dangling { original: cell },
        }
    } else if at < value {
        RefAdjustment::Valid(axis.with_value(&cell, value - 1))
    } else if at == value {
        RefAdjustment::Dangling { original: cell }
    } else {
        RefAdjustment::Valid(cell)
    }
}

/// Parse `addr` and adjust it for one structural edit.
///
/// The `$` markers in `addr` and the explicit `absolute` flags both pin an
/// axis. Output keeps the markers of the input text.
pub fn adjust_reference(
    addr: &str,
    op: ShiftOperation,
    absolute: Absolute,
) -> Result<RefAdjustment> {
    let cell = parse_address(addr)?;
    Ok(adjust_cell_ref(cell, op, absolute))
}

/// Adjust both endpoints of a range operand as a unit.
///
/// Deleting a line inside a range that spans several lines shrinks the range
/// instead of invalidating it. Returns None when the range dangles.
pub fn adjust_range_endpoints(
    first: CellRef,
    second: CellRef,
    op: ShiftOperation,
) -> Option<(CellRef, CellRef)> {
    let axis = op.axis();
    let (a, b) = (axis.get(&first), axis.get(&second));

    if op.is_insert() || a == b {
        let first = adjust_cell_ref(first, op, Absolute::default()).cell()?;
        let second = adjust_cell_ref(second, op, Absolute::default()).cell()?;
        return Some((first, second));
    }

    let lo = a.min(b);
    let at = op.position();
    let shrink = |cell: CellRef, value: usize| {
        if axis.is_absolute(&cell) {
            return cell;
        }
        // The low edge stays put when its own line goes: the next line slides into it.
        if at < value || (at == value && value != lo) {
            axis.with_value(&cell, value - 1)
        } else {
            cell
        }
    };
    Some((shrink(first, a), shrink(second, b)))
}
