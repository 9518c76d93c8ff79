//! Address and formula-reference engine API.
//!
//! Every operation here is a pure function of its arguments:
//!
//! - [`CellRef`], [`parse_address`], [`format_address`] - A1 notation with `$` markers
//! - [`col_to_letters`], [`letters_to_col`] - bijective base-26 column letters
//! - [`CellRange`], [`parse_range`], [`cells_in_range`] - rectangular ranges
//! - [`adjust_reference`], [`ShiftOperation`] - row/column insert and delete
//! - [`transform_formula`], [`shift_formula_references`] - formula text rewriting
//! - [`is_valid_address`], [`get_neighbor`] - bounds checks and navigation

mod adjust;
mod bounds;
mod cell_ref;
mod error;
mod range;
mod scan;
mod transform;

pub use adjust::{
    Absolute, Axis, LineEdit, REF_ERROR, RefAdjustment, ShiftOperation, adjust_cell_ref,
    adjust_range_endpoints, adjust_reference,
};
pub use bounds::{Direction, SheetDimension, check_bounds, get_neighbor, is_valid_address, step};
pub use cell_ref::{CellRef, col_to_letters, format_address, letters_to_col, parse_address};
pub use error::{RefError, Result};
pub use range::{CellRange, cells_in_range, parse_range};
pub use scan::{FormulaRef, Token, extract_dependencies, extract_references, tokenize};
pub use transform::{
    offset_cell_ref, offset_formula_references, shift_formula_references, transform_formula,
};
