//! Formula reference rewriting.
//!
//! - **Copy/paste**: relative axes move by the offset between the source and
//!   destination cells, `$` axes stay put. A reference pushed before the
//!   sheet origin becomes `#REF!`.
//! - **Structural edits**: every reference is adjusted for one row/column
//!   insert or delete (see [`adjust`](super::adjust)). Range operands are
//!   adjusted as a unit so deleting an inner line shrinks them.
//!
//! Everything that is not a reference is copied through verbatim.

use super::adjust::{
    Absolute, REF_ERROR, RefAdjustment, ShiftOperation, adjust_cell_ref, adjust_range_endpoints,
};
use super::cell_ref::{CellRef, parse_address};
use super::error::Result;
use super::scan::{Token, range_partner, tokenize};

/// Rewrite a formula copied from `from` to `to`.
///
/// `=A1+B1` copied from A1 to B2 becomes `=B2+C2`; `$A$1` is unchanged.
pub fn transform_formula(formula: &str, from: &str, to: &str) -> Result<String> {
    let from = parse_address(from)?;
    let to = parse_address(to)?;
    Ok(offset_formula_references_wide(
        formula,
        to.col as i128 - from.col as i128,
        to.row as i128 - from.row as i128,
    ))
}

/// Move one reference by a relative offset, keeping `$` axes fixed.
pub fn offset_cell_ref(cell: CellRef, delta_col: isize, delta_row: isize) -> RefAdjustment {
    offset_cell_ref_wide(cell, delta_col as i128, delta_row as i128)
}

// i128 holds any difference of two usize values exactly.
fn offset_cell_ref_wide(cell: CellRef, delta_col: i128, delta_row: i128) -> RefAdjustment {
    let shift = |value: usize, pinned: bool, delta: i128| {
        if pinned {
            Some(value)
        } else {
            usize::try_from(value as i128 + delta).ok()
        }
    };

    match (
        shift(cell.col, cell.abs_col, delta_col),
        shift(cell.row, cell.abs_row, delta_row),
    ) {
        (Some(col), Some(row)) => RefAdjustment::Valid(CellRef { col, row, ..cell }),
        _ => RefAdjustment::Dangling { original: cell },
    }
}

/// Offset all cell references in a formula by a relative column/row delta.
/// Used by copy/paste so pasted formulas preserve relative references.
///
/// Rules:
/// - `A1` offset by (+1, +2) becomes `B3`
/// - range refs are offset on both ends: `SUM(A1:B2)` -> `SUM(B3:C4)`
/// - refs that move before the origin become `#REF!`; a range with either
///   end out of bounds becomes a single `#REF!`
pub fn offset_formula_references(formula: &str, delta_col: isize, delta_row: isize) -> String {
    offset_formula_references_wide(formula, delta_col as i128, delta_row as i128)
}

fn offset_formula_references_wide(formula: &str, delta_col: i128, delta_row: i128) -> String {
    if delta_col == 0 && delta_row == 0 {
        return formula.to_string();
    }

    rewrite_references(
        formula,
        |cell| offset_cell_ref_wide(cell, delta_col, delta_row),
        |first, second| {
            let first = offset_cell_ref_wide(first, delta_col, delta_row).cell()?;
            let second = offset_cell_ref_wide(second, delta_col, delta_row).cell()?;
            Some((first, second))
        },
    )
}

/// Shift cell references in a formula when rows/cols are inserted/deleted.
/// Returns the updated formula string.
///
/// Rules:
/// - Insert row at R: refs to row >= R become row + 1
/// - Delete row at R: refs to row > R become row - 1; row == R becomes `#REF!`
/// - A range only becomes `#REF!` once every one of its lines is deleted:
///   `SUM(A1:A3)` after deleting row 3 is `SUM(A1:A2)`
/// - Same logic for columns; `$` axes never move
pub fn shift_formula_references(formula: &str, op: ShiftOperation) -> String {
    rewrite_references(
        formula,
        |cell| adjust_cell_ref(cell, op, Absolute::default()),
        |first, second| adjust_range_endpoints(first, second, op),
    )
}

fn rewrite_references<S, R>(formula: &str, single: S, range: R) -> String
where
    S: Fn(CellRef) -> RefAdjustment,
    R: Fn(CellRef, CellRef) -> Option<(CellRef, CellRef)>,
{
    let tokens = tokenize(formula);
    let mut out = String::with_capacity(formula.len());
    let mut dangling = 0usize;
    let mut i = 0usize;

    while i < tokens.len() {
        match tokens[i] {
            Token::Text(text) => out.push_str(text),
            Token::Ref { text, cell } => {
                if let Some(second) = range_partner(&tokens, i) {
                    match range(cell, second) {
                        Some((first, second)) => {
                            out.push_str(&format!("{}:{}", first, second));
                        }
                        None => {
                            dangling += 1;
                            out.push_str(REF_ERROR);
                        }
                    }
                    i += 3;
                    continue;
                }

                match single(cell) {
                    RefAdjustment::Valid(moved) => {
                        log::trace!("Reference {} -> {}", text, moved);
                        out.push_str(&moved.to_string());
                    }
                    RefAdjustment::Dangling { .. } => {
                        dangling += 1;
                        out.push_str(REF_ERROR);
                    }
                }
            }
        }
        i += 1;
    }

    if dangling > 0 {
        log::warn!(
            "{} reference(s) in {:?} no longer point at a cell",
            dangling,
            formula
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RefError;

    #[test]
    fn test_transform_formula_relative_shift() {
        assert_eq!(transform_formula("=A1+B1", "A1", "B2").unwrap(), "=B2+C2");
    }

    #[test]
    fn test_transform_formula_keeps_absolute() {
        assert_eq!(
            transform_formula("=$A$1+B1", "A1", "B2").unwrap(),
            "=$A$1+C2"
        );
        assert_eq!(
            transform_formula("=$A1+A$1", "A1", "C3").unwrap(),
            "=$A3+C$1"
        );
    }

    #[test]
    fn test_transform_formula_before_origin_is_ref_error() {
        assert_eq!(
            transform_formula("=A1+B2", "B2", "A1").unwrap(),
            "=#REF!+A1"
        );
        assert_eq!(
            transform_formula("=SUM(A1:B3)", "C3", "C2").unwrap(),
            "=SUM(#REF!)"
        );
    }

    #[test]
    fn test_transform_formula_leaves_strings_and_functions() {
        assert_eq!(
            transform_formula("=IF(A1>0, \"A1\", LOG10(A2))", "A1", "A2").unwrap(),
            "=IF(A2>0, \"A1\", LOG10(A3))"
        );
    }

    #[test]
    fn test_transform_formula_rejects_bad_cells() {
        assert!(matches!(
            transform_formula("=A1", "A0", "B2"),
            Err(RefError::InvalidAddressFormat(_))
        ));
    }

    #[test]
    fn test_transform_formula_offsets_wider_than_isize() {
        let last_row = "A18446744073709551616";
        assert_eq!(
            transform_formula("=A1+B1", "A1", last_row).unwrap(),
            "=A18446744073709551616+B18446744073709551616"
        );
        assert_eq!(
            transform_formula("=A18446744073709551616", last_row, "A1").unwrap(),
            "=A1"
        );
        assert_eq!(transform_formula("=A2", "A1", last_row).unwrap(), "=#REF!");
    }

    #[test]
    fn test_offset_formula_references_positive_delta() {
        let formula = "SUM(A1:B2) + @C3 + D4";
        let shifted = offset_formula_references(formula, 1, 2);
        assert_eq!(shifted, "SUM(B3:C4) + @D5 + E6");
    }

    #[test]
    fn test_offset_formula_references_zero_delta_is_identity() {
        assert_eq!(offset_formula_references("=a1+b2", 0, 0), "=a1+b2");
    }

    #[test]
    fn test_offset_formula_references_canonicalizes_case() {
        assert_eq!(offset_formula_references("=a1", 0, 1), "=A2");
    }

    #[test]
    fn test_shift_formula_references_preserves_paren() {
        let shifted = shift_formula_references("VEC(A1:A100)", ShiftOperation::InsertColumn(0));
        assert_eq!(shifted, "VEC(B1:B100)");
    }

    #[test]
    fn test_shift_formula_references_mixed_range_and_cell() {
        let shifted = shift_formula_references("SUM(A1:A3) + B1", ShiftOperation::InsertColumn(0));
        assert_eq!(shifted, "SUM(B1:B3) + C1");
    }

    #[test]
    fn test_shift_formula_references_delete_exact_row() {
        let shifted = shift_formula_references("=A1+A2+A3", ShiftOperation::DeleteRow(1));
        assert_eq!(shifted, "=A1+#REF!+A2");
    }

    #[test]
    fn test_shift_formula_references_range_shrinks() {
        let shifted = shift_formula_references("=SUM(A1:A3)", ShiftOperation::DeleteRow(2));
        assert_eq!(shifted, "=SUM(A1:A2)");
        let shifted = shift_formula_references("=SUM(A2:C2)", ShiftOperation::DeleteRow(1));
        assert_eq!(shifted, "=SUM(#REF!)");
    }

    #[test]
    fn test_shift_formula_references_absolute() {
        let shifted = shift_formula_references("=$A$2+A2", ShiftOperation::InsertRow(0));
        assert_eq!(shifted, "=$A$2+A3");
    }

    #[test]
    fn test_shift_formula_references_ignores_strings() {
        let shifted =
            shift_formula_references("=CONCAT(\"B1\", B1)", ShiftOperation::InsertColumn(1));
        assert_eq!(shifted, "=CONCAT(\"B1\", C1)");
    }
}
