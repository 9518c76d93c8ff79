//! Property tests for the address codec and reference rewriting.

use gridref_engine::engine::*;
use proptest::prelude::*;

const CASES: u32 = 256;

fn cell_strategy() -> impl Strategy<Value = CellRef> {
    (0usize..20_000, 0usize..1_048_576, any::<bool>(), any::<bool>())
        .prop_map(|(col, row, abs_col, abs_row)| CellRef::with_absolute(col, row, abs_col, abs_row))
}

/// Any index, with the top of the `usize` range drawn often.
fn index_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![
        any::<usize>(),
        (0usize..1024).prop_map(|back| usize::MAX - back),
        Just(usize::MAX),
    ]
}

fn wide_cell_strategy() -> impl Strategy<Value = CellRef> {
    (index_strategy(), index_strategy(), any::<bool>(), any::<bool>())
        .prop_map(|(col, row, abs_col, abs_row)| CellRef::with_absolute(col, row, abs_col, abs_row))
}

#[test]
fn col_letters_bijection_first_thousand() {
    for col in 0..=1000usize {
        assert_eq!(letters_to_col(&col_to_letters(col)), Ok(col));
    }
}

#[test]
fn col_letters_strictly_increase_in_shortlex_order() {
    let mut prev = col_to_letters(0);
    for col in 1..=2000usize {
        let next = col_to_letters(col);
        assert!(
            (prev.len(), prev.as_str()) < (next.len(), next.as_str()),
            "{prev} should sort before {next}"
        );
        prev = next;
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: CASES,
        .. ProptestConfig::default()
    })]

    #[test]
    fn format_then_parse_round_trips(cell in cell_strategy()) {
        let text = format_address(cell.col, cell.row, cell.abs_col, cell.abs_row);
        prop_assert_eq!(parse_address(&text), Ok(cell));
        prop_assert_eq!(cell.to_string(), text);
    }

    #[test]
    fn round_trip_holds_across_full_index_range(cell in wide_cell_strategy()) {
        let text = cell.to_string();
        prop_assert_eq!(parse_address(&text), Ok(cell));
        prop_assert_eq!(letters_to_col(&col_to_letters(cell.col)), Ok(cell.col));
    }

    #[test]
    fn parse_never_panics(input in ".{0,24}") {
        let _ = parse_address(&input);
        let _ = parse_range(&input);
        let _ = is_valid_address(&input, 100, 100);
    }

    #[test]
    fn rewriting_never_panics(input in ".{0,64}", dc in -5isize..5, dr in -5isize..5, at in 0usize..10) {
        let _ = offset_formula_references(&input, dc, dr);
        let _ = shift_formula_references(&input, ShiftOperation::DeleteRow(at));
        let _ = shift_formula_references(&input, ShiftOperation::InsertColumn(at));
    }

    #[test]
    fn copy_there_and_back_is_identity(cell in cell_strategy(), dc in 0isize..50, dr in 0isize..50) {
        let formula = format!("={}+1", cell);
        let there = offset_formula_references(&formula, dc, dr);
        let back = offset_formula_references(&there, -dc, -dr);
        prop_assert_eq!(back, formula);
    }

    #[test]
    fn insert_then_delete_same_line_is_identity(cell in cell_strategy(), at in 0usize..2000) {
        let text = cell.to_string();
        let inserted = adjust_reference(&text, ShiftOperation::InsertRow(at), Absolute::default()).unwrap();
        let moved = inserted.cell().unwrap().to_string();
        let restored = adjust_reference(&moved, ShiftOperation::DeleteRow(at), Absolute::default()).unwrap();
        prop_assert_eq!(restored.to_string(), text);
    }

    #[test]
    fn range_cells_stay_inside_and_count_matches(a in cell_strategy(), w in 0usize..6, h in 0usize..6) {
        let b = CellRef::new(a.col + w, a.row + h);
        let range = CellRange::new(b, a);
        let cells: Vec<CellRef> = range.cells().collect();
        prop_assert_eq!(Some(cells.len()), range.cell_count());
        prop_assert!(cells.iter().all(|c| range.contains(c)));
        prop_assert_eq!(cells.first().copied(), Some(range.start.relative()));
        prop_assert_eq!(cells.last().copied(), Some(range.end.relative()));
    }
}
