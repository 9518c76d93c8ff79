use super::{Cell, Edit, Sheet};
use crate::error::{CoreError, Result};
use gridref_engine::engine::{
    Absolute, Axis, CellRange, CellRef, Direction, RefAdjustment, RefError, ShiftOperation,
    adjust_cell_ref, extract_dependencies, get_neighbor, parse_address, parse_range,
    shift_formula_references, transform_formula,
};
use std::collections::BTreeMap;

impl Sheet {
    /// Apply a batch of edits. Either every edit lands or none does.
    pub fn apply_edits(&self, edits: &[Edit]) -> Result<Sheet> {
        let mut prepared = Vec::with_capacity(edits.len());
        for edit in edits {
            let key = self.locate(edit.addr())?.to_string();
            prepared.push((key, edit.to_cell()?));
        }

        let mut next = self.next_version();
        for (key, cell) in prepared {
            match cell {
                Some(cell) => {
                    next.cells.insert(key, cell);
                }
                None => {
                    next.cells.remove(&key);
                }
            }
        }
        log::debug!(
            "Applied {} edit(s) to sheet {} (version {})",
            edits.len(),
            self.id,
            next.version
        );
        Ok(next)
    }

    /// Set one cell from raw input (`=` prefix makes it a formula).
    pub fn set_cell_from_input(&self, addr: &str, input: &str) -> Result<Sheet> {
        self.apply_edits(&[Edit::from_input(addr, input)])
    }

    pub fn clear_cell(&self, addr: &str) -> Result<Sheet> {
        let key = self.locate(addr)?.to_string();
        let mut next = self.next_version();
        next.cells.remove(&key);
        Ok(next)
    }

    /// Move cells and rewrite every formula for one structural edit.
    pub fn apply_shift(&self, op: ShiftOperation) -> Result<Sheet> {
        let extent = match op.axis() {
            Axis::Row => self.rows,
            Axis::Column => self.cols,
        };
        let at = op.position();
        let resized = if op.is_insert() {
            extent.checked_add(1).filter(|_| at <= extent)
        } else {
            extent.checked_sub(1).filter(|&n| at < extent && n > 0)
        };
        let Some(resized) = resized else {
            return Err(CoreError::StructuralEditOutOfRange {
                op,
                rows: self.rows,
                cols: self.cols,
            });
        };

        let mut next = self.next_version();
        match op.axis() {
            Axis::Row => next.rows = resized,
            Axis::Column => next.cols = resized,
        }

        let mut cells = BTreeMap::new();
        let mut removed = 0usize;
        let mut rewritten = 0usize;
        for (key, cell) in &self.cells {
            let Ok(position) = parse_address(key) else {
                log::warn!("Keeping cell with unparseable key {:?} in place", key);
                cells.insert(key.clone(), cell.clone());
                continue;
            };
            let RefAdjustment::Valid(moved) = adjust_cell_ref(position.relative(), op, Absolute::default())
            else {
                removed += 1;
                continue;
            };

            let cell = match cell {
                Cell::Formula { src } => {
                    let shifted = shift_formula_references(src, op);
                    if shifted != *src {
                        rewritten += 1;
                    }
                    Cell::formula(&shifted)
                }
                other => other.clone(),
            };
            cells.insert(moved.to_string(), cell);
        }
        next.cells = cells;

        log::debug!(
            "{} on sheet {}: {} cell(s) removed, {} formula(s) rewritten",
            op,
            self.id,
            removed,
            rewritten
        );
        Ok(next)
    }

    /// Insert a row above the specified row (0-based; `rows` appends).
    pub fn insert_row(&self, at_row: usize) -> Result<Sheet> {
        self.apply_shift(ShiftOperation::InsertRow(at_row))
    }

    /// Delete the specified row.
    pub fn delete_row(&self, at_row: usize) -> Result<Sheet> {
        self.apply_shift(ShiftOperation::DeleteRow(at_row))
    }

    /// Insert a column left of the specified column.
    pub fn insert_column(&self, at_col: usize) -> Result<Sheet> {
        self.apply_shift(ShiftOperation::InsertColumn(at_col))
    }

    /// Delete the specified column.
    pub fn delete_column(&self, at_col: usize) -> Result<Sheet> {
        self.apply_shift(ShiftOperation::DeleteColumn(at_col))
    }

    /// Copy a cell or range so its top-left lands on `target`.
    ///
    /// Formulas are rewritten relative to their new position; blank source
    /// cells clear their destination. Fails if any destination falls outside
    /// the sheet.
    pub fn paste_cells(&self, source: &str, target: &str) -> Result<Sheet> {
        let source_range = if source.contains(':') {
            parse_range(source)?
        } else {
            let cell = parse_address(source)?;
            CellRange::new(cell, cell)
        };
        let dims = self.dimension();
        for corner in [source_range.start, source_range.end] {
            if !dims.contains(&corner) {
                return Err(RefError::OutOfBounds {
                    address: corner.relative().to_string(),
                    rows: self.rows,
                    cols: self.cols,
                }
                .into());
            }
        }

        let origin = self.locate(target)?;
        let out_of_bounds = |address: String| -> CoreError {
            RefError::OutOfBounds {
                address,
                rows: self.rows,
                cols: self.cols,
            }
            .into()
        };

        let mut prepared = Vec::new();
        for from in source_range.cells() {
            // Cells of a normalized range never sit before its start.
            let col = origin.col.checked_add(from.col - source_range.start.col);
            let row = origin.row.checked_add(from.row - source_range.start.row);
            let dest = match (col, row) {
                (Some(col), Some(row)) if dims.contains(&CellRef::new(col, row)) => {
                    CellRef::new(col, row)
                }
                (Some(col), Some(row)) => {
                    return Err(out_of_bounds(CellRef::new(col, row).to_string()));
                }
                _ => return Err(out_of_bounds(format!("{} offset from {}", from, target))),
            };

            let (from_key, dest_key) = (from.to_string(), dest.to_string());
            let pasted = match self.cells.get(&from_key) {
                Some(Cell::Formula { src }) => {
                    Some(Cell::formula(&transform_formula(src, &from_key, &dest_key)?))
                }
                Some(other) => Some(other.clone()),
                None => None,
            };
            prepared.push((dest_key, pasted));
        }

        let mut next = self.next_version();
        let count = prepared.len();
        for (key, cell) in prepared {
            match cell {
                Some(cell) => {
                    next.cells.insert(key, cell);
                }
                None => {
                    next.cells.remove(&key);
                }
            }
        }
        log::debug!("Pasted {} cell(s) from {} to {}", count, source, target);
        Ok(next)
    }

    /// Arrow-key movement within this sheet.
    pub fn neighbor_of(&self, addr: &str, direction: Direction) -> Result<Option<String>> {
        Ok(get_neighbor(addr, direction, self.rows, self.cols)?)
    }

    /// Cells read by the formula at `addr`, ranges expanded. Empty for
    /// literals and blank cells.
    pub fn dependencies_of(&self, addr: &str) -> Result<Vec<CellRef>> {
        Ok(self
            .get(addr)?
            .and_then(Cell::formula_src)
            .map(extract_dependencies)
            .unwrap_or_default())
    }
}
