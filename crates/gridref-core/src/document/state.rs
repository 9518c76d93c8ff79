use gridref_engine::engine::{CellRef, SheetDimension, check_bounds};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::cell::Cell;
use crate::error::{CoreError, Result};

/// An immutable, versioned snapshot of one sheet.
///
/// Every edit returns a new snapshot with `version + 1`; the receiver is
/// never modified. Cells are keyed by canonical relative address ("B3").
/// Deserializing enforces both: a non-empty dimension and in-bounds keys,
/// which are canonicalized on the way in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSheet")]
pub struct Sheet {
    pub id: String,
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    pub version: u64,
    pub cells: BTreeMap<String, Cell>,
}

/// Wire form of a [`Sheet`], before validation.
#[derive(Deserialize)]
struct RawSheet {
    id: String,
    name: String,
    rows: usize,
    cols: usize,
    #[serde(default)]
    version: u64,
    #[serde(default)]
    cells: BTreeMap<String, Cell>,
}

impl TryFrom<RawSheet> for Sheet {
    type Error = CoreError;

    fn try_from(raw: RawSheet) -> Result<Sheet> {
        let mut sheet = Sheet::new(&raw.id, &raw.name, raw.rows, raw.cols)?;
        sheet.version = raw.version;
        for (key, cell) in raw.cells {
            let addr = sheet.locate(&key)?.to_string();
            if sheet.cells.insert(addr.clone(), cell).is_some() {
                return Err(CoreError::DuplicateCell { addr });
            }
        }
        Ok(sheet)
    }
}

impl Sheet {
    pub fn new(id: &str, name: &str, rows: usize, cols: usize) -> Result<Sheet> {
        if rows == 0 || cols == 0 {
            return Err(CoreError::EmptySheet);
        }
        Ok(Sheet {
            id: id.to_string(),
            name: name.to_string(),
            rows,
            cols,
            version: 0,
            cells: BTreeMap::new(),
        })
    }

    pub fn dimension(&self) -> SheetDimension {
        SheetDimension::new(self.rows, self.cols)
    }

    /// Resolve a user-supplied address to its in-bounds cell, without `$`.
    pub(crate) fn locate(&self, addr: &str) -> Result<CellRef> {
        Ok(check_bounds(addr, self.dimension())?.relative())
    }

    pub fn get(&self, addr: &str) -> Result<Option<&Cell>> {
        let key = self.locate(addr)?.to_string();
        Ok(self.cells.get(&key))
    }

    /// Committed text of a cell; empty for a blank cell.
    pub fn display(&self, addr: &str) -> Result<String> {
        Ok(self
            .get(addr)?
            .map(Cell::committed_text)
            .unwrap_or_default())
    }

    /// A copy of this snapshot with the version bumped, ready to be edited.
    pub(crate) fn next_version(&self) -> Sheet {
        Sheet {
            version: self.version + 1,
            ..self.clone()
        }
    }
}
