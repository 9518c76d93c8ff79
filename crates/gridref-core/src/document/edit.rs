//! Incoming cell edits.
//!
//! Wire shape of an edit request body:
//!
//! ```json
//! { "edits": [
//!     { "addr": "A1", "kind": "literal", "value": "12" },
//!     { "addr": "B1", "kind": "formula", "formula": "=A1*2" }
//! ] }
//! ```

use serde::{Deserialize, Serialize};

use super::cell::Cell;
use crate::error::{CoreError, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Edit {
    Literal { addr: String, value: String },
    Formula { addr: String, formula: String },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditBatch {
    pub edits: Vec<Edit>,
}

impl Edit {
    /// Build an edit from raw cell input, classified by [`Cell::from_input`].
    pub fn from_input(addr: &str, input: &str) -> Edit {
        let addr = addr.to_string();
        match Cell::from_input(input) {
            Cell::Formula { src } => Edit::Formula { addr, formula: src },
            Cell::Literal { value } => Edit::Literal { addr, value },
            Cell::Error { .. } => Edit::Literal {
                addr,
                value: input.to_string(),
            },
        }
    }

    pub fn addr(&self) -> &str {
        match self {
            Edit::Literal { addr, .. } | Edit::Formula { addr, .. } => addr,
        }
    }

    /// The cell this edit writes, or None when it clears the cell.
    pub(crate) fn to_cell(&self) -> Result<Option<Cell>> {
        match self {
            Edit::Literal { value, .. } if value.is_empty() => Ok(None),
            Edit::Literal { value, .. } => Ok(Some(Cell::literal(value))),
            Edit::Formula { addr, formula } => {
                if !formula.starts_with('=') {
                    return Err(CoreError::NotAFormula { addr: addr.clone() });
                }
                Ok(Some(Cell::formula(formula)))
            }
        }
    }
}

/// Parse a JSON edit batch.
pub fn parse_edit_batch(json: &str) -> Result<EditBatch> {
    Ok(serde_json::from_str(json)?)
}
