//! gridref-core - Sheet snapshots and edit application (UI-agnostic).

pub mod document;
pub mod error;

pub use document::{Cell, Edit, EditBatch, ErrorCode, Sheet, parse_edit_batch};
pub use error::{CoreError, Result};

pub use gridref_engine::engine::{CellRef, Direction, SheetDimension};
