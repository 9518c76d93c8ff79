//! Error types for Gridref core.

use gridref_engine::engine::{RefError, ShiftOperation};
use thiserror::Error;

/// Errors raised while applying edits to a sheet snapshot.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Reference(#[from] RefError),

    #[error("Invalid edit batch: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Formula for {addr} must start with '='")]
    NotAFormula { addr: String },

    #[error("A sheet needs at least one row and one column")]
    EmptySheet,

    #[error("Cell {addr} appears more than once")]
    DuplicateCell { addr: String },

    #[error("Cannot {op} on a sheet of {rows} rows x {cols} columns")]
    StructuralEditOutOfRange {
        op: ShiftOperation,
        rows: usize,
        cols: usize,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
