//! Error types for the reference engine.

use thiserror::Error;

/// Failures produced while parsing or validating user-supplied references.
///
/// A reference invalidated by a delete is not an error; see
/// [`RefAdjustment::Dangling`](super::RefAdjustment::Dangling).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefError {
    #[error("Invalid cell address: {0:?}")]
    InvalidAddressFormat(String),

    #[error("Invalid column letters: {0:?}")]
    InvalidColumnLetters(String),

    #[error("Invalid range: {0:?}")]
    InvalidRangeFormat(String),

    #[error("Address {address} is outside a sheet of {rows} rows x {cols} columns")]
    OutOfBounds {
        address: String,
        rows: usize,
        cols: usize,
    },

    /// A structural edit request that is not exactly one insert or delete
    /// on one axis. This is a caller bug rather than bad user input.
    #[error("Invalid structural edit: {0}")]
    InvalidEdit(&'static str),
}

pub type Result<T> = std::result::Result<T, RefError>;
