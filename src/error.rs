//! Command-line usage errors.

use thiserror::Error;

/// Problems with the arguments themselves; these print usage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("{0} requires a value")]
    MissingValue(String),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("No command given")]
    NoCommand,

    #[error("Usage: gridref {0}")]
    WrongArguments(&'static str),

    #[error("{flag} expects a non-negative integer, got {value:?}")]
    InvalidNumber { flag: String, value: String },
}
