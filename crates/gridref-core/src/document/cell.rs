//! Cell contents.
//!
//! A cell is exactly one of a literal, a formula, or an evaluation error.
//! The serialized form is tagged by `kind`:
//! `{"kind":"literal","value":"12"}`, `{"kind":"formula","src":"=A1*2"}`,
//! `{"kind":"error","code":"REF"}`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ErrorCode {
    Ref,
    Value,
    Name,
    Cycle,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            ErrorCode::Ref => "REF",
            ErrorCode::Value => "VALUE",
            ErrorCode::Name => "NAME",
            ErrorCode::Cycle => "CYCLE",
        };
        write!(f, "#{}!", code)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Cell {
    Literal { value: String },
    /// Formula source, including the leading `=`.
    Formula { src: String },
    Error { code: ErrorCode },
}

impl Cell {
    pub fn literal(value: &str) -> Cell {
        Cell::Literal {
            value: value.to_string(),
        }
    }

    pub fn formula(src: &str) -> Cell {
        Cell::Formula {
            src: src.to_string(),
        }
    }

    /// Parse user input: anything starting with `=` is a formula, everything
    /// else a literal.
    pub fn from_input(input: &str) -> Cell {
        if input.starts_with('=') {
            Cell::formula(input)
        } else {
            Cell::literal(input)
        }
    }

    /// Text shown for a committed cell: the literal value, the formula
    /// source, or the `#CODE!` error token.
    pub fn committed_text(&self) -> String {
        match self {
            Cell::Literal { value } => value.clone(),
            Cell::Formula { src } => src.clone(),
            Cell::Error { code } => code.to_string(),
        }
    }

    pub fn formula_src(&self) -> Option<&str> {
        match self {
            Cell::Formula { src } => Some(src),
            Cell::Literal { .. } | Cell::Error { .. } => None,
        }
    }
}
