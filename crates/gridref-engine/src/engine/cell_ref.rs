//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style cell references
//! (e.g., "A1", "$B$3", "AA$100") and zero-indexed column/row coordinates.
//! Column letters use bijective base-26 (A=1 .. Z=26, no zero digit), so the
//! column after "Z" is "AA".
//!
//! # Examples
//!
//! ```ignore
//! let cell = CellRef::from_str("$B3").unwrap();
//! assert_eq!(cell.col, 1);  // 0-indexed
//! assert_eq!(cell.row, 2);
//! assert!(cell.abs_col && !cell.abs_row);
//! assert_eq!(cell.to_string(), "$B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use super::error::{RefError, Result};

/// A reference to a cell by column and row indices (0-indexed).
///
/// `abs_col` / `abs_row` record the `$` markers of the textual form. They are
/// independent: `$A1`, `A$1`, `$A$1` and `A1` are four distinct references.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellRef {
    pub col: usize,
    pub row: usize,
    #[serde(default)]
    pub abs_col: bool,
    #[serde(default)]
    pub abs_row: bool,
}

impl CellRef {
    /// A fully relative reference.
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef {
            col,
            row,
            abs_col: false,
            abs_row: false,
        }
    }

    pub fn with_absolute(col: usize, row: usize, abs_col: bool, abs_row: bool) -> CellRef {
        CellRef {
            col,
            row,
            abs_col,
            abs_row,
        }
    }

    /// Same cell with both `$` markers dropped.
    pub fn relative(&self) -> CellRef {
        CellRef::new(self.col, self.row)
    }

    /// Parse a cell reference from spreadsheet notation (e.g., "A1", "$B$2", "aa10").
    /// Returns None if the input is invalid.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        parse_address(name).ok()
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

fn address_re() -> &'static Regex {
    static ADDRESS_RE: OnceLock<Regex> = OnceLock::new();
    ADDRESS_RE.get_or_init(|| {
        Regex::new(r"^(?<abs_col>\$)?(?<letters>[A-Za-z]+)(?<abs_row>\$)?(?<numbers>[1-9][0-9]*)$")
            .expect("address regex must compile")
    })
}

/// Encode a 0-based column index as bijective base-26 letters.
pub fn col_to_letters(col: usize) -> String {
    CellRef::col_to_letters(col)
}

/// Decode column letters (case-insensitive) into a 0-based column index.
///
/// Fails on empty input, non-ASCII-alphabetic input, or a column that does
/// not fit in `usize`.
pub fn letters_to_col(letters: &str) -> Result<usize> {
    let invalid = || RefError::InvalidColumnLetters(letters.to_string());
    if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(invalid());
    }

    // Accumulates col + 1, which exceeds usize for the last column.
    let mut acc = 0u128;
    for c in letters.bytes() {
        let digit = (c.to_ascii_uppercase() - b'A') as u128 + 1;
        acc = acc
            .checked_mul(26)
            .and_then(|a| a.checked_add(digit))
            .ok_or_else(invalid)?;
    }
    usize::try_from(acc - 1).map_err(|_| invalid())
}

/// Parse an address matching `('$')? COL ('$')? ROW`.
///
/// The row must be a decimal number without leading zeros, at least 1.
pub fn parse_address(addr: &str) -> Result<CellRef> {
    let invalid = || RefError::InvalidAddressFormat(addr.to_string());
    let caps = address_re().captures(addr).ok_or_else(invalid)?;

    let col = letters_to_col(&caps["letters"]).map_err(|_| invalid())?;
    let row = caps["numbers"]
        .parse::<u128>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(invalid)?;

    Ok(CellRef {
        col,
        row,
        abs_col: caps.name("abs_col").is_some(),
        abs_row: caps.name("abs_row").is_some(),
    })
}

/// Format a coordinate as an address, emitting `$` for each absolute axis.
pub fn format_address(col: usize, row: usize, abs_col: bool, abs_row: bool) -> String {
    let mut out = String::new();
    if abs_col {
        out.push('$');
    }
    out.push_str(&col_to_letters(col));
    if abs_row {
        out.push('$');
    }
    out.push_str(&(row as u128 + 1).to_string());
    out
}

impl std::str::FromStr for CellRef {
    type Err = RefError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        parse_address(s)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_address(
            self.col,
            self.row,
            self.abs_col,
            self.abs_row,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_a1_overflow_returns_none() {
        let huge = format!("{}1", "Z".repeat(40));
        assert!(CellRef::from_str(&huge).is_none());
        assert!(matches!(
            parse_address(&huge),
            Err(RefError::InvalidAddressFormat(_))
        ));
    }

    #[test]
    fn test_col_to_letters_handles_max_usize() {
        let letters = CellRef::col_to_letters(usize::MAX);
        assert!(!letters.is_empty());
        assert!(letters.chars().all(|c| c.is_ascii_uppercase()));
        assert_eq!(letters_to_col(&letters), Ok(usize::MAX));
    }

    #[test]
    fn test_round_trip_at_usize_max() {
        let last_col = format_address(usize::MAX, 0, false, false);
        assert_eq!(parse_address(&last_col), Ok(CellRef::new(usize::MAX, 0)));

        let last_row = format_address(0, usize::MAX, false, true);
        assert_eq!(last_row, "A$18446744073709551616");
        assert_eq!(
            parse_address(&last_row),
            Ok(CellRef::with_absolute(0, usize::MAX, false, true))
        );

        // One past the last row or column is rejected.
        assert!(parse_address("A18446744073709551617").is_err());
        assert_eq!(CellRef::col_to_letters(usize::MAX), "GKGWBYLWRXTLPP");
        assert!(letters_to_col("GKGWBYLWRXTLPQ").is_err());
        assert!(parse_address("ZZZZZZZZZZZZZZ1").is_err());
    }

    #[test]
    fn test_col_to_letters_known_values() {
        assert_eq!(col_to_letters(0), "A");
        assert_eq!(col_to_letters(25), "Z");
        assert_eq!(col_to_letters(26), "AA");
        assert_eq!(col_to_letters(27), "AB");
        assert_eq!(col_to_letters(701), "ZZ");
        assert_eq!(col_to_letters(702), "AAA");
    }

    #[test]
    fn test_letters_to_col_rejects_bad_input() {
        assert!(matches!(
            letters_to_col(""),
            Err(RefError::InvalidColumnLetters(_))
        ));
        assert!(matches!(
            letters_to_col("A1"),
            Err(RefError::InvalidColumnLetters(_))
        ));
        assert!(matches!(
            letters_to_col("É"),
            Err(RefError::InvalidColumnLetters(_))
        ));
        assert_eq!(letters_to_col("zz"), Ok(701));
    }

    #[test]
    fn test_parse_address_absolute_markers_are_independent() {
        assert_eq!(
            parse_address("$A$1"),
            Ok(CellRef::with_absolute(0, 0, true, true))
        );
        assert_eq!(
            parse_address("B$2"),
            Ok(CellRef::with_absolute(1, 1, false, true))
        );
        assert_eq!(
            parse_address("$C3"),
            Ok(CellRef::with_absolute(2, 2, true, false))
        );
        assert_eq!(parse_address("D4"), Ok(CellRef::new(3, 3)));
    }

    #[test]
    fn test_parse_address_rejects_malformed() {
        for bad in [
            "", "A", "1", "A0", "A01", "1A", "A1B", " A1", "A1 ", "$$A1", "A$$1", "A$", "$1",
            "A-1", "A1:B2", "Ä1",
        ] {
            assert!(
                matches!(parse_address(bad), Err(RefError::InvalidAddressFormat(_))),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_display_round_trips_canonical_text() {
        for text in ["A1", "$A1", "A$1", "$A$1", "ZZ999", "$AAA$12"] {
            assert_eq!(parse_address(text).unwrap().to_string(), text);
        }
        assert_eq!(parse_address("ab$7").unwrap().to_string(), "AB$7");
    }
}
