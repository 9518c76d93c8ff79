//! Formula text scanning.
//!
//! Splits formula source into verbatim text and cell references. Quoted
//! spans (`"..."` strings and `'...'` sheet names, with a doubled quote as
//! the escape) are never inspected.
//!
//! Outside quotes, a *word* is a maximal run of identifier characters
//! (alphanumerics, `_`, `.` and `$`). A word is a reference only when the
//! whole word matches the address grammar and the next character is neither
//! `(` (a function name such as `LOG10(`) nor `!` (a sheet name). Words that
//! merely contain an address, like `X1Y` or `1E3`, are left alone.

use super::cell_ref::{CellRef, parse_address};
use super::range::CellRange;

const MAX_DEPENDENCY_RANGE_CELLS: usize = 1_000_000;

/// A piece of formula source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// Copied through verbatim: operators, literals, names, whitespace.
    Text(&'a str),
    Ref { text: &'a str, cell: CellRef },
}

/// A reference operand found in a formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormulaRef {
    Cell(CellRef),
    Range(CellRange),
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.' || c == '$'
}

/// Split a formula into text and reference tokens. Concatenating the token
/// texts reproduces the input exactly.
pub fn tokenize(formula: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0usize;
    let mut chars = formula.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if ch == '"' || ch == '\'' {
            // An unterminated quote swallows the rest of the formula.
            while let Some((_, c)) = chars.next() {
                if c == ch {
                    if matches!(chars.peek(), Some(&(_, next)) if next == ch) {
                        chars.next();
                    } else {
                        break;
                    }
                }
            }
            continue;
        }

        if !is_word_char(ch) {
            continue;
        }

        let start = i;
        let mut end = i + ch.len_utf8();
        while let Some(&(j, c)) = chars.peek() {
            if !is_word_char(c) {
                break;
            }
            end = j + c.len_utf8();
            chars.next();
        }

        if matches!(formula[end..].chars().next(), Some('(' | '!')) {
            continue;
        }

        let word = &formula[start..end];
        if let Ok(cell) = parse_address(word) {
            if text_start < start {
                tokens.push(Token::Text(&formula[text_start..start]));
            }
            tokens.push(Token::Ref { text: word, cell });
            text_start = end;
        }
    }

    if text_start < formula.len() {
        tokens.push(Token::Text(&formula[text_start..]));
    }
    tokens
}

/// All reference operands in a formula, in source order. `A1:B2` is one
/// range operand rather than two cells.
pub fn extract_references(formula: &str) -> Vec<FormulaRef> {
    let tokens = tokenize(formula);
    let mut refs = Vec::new();
    let mut i = 0usize;

    while i < tokens.len() {
        if let Token::Ref { cell, .. } = tokens[i] {
            if let Some(second) = range_partner(&tokens, i) {
                refs.push(FormulaRef::Range(CellRange::new(cell, second)));
                i += 3;
                continue;
            }
            refs.push(FormulaRef::Cell(cell));
        }
        i += 1;
    }
    refs
}

/// Every cell a formula reads, with ranges expanded in row-major order.
///
/// Ranges larger than a million cells are skipped.
pub fn extract_dependencies(formula: &str) -> Vec<CellRef> {
    let mut deps = Vec::new();
    for reference in extract_references(formula) {
        match reference {
            FormulaRef::Cell(cell) => deps.push(cell.relative()),
            FormulaRef::Range(range) => {
                let Some(count) = range.cell_count() else {
                    continue;
                };
                if count > MAX_DEPENDENCY_RANGE_CELLS {
                    log::debug!("Skipping {} in dependency scan: {} cells", range, count);
                    continue;
                }
                deps.extend(range.cells());
            }
        }
    }
    deps
}

/// If the reference at `i` is the first half of `X:Y`, return `Y`.
pub(crate) fn range_partner(tokens: &[Token<'_>], i: usize) -> Option<CellRef> {
    match (tokens.get(i + 1), tokens.get(i + 2)) {
        (Some(Token::Text(":")), Some(Token::Ref { cell, .. })) => Some(*cell),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ref_texts(formula: &str) -> Vec<&str> {
        tokenize(formula)
            .into_iter()
            .filter_map(|t| match t {
                Token::Ref { text, .. } => Some(text),
                Token::Text(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_tokenize_reassembles_input() {
        let formula = "=SUM($A$1:B2) + \"C3\" & 'Q1'!D4 * LOG10(E5) - 1.5E3";
        let joined: String = tokenize(formula)
            .into_iter()
            .map(|t| match t {
                Token::Text(s) => s,
                Token::Ref { text, .. } => text,
            })
            .collect();
        assert_eq!(joined, formula);
    }

    #[test]
    fn test_function_names_are_not_references() {
        assert_eq!(ref_texts("=LOG10(A1)"), vec!["A1"]);
        assert_eq!(ref_texts("=ATAN2(B1, C1)"), vec!["B1", "C1"]);
    }

    #[test]
    fn test_longer_identifiers_are_not_references() {
        assert!(ref_texts("=X1Y + A1_B + _A1 + A1.5 + 1E3").is_empty());
        assert_eq!(ref_texts("=A1+B2*c3"), vec!["A1", "B2", "c3"]);
    }

    #[test]
    fn test_string_literals_are_skipped() {
        assert_eq!(ref_texts("=\"A1\" & B1"), vec!["B1"]);
        assert_eq!(ref_texts("=\"say \"\"A1\"\"\" & B1"), vec!["B1"]);
        assert!(ref_texts("=\"unterminated A1").is_empty());
    }

    #[test]
    fn test_sheet_qualifier_is_left_alone() {
        assert_eq!(ref_texts("=Sheet2!A1"), vec!["A1"]);
        assert_eq!(ref_texts("=Q1!A1"), vec!["A1"]);
        assert_eq!(ref_texts("='Q1 2024'!B2"), vec!["B2"]);
    }

    #[test]
    fn test_absolute_markers_are_part_of_the_word() {
        let tokens = tokenize("=$A$1+A$2");
        assert_eq!(
            tokens,
            vec![
                Token::Text("="),
                Token::Ref {
                    text: "$A$1",
                    cell: CellRef::with_absolute(0, 0, true, true)
                },
                Token::Text("+"),
                Token::Ref {
                    text: "A$2",
                    cell: CellRef::with_absolute(0, 1, false, true)
                },
            ]
        );
    }

    #[test]
    fn test_error_tokens_are_text() {
        assert!(ref_texts("=#REF!+1").is_empty());
    }

    #[test]
    fn test_extract_references_groups_ranges() {
        let refs = extract_references("=SUM(A1:B2) + C3");
        assert_eq!(refs.len(), 2);
        assert!(matches!(refs[0], FormulaRef::Range(r) if r.to_string() == "A1:B2"));
        assert_eq!(refs[1], FormulaRef::Cell(CellRef::new(2, 2)));
    }

    #[test]
    fn test_extract_dependencies_expands_ranges() {
        let deps = extract_dependencies("=SUM(A1:A3) + $B$1");
        assert_eq!(
            deps,
            vec![
                CellRef::new(0, 0),
                CellRef::new(0, 1),
                CellRef::new(0, 2),
                CellRef::new(1, 0),
            ]
        );
    }

    #[test]
    fn test_extract_dependencies_skips_over_limit_ranges() {
        let deps = extract_dependencies("=SUM(A1:A1000001)+B2");
        assert_eq!(deps, vec![CellRef::new(1, 1)]);
    }

    #[test]
    fn test_non_ascii_text_is_preserved() {
        assert_eq!(ref_texts("=\"größe\" & Ä1 & é + B1"), vec!["B1"]);
    }
}
