//! Subcommand implementations. Each returns the lines to print on stdout.

use crate::config::Config;
use crate::error::UsageError;
use anyhow::{Context, Result, anyhow};
use gridref_core::{Sheet, parse_edit_batch};
use gridref_engine::engine::{
    Absolute, CellRange, Direction, LineEdit, ShiftOperation, SheetDimension, adjust_reference,
    cells_in_range, col_to_letters, extract_dependencies, get_neighbor, is_valid_address,
    letters_to_col, parse_address, parse_range, shift_formula_references, transform_formula,
};
use std::collections::{HashMap, HashSet};

const MAX_LISTED_CELLS: usize = 1_000_000;

const COL_USAGE: &str = "col <INDEX|LETTERS>";
const PARSE_USAGE: &str = "parse <ADDR>";
const RANGE_USAGE: &str = "range <START:END> | range <START> <END>";
const ADJUST_USAGE: &str = "adjust <ADDR|FORMULA> --insert-row|--insert-col|--delete-row|--delete-col <N> [--abs-row] [--abs-col]";
const TRANSFORM_USAGE: &str = "transform <FORMULA> <FROM> <TO>";
const VALID_USAGE: &str = "valid <ADDR> [--rows N] [--cols N]";
const NEIGHBOR_USAGE: &str = "neighbor <ADDR> <up|down|left|right> [--rows N] [--cols N]";
const DEPS_USAGE: &str = "deps <FORMULA>";
const APPLY_USAGE: &str = "apply <FILE|-> [--rows N] [--cols N] [--insert-row|--insert-col|--delete-row|--delete-col <N>]";

const SHIFT_FLAGS: [&str; 4] = ["--insert-row", "--insert-col", "--delete-row", "--delete-col"];
const DIMENSION_FLAGS: [&str; 2] = ["--rows", "--cols"];

pub fn run(command: &str, args: &[String], config: &Config) -> Result<Vec<String>> {
    match command {
        "col" => col(args),
        "parse" => parse(args),
        "range" => range(args),
        "adjust" => adjust(args),
        "transform" => transform(args),
        "valid" => valid(args, config),
        "neighbor" => neighbor(args, config),
        "deps" => deps(args),
        "apply" => apply(args, config),
        other => Err(UsageError::UnknownCommand(other.to_string()).into()),
    }
}

#[derive(Debug, Default)]
struct CommandArgs {
    positional: Vec<String>,
    values: HashMap<&'static str, String>,
    switches: HashSet<&'static str>,
}

impl CommandArgs {
    fn parse(
        args: &[String],
        value_flags: &[&'static str],
        switch_flags: &[&'static str],
    ) -> Result<CommandArgs, UsageError> {
        let mut parsed = CommandArgs::default();
        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_str();
            if let Some(flag) = value_flags.iter().find(|flag| **flag == arg) {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| UsageError::MissingValue(arg.to_string()))?;
                parsed.values.insert(*flag, value.clone());
            } else if let Some(flag) = switch_flags.iter().find(|flag| **flag == arg) {
                parsed.switches.insert(*flag);
            } else if arg.starts_with('-') && arg.len() > 1 {
                return Err(UsageError::UnknownOption(arg.to_string()));
            } else {
                parsed.positional.push(arg.to_string());
            }
            i += 1;
        }
        Ok(parsed)
    }

    fn positionals<const N: usize>(&self, usage: &'static str) -> Result<[&str; N], UsageError> {
        let refs: Vec<&str> = self.positional.iter().map(String::as_str).collect();
        refs.try_into()
            .map_err(|_| UsageError::WrongArguments(usage))
    }

    fn number(&self, flag: &'static str) -> Result<Option<usize>, UsageError> {
        self.values
            .get(flag)
            .map(|value| {
                value.parse::<usize>().map_err(|_| UsageError::InvalidNumber {
                    flag: flag.to_string(),
                    value: value.clone(),
                })
            })
            .transpose()
    }

    fn dimension(&self, config: &Config) -> Result<SheetDimension, UsageError> {
        Ok(SheetDimension::new(
            self.number("--rows")?.unwrap_or(config.rows),
            self.number("--cols")?.unwrap_or(config.cols),
        ))
    }

    /// The structural edit named by the shift flags, if any.
    fn shift_operation(&self) -> Result<Option<ShiftOperation>> {
        let inserted_at = LineEdit {
            row: self.number("--insert-row")?,
            col: self.number("--insert-col")?,
        };
        let deleted_at = LineEdit {
            row: self.number("--delete-row")?,
            col: self.number("--delete-col")?,
        };
        if inserted_at == LineEdit::default() && deleted_at == LineEdit::default() {
            return Ok(None);
        }
        Ok(Some(ShiftOperation::from_edits(inserted_at, deleted_at)?))
    }
}

fn col(raw: &[String]) -> Result<Vec<String>> {
    let args = CommandArgs::parse(raw, &[], &[])?;
    let [value] = args.positionals(COL_USAGE)?;
    let line = if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        let index = value.parse::<usize>().map_err(|_| UsageError::InvalidNumber {
            flag: "col".to_string(),
            value: value.to_string(),
        })?;
        col_to_letters(index)
    } else {
        letters_to_col(value)?.to_string()
    };
    Ok(vec![line])
}

fn parse(raw: &[String]) -> Result<Vec<String>> {
    let args = CommandArgs::parse(raw, &[], &[])?;
    let [addr] = args.positionals(PARSE_USAGE)?;
    let cell = parse_address(addr)?;
    Ok(vec![serde_json::to_string(&cell)?])
}

fn range(raw: &[String]) -> Result<Vec<String>> {
    let args = CommandArgs::parse(raw, &[], &[])?;
    let (range, endpoints) = match args.positional.as_slice() {
        [range] => (parse_range(range)?, None),
        [start, end] => (
            CellRange::new(parse_address(start)?, parse_address(end)?),
            Some((start.as_str(), end.as_str())),
        ),
        _ => return Err(UsageError::WrongArguments(RANGE_USAGE).into()),
    };

    match range.cell_count() {
        Some(count) if count <= MAX_LISTED_CELLS => {}
        _ => {
            return Err(anyhow!(
                "Range {} has more than {} cells",
                range,
                MAX_LISTED_CELLS
            ));
        }
    }

    match endpoints {
        Some((start, end)) => Ok(cells_in_range(start, end)?),
        None => Ok(range.cells().map(|cell| cell.to_string()).collect()),
    }
}

fn adjust(raw: &[String]) -> Result<Vec<String>> {
    let args = CommandArgs::parse(raw, &SHIFT_FLAGS, &["--abs-row", "--abs-col"])?;
    let [target] = args.positionals(ADJUST_USAGE)?;
    let op = args
        .shift_operation()?
        .ok_or(UsageError::WrongArguments(ADJUST_USAGE))?;
    log::debug!("Adjusting {} for {}", target, op);

    if target.starts_with('=') {
        return Ok(vec![shift_formula_references(target, op)]);
    }
    let absolute = Absolute {
        col: args.switches.contains("--abs-col"),
        row: args.switches.contains("--abs-row"),
    };
    Ok(vec![adjust_reference(target, op, absolute)?.to_string()])
}

fn transform(raw: &[String]) -> Result<Vec<String>> {
    let args = CommandArgs::parse(raw, &[], &[])?;
    let [formula, from, to] = args.positionals(TRANSFORM_USAGE)?;
    Ok(vec![transform_formula(formula, from, to)?])
}

fn valid(raw: &[String], config: &Config) -> Result<Vec<String>> {
    let args = CommandArgs::parse(raw, &DIMENSION_FLAGS, &[])?;
    let [addr] = args.positionals(VALID_USAGE)?;
    let dims = args.dimension(config)?;
    Ok(vec![is_valid_address(addr, dims.rows, dims.cols).to_string()])
}

fn neighbor(raw: &[String], config: &Config) -> Result<Vec<String>> {
    let args = CommandArgs::parse(raw, &DIMENSION_FLAGS, &[])?;
    let [addr, direction] = args.positionals(NEIGHBOR_USAGE)?;
    let direction = direction.parse::<Direction>().map_err(|err| anyhow!(err))?;
    let dims = args.dimension(config)?;
    Ok(get_neighbor(addr, direction, dims.rows, dims.cols)?
        .into_iter()
        .collect())
}

fn deps(raw: &[String]) -> Result<Vec<String>> {
    let args = CommandArgs::parse(raw, &[], &[])?;
    let [formula] = args.positionals(DEPS_USAGE)?;
    Ok(extract_dependencies(formula)
        .into_iter()
        .map(|cell| cell.to_string())
        .collect())
}

fn apply(raw: &[String], config: &Config) -> Result<Vec<String>> {
    let value_flags: Vec<&'static str> = DIMENSION_FLAGS.into_iter().chain(SHIFT_FLAGS).collect();
    let args = CommandArgs::parse(raw, &value_flags, &[])?;
    let [source] = args.positionals(APPLY_USAGE)?;

    let json = if source == "-" {
        std::io::read_to_string(std::io::stdin()).context("Failed to read edit batch from stdin")?
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read {}", source))?
    };
    let batch = parse_edit_batch(&json)?;
    let dims = args.dimension(config)?;

    let mut sheet = Sheet::new("cli", "Sheet1", dims.rows, dims.cols)?.apply_edits(&batch.edits)?;
    if let Some(op) = args.shift_operation()? {
        sheet = sheet.apply_shift(op)?;
    }
    Ok(render_sheet(&sheet))
}

/// Header line, then one `ADDR<TAB>TEXT` line per cell in row-major order.
fn render_sheet(sheet: &Sheet) -> Vec<String> {
    let mut cells: Vec<_> = sheet
        .cells
        .iter()
        .filter_map(|(key, cell)| {
            parse_address(key)
                .ok()
                .map(|pos| (pos, cell.committed_text()))
        })
        .collect();
    cells.sort_by_key(|(pos, _)| (pos.row, pos.col));

    let mut lines = vec![format!(
        "# {} {} version {}",
        sheet.name,
        sheet.dimension(),
        sheet.version
    )];
    lines.extend(
        cells
            .into_iter()
            .map(|(pos, text)| format!("{}\t{}", pos, text)),
    );
    lines
}
