//! Optional `config.toml` for the CLI.
//!
//! ```toml
//! log_level = "info"
//!
//! [sheet]
//! rows = 20
//! cols = 10
//! ```

use directories::ProjectDirs;
use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

pub const DEFAULT_ROWS: usize = 20;
pub const DEFAULT_COLS: usize = 10;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    log_level: Option<String>,
    sheet: Option<SheetSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SheetSection {
    rows: Option<usize>,
    cols: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Sheet dimension used when a command is not given `--rows`/`--cols`.
    pub rows: usize,
    pub cols: usize,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            log_level: LevelFilter::Warn,
        }
    }
}

/// Load the config file, falling back to defaults.
///
/// An explicit `config_file` that does not exist is reported; a missing
/// default file is not. Every problem becomes a warning rather than an error.
pub fn load_config(config_file: Option<&PathBuf>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = config_file.cloned().or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    match read_limited(&path) {
        Ok(content) => {
            let config = parse_config(&content, &mut warnings).unwrap_or_else(|err| {
                warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                Config::default()
            });
            (config, warnings)
        }
        Err(warning) => {
            warnings.push(warning);
            (Config::default(), warnings)
        }
    }
}

fn read_limited(path: &Path) -> Result<String, String> {
    let meta = std::fs::metadata(path).map_err(|err| {
        format!("Failed to read metadata for {}: {}", path.display(), err)
    })?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(format!(
            "Refusing to read {}: file too large ({} bytes, max {})",
            path.display(),
            meta.len(),
            MAX_CONFIG_FILE_BYTES
        ));
    }
    std::fs::read_to_string(path).map_err(|err| format!("Failed to read {}: {}", path.display(), err))
}

/// Parse config text. Bad values inside an otherwise valid file are warnings.
pub fn parse_config(content: &str, warnings: &mut Vec<String>) -> Result<Config, toml::de::Error> {
    let file: ConfigFile = toml::from_str(content)?;
    let mut config = Config::default();

    if let Some(level) = file.log_level {
        match level.parse::<LevelFilter>() {
            Ok(parsed) => config.log_level = parsed,
            Err(_) => warnings.push(format!("Unknown log_level '{}'; using 'warn'", level)),
        }
    }

    if let Some(sheet) = file.sheet {
        for (key, value, slot) in [
            ("rows", sheet.rows, &mut config.rows),
            ("cols", sheet.cols, &mut config.cols),
        ] {
            match value {
                Some(0) => warnings.push(format!("sheet.{} must be at least 1; ignoring", key)),
                Some(n) => *slot = n,
                None => {}
            }
        }
    }

    Ok(config)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "gridref")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
