//! Gridref - A1 address and formula-reference tool

mod commands;
mod config;
mod error;
mod logger;

use error::UsageError;
use std::env;
use std::path::PathBuf;

fn print_usage() {
    eprintln!("Usage: gridref [OPTIONS] <COMMAND> [ARGS]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  col <INDEX|LETTERS>              Convert a 0-based column index to letters or back");
    eprintln!("  parse <ADDR>                     Parse an address and print it as JSON");
    eprintln!("  range <START:END>                List the cells of a range in row-major order");
    eprintln!("  adjust <ADDR|FORMULA> <EDIT>     Adjust references for one row/column edit");
    eprintln!("      --insert-row|--insert-col|--delete-row|--delete-col <N>   (0-based)");
    eprintln!("      --abs-row, --abs-col         Pin an axis of a plain address");
    eprintln!("  transform <FORMULA> <FROM> <TO>  Rewrite a formula copied between cells");
    eprintln!("  valid <ADDR>                     Check an address against the sheet size");
    eprintln!("  neighbor <ADDR> <DIRECTION>      Arrow-key neighbour (up, down, left, right)");
    eprintln!("  deps <FORMULA>                   List the cells a formula reads");
    eprintln!("  apply <FILE|->                   Apply a JSON edit batch to a blank sheet");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --rows <N>, --cols <N>           Sheet size for valid, neighbor and apply");
    eprintln!("  --config <FILE>                  Load settings from a TOML file");
    eprintln!("  --no-config                      Ignore the user config file");
    eprintln!("  -v, --verbose                    More logging on stderr (repeat for trace)");
    eprintln!("  -h, --help                       Print help");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut config_file: Option<PathBuf> = None;
    let mut no_config = false;
    let mut verbose = 0usize;
    let mut command: Option<String> = None;
    let mut command_args: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-v" | "--verbose" => verbose += 1,
            "-vv" => verbose += 2,
            "--no-config" => no_config = true,
            "--config" => {
                i += 1;
                if i >= args.len() {
                    fail_usage(UsageError::MissingValue("--config".to_string()));
                }
                config_file = Some(PathBuf::from(&args[i]));
            }
            _ if command.is_none() => {
                if args[i].starts_with('-') {
                    fail_usage(UsageError::UnknownOption(args[i].clone()));
                }
                command = Some(args[i].clone());
            }
            _ => command_args.push(args[i].clone()),
        }
        i += 1;
    }

    let (config, warnings) = if no_config {
        (config::Config::default(), Vec::new())
    } else {
        config::load_config(config_file.as_ref())
    };
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
    logger::init(logger::verbosity(config.log_level, verbose));

    let Some(command) = command else {
        fail_usage(UsageError::NoCommand);
    };

    match commands::run(&command, &command_args, &config) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Err(e) => {
            if let Some(usage) = e.downcast_ref::<UsageError>() {
                fail_usage(usage.clone());
            }
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn fail_usage(err: UsageError) -> ! {
    eprintln!("Error: {}", err);
    print_usage();
    std::process::exit(1);
}
