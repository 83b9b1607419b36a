//! Hierarchical suite runner.
//!
//! Executes a suite file (`suite.json`) through the engine and prints a tree
//! report. Exit codes are listed in [`suite_runner::exit_codes`].

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use suite_runner::exit_codes;
use suite_runner::io::init::{CONFIG_FILE, InitOptions, init_runner};
use suite_runner::io::suite_store::load_suite;
use suite_runner::logging;
use suite_runner::run::{RunOptions, run_suite};

#[derive(Parser)]
#[command(
    name = "runner",
    version,
    about = "Hierarchical suite runner with a six-phase node lifecycle"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `suite.json` and `runner.toml` in the current directory.
    Init {
        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },
    /// Check a suite file against the schema and invariants (unique ids, etc.).
    Validate {
        /// Suite file to check.
        suite: PathBuf,
    },
    /// Execute a suite and print the report.
    Run {
        /// Suite file to execute.
        suite: PathBuf,
        /// Config file; defaults apply if it does not exist.
        #[arg(short, long, default_value = CONFIG_FILE)]
        config: PathBuf,
        /// Write the JSONL event stream to this path.
        #[arg(long)]
        events: Option<PathBuf>,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force } => cmd_init(force),
        Command::Validate { suite } => cmd_validate(suite),
        Command::Run {
            suite,
            config,
            events,
        } => cmd_run(suite, config, events),
    }
}

fn cmd_init(force: bool) -> Result<i32> {
    let cwd = std::env::current_dir().context("read current directory")?;
    let paths = init_runner(&cwd, &InitOptions { force })?;
    println!("wrote {}", paths.suite_path.display());
    println!("wrote {}", paths.config_path.display());
    Ok(exit_codes::OK)
}

fn cmd_validate(suite: PathBuf) -> Result<i32> {
    let tree = load_suite(&suite)?;
    println!("{}: {} nodes ok", suite.display(), tree.count());
    Ok(exit_codes::OK)
}

fn cmd_run(suite: PathBuf, config: PathBuf, events: Option<PathBuf>) -> Result<i32> {
    let report = run_suite(&RunOptions {
        suite_path: suite,
        config_path: config,
        events_path: events,
    })?;
    print!("{}", report.rendered);
    if report.summary.all_passed() {
        Ok(exit_codes::OK)
    } else {
        Ok(exit_codes::FAILED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["runner", "init", "--force"]);
        assert!(matches!(cli.command, Command::Init { force: true }));
    }

    #[test]
    fn parse_run_defaults_config_path() {
        let cli = Cli::parse_from(["runner", "run", "suite.json"]);
        match cli.command {
            Command::Run {
                suite,
                config,
                events,
            } => {
                assert_eq!(suite, PathBuf::from("suite.json"));
                assert_eq!(config, PathBuf::from(CONFIG_FILE));
                assert_eq!(events, None);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn parse_run_with_events() {
        let cli = Cli::parse_from(["runner", "run", "s.json", "--events", "out.jsonl"]);
        assert!(matches!(
            cli.command,
            Command::Run { events: Some(_), .. }
        ));
    }
}
