//! callmap CLI - index Java sources and print what was found.
//!
//! With a root directory, every `.java` file below it is indexed. Without
//! one, a built-in sample unit is indexed instead.

use std::path::PathBuf;
use std::process::ExitCode;

use callmap::OrphanPolicy;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// callmap: packages, classes, methods and call sites of a Java codebase.
#[derive(Parser)]
#[command(name = "callmap")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory to index recursively (defaults to a built-in sample unit)
    root: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Index units one at a time instead of on the thread pool
    #[arg(long)]
    sequential: bool,

    /// Per-unit parse budget in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Append methods of a repeated class to the first occurrence
    #[arg(long)]
    merge_duplicates: bool,

    /// Handling of methods declared outside any class (skip, warn, error)
    #[arg(long, value_name = "POLICY")]
    orphans: Option<OrphanPolicy>,

    /// What to print on stdout
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Both)]
    format: OutputFormat,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Output selection for the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report only
    Text,
    /// JSON export only
    Json,
    /// Report, then `=== JSON ===`, then the export
    Both,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let options = cli::index::Options {
        root: cli.root,
        config: cli.config,
        sequential: cli.sequential,
        timeout_ms: cli.timeout_ms,
        merge_duplicates: cli.merge_duplicates,
        orphans: cli.orphans,
        format: cli.format,
    };

    match cli::index::run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}
