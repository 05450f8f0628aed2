//! Binary entry point for the symprefix CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Prefix every exported symbol of libfoo in a copy of the source tree
//! symprefix symbols.txt foo_ ./src ./out
//!
//! # Preview the run, logging every replacement
//! symprefix -v --dry-run symbols.txt foo_ ./src ./out
//!
//! # Treat Objective-C files as sources too
//! symprefix --ext m --ext h symbols.txt foo_ ./src ./out
//! ```
//!
//! Exit codes: 0 on success, 2 for invalid arguments, 3 when the symbols
//! file cannot be loaded, 4 for file I/O failures, 10 for internal errors.
//! A destination that resolves to the source directory is an invalid
//! argument.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};

use symprefix::cli::{init_tracing, run_rename, OutputFormat, RenameRequest};
use symprefix_core::config::{CliOverrides, ResolvedConfig};
use symprefix_core::error::PrefixError;
use symprefix_core::output::{emit_response, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Prefix a library's exported symbols across a source tree.
///
/// Source files are rewritten into the destination tree with every
/// free-standing symbol occurrence renamed; all other files are copied
/// unchanged.
#[derive(Parser, Debug)]
#[command(
    name = "symprefix",
    version,
    about = "Prefix a library's exported symbols across a source tree"
)]
struct Cli {
    /// Symbols file; only lines starting with `_` are used.
    symbols_file: PathBuf,

    /// Prefix prepended to every symbol.
    #[arg(allow_hyphen_values = true)]
    prefix: String,

    /// Source tree to read.
    source_dir: PathBuf,

    /// Destination tree to write (created if missing).
    dest_dir: PathBuf,

    /// Log every replacement (debug level).
    #[arg(short, long)]
    verbose: bool,

    /// Extension treated as source code (repeatable; replaces the defaults).
    #[arg(long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Report what would change without writing anything.
    #[arg(long)]
    dry_run: bool,

    /// Output format for the run summary.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = ResolvedConfig::resolve(&CliOverrides {
        extensions: cli.extensions.clone(),
        verbose: cli.verbose,
        dry_run: cli.dry_run,
    });
    init_tracing(config.verbose.value);
    debug!(
        "Extensions {:?} (from {:?})",
        config.extensions.value.iter().collect::<Vec<_>>(),
        config.extensions.source
    );

    let format = cli.format;
    match execute(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            if format == OutputFormat::Json {
                let _ = emit_response(&ErrorResponse::from_error(&err), &mut io::stdout());
                let _ = io::stdout().flush();
            }
            ExitCode::from(err.error_code().code())
        }
    }
}

/// Run the rename and print its summary.
fn execute(cli: Cli, config: &ResolvedConfig) -> Result<(), PrefixError> {
    let request = RenameRequest {
        symbols_file: cli.symbols_file,
        prefix: cli.prefix,
        source_dir: cli.source_dir,
        dest_dir: cli.dest_dir,
        options: config.walk_options(),
    };
    let response = run_rename(&request)?;

    let mut stdout = io::stdout();
    let written = match cli.format {
        OutputFormat::Text => writeln!(stdout, "{}", response.summary_line()),
        OutputFormat::Json => emit_response(&response, &mut stdout),
    };
    written.map_err(|e| PrefixError::internal(e.to_string()))?;
    let _ = stdout.flush();
    Ok(())
}
