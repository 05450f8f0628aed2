//! CLI front door.
//!
//! Runs the two operations behind the binaries:
//! - `symprefix` - rename symbols across a source tree ([`run_rename`])
//! - `symprefix-extract` - produce a symbols file from a library ([`run_extract`])
//!
//! Argument parsing stays in the binaries; these functions take fully
//! resolved requests and return the response to render. Logging setup and
//! the output format switch are shared here.

use std::io;
use std::path::PathBuf;

use clap::ValueEnum;
use tracing::info;

use symprefix_core::engine::Renamer;
use symprefix_core::error::PrefixResult;
use symprefix_core::extract::{extract_symbols, save_symbols, SymbolFilter, SymbolTool};
use symprefix_core::output::{ExtractResponse, RunResponse};
use symprefix_core::symbols::{RenameMap, SymbolSet};
use symprefix_core::walk::{process_tree, WalkOptions};

// ============================================================================
// Shared Plumbing
// ============================================================================

/// Output format for command results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text summary (default).
    #[default]
    Text,
    /// Full JSON response.
    Json,
}

/// Initialize the stderr tracing subscriber.
///
/// `RUST_LOG`, when set, overrides the level chosen by `verbose`.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

// ============================================================================
// Rename
// ============================================================================

/// A fully resolved rename run.
#[derive(Debug, Clone)]
pub struct RenameRequest {
    pub symbols_file: PathBuf,
    pub prefix: String,
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub options: WalkOptions,
}

/// Load the symbols file, build the rename map and mirror the source tree.
///
/// The symbols file is read before anything in the source tree is touched,
/// so a missing or undecodable file aborts the run with no output written.
pub fn run_rename(request: &RenameRequest) -> PrefixResult<RunResponse> {
    let symbols = SymbolSet::load(&request.symbols_file)?;
    info!(
        "Loaded {} symbols from {}",
        symbols.len(),
        request.symbols_file.display()
    );

    let map = RenameMap::build(&symbols, &request.prefix);
    let renamer = Renamer::new(&map);
    let stats = process_tree(
        &renamer,
        &request.source_dir,
        &request.dest_dir,
        &request.options,
    )?;

    let response = RunResponse::new(
        request.prefix.clone(),
        symbols.len(),
        request.options.dry_run,
        stats,
    );
    info!("{}", response.summary_line());
    Ok(response)
}

// ============================================================================
// Extract
// ============================================================================

/// A fully resolved extraction run.
#[derive(Debug, Clone)]
pub struct ExtractRequest {
    pub library: PathBuf,
    pub output: PathBuf,
    pub tool: SymbolTool,
    pub filter: SymbolFilter,
}

/// List the library's symbols with the requested tool and save them.
pub fn run_extract(request: &ExtractRequest) -> PrefixResult<ExtractResponse> {
    let symbols = extract_symbols(request.tool, &request.library, request.filter)?;
    save_symbols(&symbols, &request.output)?;
    Ok(ExtractResponse::new(
        &request.library,
        &request.output,
        &symbols,
    ))
}

// ============================================================================
// Tests
// ============================================================================
