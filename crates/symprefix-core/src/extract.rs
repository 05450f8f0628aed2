//! Symbol extraction from static libraries.
//!
//! Produces the symbols file consumed by [`crate::symbols`]: runs the host's
//! symbol lister over a library, keeps the externally visible text, weak,
//! data and bss symbols, and writes them one per line.
//!
//! | Tool      | Command                     | Line pattern                     |
//! |-----------|-----------------------------|----------------------------------|
//! | `nm`      | `nm -g <library>`           | `[0-9a-fA-F]+ [TWDB] (\w+)`      |
//! | `dumpbin` | `dumpbin /SYMBOLS <library>`| `External\s+\|\s+(\w+)`          |
//!
//! On Mach-O hosts `nm` reports C symbols with their leading underscore,
//! which is exactly the export marker the symbols loader expects.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{PrefixError, PrefixResult};

static NM_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9a-fA-F]+ [TWDB] (\w+)").expect("valid nm pattern"));
static DUMPBIN_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"External\s+\|\s+(\w+)").expect("valid dumpbin pattern"));

/// Name prefixes produced by C++ name mangling (Itanium, Apple, MSVC).
const CPP_MANGLING_PREFIXES: &[&str] = &["_Z", "__Z", "??"];

// ============================================================================
// Tools
// ============================================================================

/// External program used to list a library's symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolTool {
    /// GNU/LLVM `nm`.
    Nm,
    /// MSVC `dumpbin`.
    Dumpbin,
}

impl SymbolTool {
    /// The tool native to the current platform.
    pub fn for_host() -> Self {
        if cfg!(windows) {
            SymbolTool::Dumpbin
        } else {
            SymbolTool::Nm
        }
    }

    pub fn program(&self) -> &'static str {
        match self {
            SymbolTool::Nm => "nm",
            SymbolTool::Dumpbin => "dumpbin",
        }
    }

    fn args(&self, library: &Path) -> Vec<OsString> {
        let flag = match self {
            SymbolTool::Nm => "-g",
            SymbolTool::Dumpbin => "/SYMBOLS",
        };
        vec![OsString::from(flag), library.as_os_str().to_os_string()]
    }

    fn line_pattern(&self) -> &'static Regex {
        match self {
            SymbolTool::Nm => &*NM_LINE,
            SymbolTool::Dumpbin => &*DUMPBIN_LINE,
        }
    }
}

impl fmt::Display for SymbolTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

// ============================================================================
// Filtering
// ============================================================================

/// Which symbols survive extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolFilter {
    /// Drop C++ mangled names.
    pub ignore_cpp: bool,
}

impl SymbolFilter {
    pub fn accepts(&self, symbol: &str) -> bool {
        !(self.ignore_cpp && is_cpp_symbol(symbol))
    }
}

/// Check whether `symbol` looks like a mangled C++ name.
pub fn is_cpp_symbol(symbol: &str) -> bool {
    CPP_MANGLING_PREFIXES
        .iter()
        .any(|prefix| symbol.starts_with(prefix))
}

// ============================================================================
// Extraction
// ============================================================================

/// Parse the output of `tool` into a sorted, deduplicated symbol list.
pub fn parse_listing(tool: SymbolTool, listing: &str, filter: SymbolFilter) -> Vec<String> {
    let pattern = tool.line_pattern();
    let symbols: BTreeSet<String> = listing
        .lines()
        .filter_map(|line| pattern.captures(line))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|symbol| filter.accepts(symbol))
        .map(str::to_string)
        .collect();
    symbols.into_iter().collect()
}

/// Run `tool` over `library` and return its standard output.
///
/// A non-zero exit is logged and the output is still returned; failing to
/// launch the program is an error.
pub fn run_tool(tool: SymbolTool, library: &Path) -> PrefixResult<String> {
    debug!("Running {} on {}", tool, library.display());
    let output = Command::new(tool.program())
        .args(tool.args(library))
        .output()
        .map_err(|e| PrefixError::tool_failed(tool.program(), e.to_string()))?;

    if !output.status.success() {
        warn!(
            "{} exited with {}: {}",
            tool,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Extract the symbols of `library` using `tool`.
pub fn extract_symbols(
    tool: SymbolTool,
    library: &Path,
    filter: SymbolFilter,
) -> PrefixResult<Vec<String>> {
    let listing = run_tool(tool, library)?;
    Ok(parse_listing(tool, &listing, filter))
}

/// Write `symbols` to `path`, one per line.
pub fn save_symbols(symbols: &[String], path: &Path) -> PrefixResult<()> {
    let content: String = symbols.iter().map(|s| format!("{s}\n")).collect();
    fs::write(path, content).map_err(|e| PrefixError::io(path, e))
}

// ============================================================================
// Tests
// ============================================================================
