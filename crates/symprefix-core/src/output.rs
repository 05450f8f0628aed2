//! Response types for CLI output.
//!
//! A finished rename run is described by a [`RunResponse`], a finished
//! extraction by an [`ExtractResponse`], and a failed one by an
//! [`ErrorResponse`]. Both serialize to JSON with a `status` and
//! `schema_version` field so scripts can tell them apart.

use std::io::{self, Write};
use std::path::Path;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::error::{OutputErrorCode, PrefixError};
use crate::walk::WalkStats;

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Run Response
// ============================================================================

/// Summary of a completed rename run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Prefix applied to every symbol.
    pub prefix: String,
    /// Number of symbols loaded from the symbols file.
    pub symbols: usize,
    /// Whether the run wrote nothing.
    pub dry_run: bool,
    /// Source files passed through the renamer.
    pub files_rewritten: usize,
    /// Rewritten files with at least one replacement.
    pub files_changed: usize,
    /// Files copied verbatim.
    pub files_copied: usize,
    /// Total replacements.
    pub replacements: usize,
    /// Completion time (ISO 8601, UTC).
    pub finished_at: String,
}

impl RunResponse {
    /// Create a run response from walk statistics.
    pub fn new(prefix: impl Into<String>, symbols: usize, dry_run: bool, stats: WalkStats) -> Self {
        RunResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            prefix: prefix.into(),
            symbols,
            dry_run,
            files_rewritten: stats.files_rewritten,
            files_changed: stats.files_changed,
            files_copied: stats.files_copied,
            replacements: stats.replacements,
            finished_at: format_timestamp(SystemTime::now()),
        }
    }

    /// One-line human-readable summary.
    pub fn summary_line(&self) -> String {
        let verb = if self.dry_run { "would rename" } else { "renamed" };
        format!(
            "{} {} occurrence(s) of {} symbol(s) in {} of {} source file(s), copied {} other file(s)",
            verb,
            self.replacements,
            self.symbols,
            self.files_changed,
            self.files_rewritten,
            self.files_copied
        )
    }
}

// ============================================================================
// Extract Response
// ============================================================================

/// Number of symbols echoed back as a sample.
pub const EXTRACT_SAMPLE_LEN: usize = 5;

/// Summary of a completed symbol extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Library the symbols were read from.
    pub library: String,
    /// Symbols file written.
    pub output: String,
    /// Number of symbols written.
    pub symbols: usize,
    /// The first few symbols, in output order.
    pub sample: Vec<String>,
}

impl ExtractResponse {
    pub fn new(library: &Path, output: &Path, symbols: &[String]) -> Self {
        ExtractResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            library: library.display().to_string(),
            output: output.display().to_string(),
            symbols: symbols.len(),
            sample: symbols.iter().take(EXTRACT_SAMPLE_LEN).cloned().collect(),
        }
    }

    pub fn summary_line(&self) -> String {
        format!("Saved {} symbols to {}", self.symbols, self.output)
    }

    /// Library, count and sample lines printed in verbose mode.
    pub fn detail_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Library: {}", self.library),
            format!("Symbols found: {}", self.symbols),
        ];
        if !self.sample.is_empty() {
            lines.push("Sample symbols:".to_string());
            lines.extend(self.sample.iter().map(|s| format!("  {s}")));
            if self.symbols > self.sample.len() {
                lines.push("  ...".to_string());
            }
        }
        lines
    }
}

// ============================================================================
// Error Response
// ============================================================================

/// Error details carried by an [`ErrorResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code (also the exit code).
    pub code: u8,
    /// Human-readable message.
    pub message: String,
}

impl ErrorInfo {
    /// Create from a PrefixError.
    pub fn from_error(err: &PrefixError) -> Self {
        ErrorInfo {
            code: OutputErrorCode::from(err).code(),
            message: err.to_string(),
        }
    }
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Error information.
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response from a PrefixError.
    pub fn from_error(err: &PrefixError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Emitters
// ============================================================================

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

/// Format a timestamp for JSON output (ISO 8601).
fn format_timestamp(time: SystemTime) -> String {
    use chrono::{DateTime, Utc};

    let datetime: DateTime<Utc> = time.into();
    datetime.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

// ============================================================================
// Tests
// ============================================================================
