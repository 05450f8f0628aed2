//! Symbol set loading and rename map construction.
//!
//! A symbols file lists one entry per line. Only entries carrying the export
//! decoration (a leading underscore) are consulted; the decoration is
//! stripped to recover the name as it appears in source text:
//!
//! ```text
//! _add          -> add
//! _lib_init     -> lib_init
//! helper        (ignored, no decoration)
//! ```
//!
//! From the resulting [`SymbolSet`] and a prefix, [`RenameMap::build`]
//! derives the replacement for every symbol together with the ordering in
//! which the substitution engine visits them (longest name first).

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Decoration marking an exported symbol in the symbols file.
pub const EXPORT_MARKER: char = '_';

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while loading a symbols file.
#[derive(Debug, Error)]
pub enum SymbolsError {
    /// The symbols file does not exist.
    #[error("symbols file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The symbols file is not valid UTF-8 text.
    #[error("symbols file is not valid text: {}", path.display())]
    Decode { path: PathBuf },

    /// Any other failure reading the file.
    #[error("cannot read symbols file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ============================================================================
// Symbol Set
// ============================================================================

/// Deduplicated set of bare symbol names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolSet {
    symbols: BTreeSet<String>,
}

impl SymbolSet {
    /// Build a symbol set from the raw lines of a symbols file.
    ///
    /// Lines are trimmed; blank lines and lines without the export marker
    /// are discarded. No identifier validation happens here: a malformed
    /// entry is kept and simply never matches anything in source text.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let symbols = lines
            .into_iter()
            .filter_map(|line| {
                line.as_ref()
                    .trim()
                    .strip_prefix(EXPORT_MARKER)
                    .map(str::to_string)
            })
            .collect();
        SymbolSet { symbols }
    }

    /// Parse the full text of a symbols file.
    pub fn parse(content: &str) -> Self {
        SymbolSet::from_lines(content.lines())
    }

    /// Load a symbols file from disk.
    pub fn load(path: &Path) -> Result<Self, SymbolsError> {
        let bytes = fs::read(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => SymbolsError::NotFound {
                path: path.to_path_buf(),
            },
            _ => SymbolsError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let content = String::from_utf8(bytes).map_err(|_| SymbolsError::Decode {
            path: path.to_path_buf(),
        })?;
        Ok(SymbolSet::parse(&content))
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate symbols in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }
}

// ============================================================================
// Rename Map
// ============================================================================

/// Immutable mapping from bare symbol to its prefixed replacement.
///
/// Fully determined by the symbol set and the prefix. Also carries the
/// ordering sequence: symbols sorted by descending length in characters,
/// ties broken lexically, so that a symbol is always visited before any
/// shorter symbol it contains.
#[derive(Debug, Clone)]
pub struct RenameMap {
    prefix: String,
    replacements: BTreeMap<String, String>,
    ordering: Vec<String>,
}

impl RenameMap {
    /// Build the rename map for `symbols` with the given `prefix`.
    pub fn build(symbols: &SymbolSet, prefix: &str) -> Self {
        let replacements: BTreeMap<String, String> = symbols
            .iter()
            .map(|symbol| (symbol.to_string(), format!("{prefix}{symbol}")))
            .collect();

        let mut ordering: Vec<String> = replacements.keys().cloned().collect();
        ordering.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });

        RenameMap {
            prefix: prefix.to_string(),
            replacements,
            ordering,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Replacement name for `symbol`, if it is mapped.
    pub fn replacement(&self, symbol: &str) -> Option<&str> {
        self.replacements.get(symbol).map(String::as_str)
    }

    /// Symbols in processing order (longest first).
    pub fn ordering(&self) -> &[String] {
        &self.ordering
    }

    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
