//! Boundary-aware substitution engine.
//!
//! Rewrites one text buffer against a [`RenameMap`]. The buffer is threaded
//! through one pass per symbol, longest symbol first; each pass sees the
//! output of the previous one:
//!
//! ```text
//! buffer_0 = file contents
//! buffer_i = apply_symbol(buffer_{i-1}, symbol_i, prefix + symbol_i)
//! ```
//!
//! Within a pass, a candidate is a maximal run of word characters equal to
//! the symbol. Each candidate is then re-checked against the buffer the pass
//! is reading: the characters on both sides must not be word characters.
//! Only candidates passing both gates are replaced, so `foo` inside `myfoo`,
//! `foobar` or an earlier `pfx_foo` replacement is never touched.
//!
//! Keywords are never renamed, even when mapped.

use tracing::{debug, Level};

use crate::keywords::is_keyword;
use crate::symbols::RenameMap;
use crate::text::{is_isolated, word_runs, PositionTracker};

// ============================================================================
// Rewrite Result
// ============================================================================

/// A rewritten buffer and the number of replacements that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub replacements: usize,
}

impl Rewrite {
    fn unchanged(text: String) -> Self {
        Rewrite {
            text,
            replacements: 0,
        }
    }

    pub fn is_changed(&self) -> bool {
        self.replacements > 0
    }
}

// ============================================================================
// Renamer
// ============================================================================

/// Substitution passes prepared once per run and reused for every file.
#[derive(Debug, Clone)]
pub struct Renamer<'a> {
    passes: Vec<(&'a str, &'a str)>,
}

impl<'a> Renamer<'a> {
    /// Prepare the passes for `map`, dropping reserved keywords.
    pub fn new(map: &'a RenameMap) -> Self {
        let passes = map
            .ordering()
            .iter()
            .filter_map(|symbol| {
                if is_keyword(symbol) {
                    debug!("Skipping reserved keyword '{}'", symbol);
                    return None;
                }
                map.replacement(symbol)
                    .map(|replacement| (symbol.as_str(), replacement))
            })
            .collect();
        Renamer { passes }
    }

    /// Number of symbols eligible for renaming.
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Rewrite `text`, folding every pass over the buffer in order.
    pub fn rewrite(&self, text: &str) -> Rewrite {
        self.passes.iter().fold(
            Rewrite::unchanged(text.to_string()),
            |acc, &(symbol, replacement)| {
                let pass = apply_symbol(acc.text, symbol, replacement);
                Rewrite {
                    text: pass.text,
                    replacements: acc.replacements + pass.replacements,
                }
            },
        )
    }
}

/// Rewrite `text` against `map` in one call.
pub fn rename_text(text: &str, map: &RenameMap) -> Rewrite {
    Renamer::new(map).rewrite(text)
}

// ============================================================================
// Single Pass
// ============================================================================

/// Byte spans of every maximal word run in `buffer` equal to `symbol`.
pub fn find_token_matches(buffer: &str, symbol: &str) -> Vec<(usize, usize)> {
    if symbol.is_empty() || !buffer.contains(symbol) {
        return Vec::new();
    }
    word_runs(buffer)
        .filter(|&(start, end)| &buffer[start..end] == symbol)
        .collect()
}

/// Check that the occurrence at `buffer[start..end]` is not adjacent to a
/// word character in the buffer being rewritten.
pub fn is_valid_context(buffer: &str, start: usize, end: usize) -> bool {
    is_isolated(buffer, start, end)
}

/// Replace every isolated occurrence of `symbol` in `buffer`.
///
/// Returns the buffer untouched (no reallocation) when nothing matches.
pub fn apply_symbol(buffer: String, symbol: &str, replacement: &str) -> Rewrite {
    let matches = find_token_matches(&buffer, symbol);
    if matches.is_empty() {
        return Rewrite::unchanged(buffer);
    }

    let mut positions = tracing::enabled!(Level::DEBUG).then(PositionTracker::new);
    let mut out = String::with_capacity(
        buffer.len() + matches.len() * replacement.len().saturating_sub(symbol.len()),
    );
    let mut last = 0;
    let mut replacements = 0;

    for (start, end) in matches {
        if !is_valid_context(&buffer, start, end) {
            continue;
        }
        if let Some(tracker) = positions.as_mut() {
            let (line, col) = tracker.position_of(&buffer, start);
            debug!(
                "Replacing '{}' with '{}' at {}:{}",
                symbol, replacement, line, col
            );
        }
        out.push_str(&buffer[last..start]);
        out.push_str(replacement);
        last = end;
        replacements += 1;
    }

    if replacements == 0 {
        return Rewrite::unchanged(buffer);
    }
    out.push_str(&buffer[last..]);
    Rewrite {
        text: out,
        replacements,
    }
}

// ============================================================================
// Tests
// ============================================================================
