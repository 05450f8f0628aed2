//! Text utilities: word-character classification, boundary checks and
//! byte offset to line:column conversion.
//!
//! ## Conventions
//!
//! - A *word character* is a Unicode alphanumeric or `_`.
//! - Offsets are **0-indexed byte offsets** into a `&str` and always fall on
//!   char boundaries.
//! - Lines and columns are **1-indexed**; columns count chars, not bytes.

// ============================================================================
// Character Classes
// ============================================================================

/// Check whether `c` can be part of an identifier.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// The char immediately before byte offset `start`, if any.
pub fn char_before(text: &str, start: usize) -> Option<char> {
    text[..start].chars().next_back()
}

/// The char starting at byte offset `end`, if any.
pub fn char_at(text: &str, end: usize) -> Option<char> {
    text[end..].chars().next()
}

/// Check that `text[start..end]` is not glued to a word character on
/// either side. String boundaries count as non-word.
pub fn is_isolated(text: &str, start: usize, end: usize) -> bool {
    !char_before(text, start).is_some_and(is_word_char)
        && !char_at(text, end).is_some_and(is_word_char)
}

// ============================================================================
// Word Runs
// ============================================================================

/// Iterator over maximal runs of word characters, yielding byte spans.
///
/// Every yielded `(start, end)` is preceded and followed by a non-word
/// character or a string boundary.
pub struct WordRuns<'a> {
    text: &'a str,
    pos: usize,
}

/// Iterate the maximal word runs of `text`.
pub fn word_runs(text: &str) -> WordRuns<'_> {
    WordRuns { text, pos: 0 }
}

impl Iterator for WordRuns<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.text[self.pos..];
        let offset = rest.find(is_word_char)?;
        let start = self.pos + offset;
        let len = self.text[start..]
            .find(|c: char| !is_word_char(c))
            .unwrap_or(self.text.len() - start);
        let end = start + len;
        self.pos = end;
        Some((start, end))
    }
}

// ============================================================================
// Position Conversion
// ============================================================================

/// Convert a byte offset to 1-indexed line and column (Unicode-aware).
///
/// Columns count chars. An offset past the end yields the position just
/// after the last char.
pub fn byte_offset_to_position(content: &str, offset: usize) -> (u32, u32) {
    content
        .char_indices()
        .take_while(|&(i, _)| i < offset)
        .fold((1, 1), |position, (_, ch)| step(position, ch))
}

fn step((line, col): (u32, u32), ch: char) -> (u32, u32) {
    if ch == '\n' {
        (line + 1, 1)
    } else {
        (line, col + 1)
    }
}

/// Resolves increasing byte offsets to positions in one forward scan.
///
/// Each query only walks the text between the previous offset and the new
/// one. An offset before the previous one restarts from the beginning.
#[derive(Debug, Clone)]
pub struct PositionTracker {
    offset: usize,
    position: (u32, u32),
}

impl Default for PositionTracker {
    fn default() -> Self {
        PositionTracker {
            offset: 0,
            position: (1, 1),
        }
    }
}

impl PositionTracker {
    pub fn new() -> Self {
        PositionTracker::default()
    }

    /// Position of `offset` in `content`, which must be the same text on
    /// every call.
    pub fn position_of(&mut self, content: &str, offset: usize) -> (u32, u32) {
        if offset < self.offset {
            *self = PositionTracker::default();
        }
        let end = offset.min(content.len());
        if end > self.offset {
            self.position = content[self.offset..end]
                .chars()
                .fold(self.position, step);
            self.offset = end;
        }
        self.position
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod classes {
        use super::*;

        #[test]
        fn word_chars() {
            assert!(is_word_char('a'));
            assert!(is_word_char('Z'));
            assert!(is_word_char('7'));
            assert!(is_word_char('_'));
            assert!(is_word_char('\u{e9}'));
            assert!(!is_word_char('('));
            assert!(!is_word_char(' '));
            assert!(!is_word_char('$'));
        }

        #[test]
        fn isolation_at_string_edges() {
            assert!(is_isolated("foo", 0, 3));
            assert!(is_isolated("(foo)", 1, 4));
            assert!(!is_isolated("myfoo", 2, 5));
            assert!(!is_isolated("foobar", 0, 3));
            assert!(!is_isolated("_foo", 1, 4));
        }

        #[test]
        fn isolation_with_multibyte_neighbours() {
            let text = "\u{e9}foo";
            assert!(!is_isolated(text, 2, 5));
            let text = "\u{2014}foo\u{2014}";
            assert!(is_isolated(text, 3, 6));
        }
    }

    mod runs {
        use super::*;

        #[test]
        fn splits_on_punctuation() {
            let text = "int add(int a,int b)";
            let words: Vec<&str> = word_runs(text).map(|(s, e)| &text[s..e]).collect();
            assert_eq!(words, vec!["int", "add", "int", "a", "int", "b"]);
        }

        #[test]
        fn runs_include_digits_and_underscores() {
            let text = "x1 = _y2__z;";
            let words: Vec<&str> = word_runs(text).map(|(s, e)| &text[s..e]).collect();
            assert_eq!(words, vec!["x1", "_y2__z"]);
        }

        #[test]
        fn empty_and_punctuation_only() {
            assert_eq!(word_runs("").count(), 0);
            assert_eq!(word_runs("(){};").count(), 0);
        }

        #[test]
        fn run_at_end_of_text() {
            let text = "a+bc";
            let spans: Vec<_> = word_runs(text).collect();
            assert_eq!(spans, vec![(0, 1), (2, 4)]);
        }
    }

    mod positions {
        use super::*;

        #[test]
        fn first_line() {
            assert_eq!(byte_offset_to_position("hello", 0), (1, 1));
            assert_eq!(byte_offset_to_position("hello", 3), (1, 4));
        }

        #[test]
        fn after_newline() {
            let text = "ab\ncd\nef";
            assert_eq!(byte_offset_to_position(text, 3), (2, 1));
            assert_eq!(byte_offset_to_position(text, 7), (3, 2));
        }

        #[test]
        fn columns_count_chars() {
            let text = "\u{e9}\u{e9}x";
            assert_eq!(byte_offset_to_position(text, 4), (1, 3));
        }

        #[test]
        fn past_end_clamps() {
            assert_eq!(byte_offset_to_position("ab", 100), (1, 3));
        }

        #[test]
        fn tracker_agrees_with_full_scan() {
            let text = "int add;\n\u{e9}x add\n\nadd(add)";
            let offsets: Vec<usize> = word_runs(text)
                .filter(|&(s, e)| &text[s..e] == "add")
                .map(|(s, _)| s)
                .collect();
            assert_eq!(offsets.len(), 4);

            let mut tracker = PositionTracker::new();
            for offset in offsets {
                assert_eq!(
                    tracker.position_of(text, offset),
                    byte_offset_to_position(text, offset)
                );
            }
        }

        #[test]
        fn tracker_restarts_on_earlier_offset() {
            let text = "a\nb\nc";
            let mut tracker = PositionTracker::new();
            assert_eq!(tracker.position_of(text, 4), (3, 1));
            assert_eq!(tracker.position_of(text, 2), (2, 1));
            assert_eq!(tracker.position_of(text, 100), (3, 2));
        }
    }
}
