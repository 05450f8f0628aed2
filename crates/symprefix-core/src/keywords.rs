//! Reserved words that are never renamed.
//!
//! A symbols file can list a name that is also a C/C++ keyword (a data
//! symbol called `int`, say). Renaming it would corrupt every declaration
//! in the tree, so these words are skipped even when they are mapped.

/// C/C++ keywords excluded from renaming.
pub const KEYWORDS: &[&str] = &[
    "if", "else", "while", "for", "do", "return", "break", "continue", "switch", "case",
    "default", "goto", "sizeof", "typedef", "void", "char", "short", "int", "long", "float",
    "double", "signed", "unsigned", "struct", "union", "enum", "class", "public", "private",
    "protected", "template", "namespace",
];

/// Check whether `word` is a reserved keyword.
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}
