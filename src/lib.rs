//! symprefix: prefix a static library's exported symbols across a source tree.
//!
//! Given a symbols file and a prefix, every free-standing occurrence of each
//! symbol in the C-family sources of a tree is rewritten to `prefix + symbol`
//! while the tree is mirrored into a destination directory.

// Core infrastructure - re-exported from symprefix-core
pub use symprefix_core::config;
pub use symprefix_core::engine;
pub use symprefix_core::error;
pub use symprefix_core::extract;
pub use symprefix_core::keywords;
pub use symprefix_core::output;
pub use symprefix_core::symbols;
pub use symprefix_core::text;
pub use symprefix_core::walk;

// Front door for the binaries
pub mod cli;
