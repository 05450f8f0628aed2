//! Core infrastructure for symprefix.
//!
//! This crate provides everything needed to prefix a library's exported
//! symbols across a source tree:
//! - Symbols file loading and rename map construction
//! - Reserved keyword exclusion
//! - Boundary-aware substitution engine
//! - Source tree mirroring
//! - Layered run configuration
//! - Error types and exit codes
//! - JSON output types for CLI responses
//! - Symbol extraction from static libraries

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod keywords;
pub mod output;
pub mod symbols;
pub mod text;
pub mod walk;
