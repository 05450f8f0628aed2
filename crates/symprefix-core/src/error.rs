//! Error types and exit code constants for symprefix.
//!
//! This module provides a unified error type (`PrefixError`) that bridges
//! domain-specific errors from the subsystems (symbol loading, tree walking,
//! symbol extraction) into a common shape suitable for exit codes and JSON
//! output.
//!
//! ## Exit Code Mapping
//!
//! - `2`: Invalid arguments (bad input from caller)
//! - `3`: Configuration errors (symbols file missing or undecodable)
//! - `4`: I/O errors (a source file could not be read, output could not be written)
//! - `5`: An external symbol tool could not be run
//! - `10`: Internal errors (bugs, unexpected state)
//!
//! The run is fail-fast: the first error of any kind aborts it.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Stable error codes, used as process exit codes and in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller.
    InvalidArguments = 2,
    /// Symbols file missing or unreadable as text.
    ConfigError = 3,
    /// Reading a source file or writing output failed.
    IoError = 4,
    /// The symbol extraction tool could not be run.
    ToolFailed = 5,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
#[derive(Debug, Error)]
pub enum PrefixError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// The symbols file could not be loaded.
    #[error("config error: {message}")]
    Config { message: String },

    /// A specific file could not be read, written or copied.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file could not be copied verbatim into the destination tree.
    #[error("I/O error copying {} to {}: {source}", from.display(), to.display())]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The symbol extraction tool could not be run.
    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    Internal { message: String },
}

/// Result type for symprefix operations.
pub type PrefixResult<T> = Result<T, PrefixError>;

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&PrefixError> for OutputErrorCode {
    fn from(err: &PrefixError) -> Self {
        match err {
            PrefixError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            PrefixError::Config { .. } => OutputErrorCode::ConfigError,
            PrefixError::Io { .. } | PrefixError::CopyFailed { .. } => OutputErrorCode::IoError,
            PrefixError::ToolFailed { .. } => OutputErrorCode::ToolFailed,
            PrefixError::Internal { .. } => OutputErrorCode::InternalError,
        }
    }
}

// ============================================================================
// Bridge: SymbolsError -> PrefixError
// ============================================================================

impl From<crate::symbols::SymbolsError> for PrefixError {
    fn from(err: crate::symbols::SymbolsError) -> Self {
        PrefixError::Config {
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl PrefixError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        PrefixError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create an I/O error tied to a path.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        PrefixError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a copy error tied to both ends of the copy.
    pub fn copy(from: impl AsRef<Path>, to: impl AsRef<Path>, source: io::Error) -> Self {
        PrefixError::CopyFailed {
            from: from.as_ref().to_path_buf(),
            to: to.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a tool failure error.
    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        PrefixError::ToolFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        PrefixError::Internal {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
