//! Error types for callmap operations.
//!
//! Errors are split by how far they are allowed to travel:
//!
//! - **`Error`**: infrastructure failures that halt the operation (the Java
//!   grammar cannot be loaded, the scan root cannot be read, bad configuration)
//! - **`IndexError`**: failures scoped to one compilation unit; collected into
//!   the run statistics while the rest of the batch continues
//!
//! ## Error Categorization
//!
//! `IndexErrorKind` uses a 4xx/5xx style split:
//! - Input problems (the source's fault): parse failures, structural anomalies
//! - Internal problems (our fault or the environment's): I/O, timeouts

use std::path::PathBuf;
use thiserror::Error;

/// Result type for callmap operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for callmap operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The tree-sitter Java grammar could not be loaded into a parser.
    ///
    /// Raised at indexer construction; nothing can be indexed without it.
    #[error(
        "parse tree provider unavailable: {0} (rebuild against a tree-sitter-java release compatible with tree-sitter 0.24)"
    )]
    ProviderUnavailable(String),

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON export or import failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),

    /// A method-like declaration was found outside of any class.
    ///
    /// Only raised when the orphan policy is `error`; the unit boundary turns
    /// it into an [`IndexError`].
    #[error("method `{method}` at {line}:{col} has no enclosing class")]
    StructuralAnomaly {
        /// Name of the orphaned method
        method: String,
        /// Zero-based line of the declaration
        line: u32,
        /// Zero-based column of the declaration
        col: u32,
    },
}

/// Error encountered while indexing a specific compilation unit.
///
/// These errors are collected during indexing but don't halt the run.
#[derive(Debug, Clone)]
pub struct IndexError {
    /// Path (or label) of the unit that failed
    pub path: PathBuf,
    /// Category of the error
    pub kind: IndexErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl std::fmt::Display for IndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.path.display(),
            self.message,
            self.kind
        )
    }
}

impl std::error::Error for IndexError {}

/// Categorization of unit failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexErrorKind {
    // === Input Problems (analogous to HTTP 4xx) ===
    /// The parser produced no tree for the unit
    ParseFailed,

    /// A method-like declaration had no enclosing class (orphan policy `error`)
    StructuralAnomaly,

    // === Internal Problems (analogous to HTTP 5xx) ===
    /// Could not read the file from disk
    IoError,

    /// The unit exceeded its wall-clock parse budget
    Timeout,
}

impl std::fmt::Display for IndexErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParseFailed => write!(f, "parse failed"),
            Self::StructuralAnomaly => write!(f, "structural anomaly"),
            Self::IoError => write!(f, "I/O error"),
            Self::Timeout => write!(f, "timed out"),
        }
    }
}

impl IndexErrorKind {
    /// Returns `true` if this is an input problem (4xx-style).
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::ParseFailed | Self::StructuralAnomaly)
    }

    /// Returns `true` if this is an internal problem (5xx-style).
    #[must_use]
    pub fn is_internal_error(&self) -> bool {
        matches!(self, Self::IoError | Self::Timeout)
    }
}

impl IndexError {
    /// Create a new unit error.
    #[must_use]
    pub fn new(path: PathBuf, kind: IndexErrorKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }

    /// Create a parse failure for a unit.
    #[must_use]
    pub fn parse_failed(path: PathBuf, message: impl Into<String>) -> Self {
        Self::new(path, IndexErrorKind::ParseFailed, message)
    }

    /// Create a timeout failure for a unit.
    #[must_use]
    pub fn timeout(path: PathBuf, budget_ms: u64) -> Self {
        Self::new(
            path,
            IndexErrorKind::Timeout,
            format!("parse exceeded {budget_ms} ms budget"),
        )
    }

    /// Create an I/O error for a unit.
    #[must_use]
    pub fn io_error(path: PathBuf, error: &std::io::Error) -> Self {
        Self::new(path, IndexErrorKind::IoError, error.to_string())
    }

    /// Convert an error raised while walking a unit into a unit failure.
    #[must_use]
    pub fn from_unit_error(path: PathBuf, error: &Error) -> Self {
        let kind = match error {
            Error::StructuralAnomaly { .. } => IndexErrorKind::StructuralAnomaly,
            Error::Io(_) => IndexErrorKind::IoError,
            Error::ProviderUnavailable(_) | Error::Json(_) | Error::Config(_) => {
                IndexErrorKind::ParseFailed
            }
        };
        Self::new(path, kind, error.to_string())
    }
}
