//! Error types for the credits conversion pipeline.
//!
//! - [`SetupError`] - Input/output checks done before any row is read
//! - [`InputError`] - CSV reading errors
//! - [`LiteralError`] - Embedded literal grammar violations
//! - [`WriteError`] - JSONL serialization and output errors
//! - [`ConvertError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Setup Errors
// =============================================================================

/// Fatal errors detected before processing starts.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Input file does not exist.
    #[error("CSV not found at {}", path.display())]
    InputMissing { path: PathBuf },

    /// Input file exists but is zero bytes long.
    #[error("CSV is empty at {}", path.display())]
    InputEmpty { path: PathBuf },

    /// Input file could not be opened or inspected.
    #[error("Cannot open CSV at {}: {source}", path.display())]
    InputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output directory could not be created.
    #[error("Cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output file could not be created.
    #[error("Cannot create output file {}: {source}", path.display())]
    OutputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Input Errors
// =============================================================================

/// Errors while reading the CSV table.
#[derive(Debug, Error)]
pub enum InputError {
    /// The stream holds no header row at all.
    #[error("CSV has no header row")]
    NoHeader,

    /// The header row could not be read.
    #[error("Cannot read CSV header: {0}")]
    Header(#[source] csv::Error),

    /// A data row could not be read.
    #[error("Cannot read CSV row {line}: {source}")]
    Row {
        line: u64,
        #[source]
        source: csv::Error,
    },
}

// =============================================================================
// Literal Errors
// =============================================================================

/// Grammar violation inside an embedded literal.
///
/// Never escapes [`crate::transform::literal::parse_cell`]; a cell that fails
/// to parse simply yields no entries.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid literal at offset {offset}: {message}")]
pub struct LiteralError {
    pub offset: usize,
    pub message: String,
}

impl LiteralError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

// =============================================================================
// Write Errors
// =============================================================================

/// Errors while writing JSONL output.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Record could not be serialized.
    #[error("Failed to serialize record: {0}")]
    Json(#[from] serde_json::Error),

    /// Output stream rejected the write.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Convert Errors (top-level)
// =============================================================================

/// Top-level conversion errors.
///
/// This is the error type returned by [`crate::transform::pipeline::convert`]
/// and [`crate::transform::pipeline::convert_file`].
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

impl ConvertError {
    /// True for the missing/empty input failures reported before any row is read.
    pub fn is_setup(&self) -> bool {
        matches!(self, ConvertError::Setup(_))
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV reading.
pub type InputResult<T> = Result<T, InputError>;

/// Result type for literal parsing.
pub type LiteralResult<T> = Result<T, LiteralError>;

/// Result type for JSONL writing.
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for a whole conversion.
pub type ConvertResult<T> = Result<T, ConvertError>;
