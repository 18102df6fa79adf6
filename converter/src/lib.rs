//! # credits-jsonl - Movie credits CSV to JSON Lines
//!
//! Converts a credits export (one row per movie, cast and crew stored as
//! Python-literal text inside CSV cells) into one JSON object per line.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Headers   │────▶│  Normalize  │────▶│    JSONL    │
//! │   (UTF-8)   │     │ (cast/crew) │     │ (literals)  │     │ (one/line)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use credits_jsonl::{convert_file, RunConfig};
//!
//! let summary = convert_file(&RunConfig::default()).unwrap();
//! println!("Wrote {} lines", summary.written);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`config`] - Run configuration
//! - [`logs`] - Pipeline logging
//! - [`input`] - CSV table reading
//! - [`models`] - Column selection and output record
//! - [`transform`] - Header resolution, literal parsing, normalization, pipeline
//! - [`writer`] - JSONL output

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod models;

// Reading
pub mod input;

// Transformation
pub mod transform;

// Output
pub mod writer;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConvertError, InputError, LiteralError, SetupError, WriteError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    ColumnRef, ColumnSelection, CrewByJob, NormalizedRecord, RecordId, TOP_CAST_LIMIT,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use config::RunConfig;
pub use input::{CreditsTable, RawRow};
pub use transform::{
    convert, convert_file, normalize, parse_cell, resolve_columns, ConvertSummary,
};
pub use writer::JsonlWriter;
