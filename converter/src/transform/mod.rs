//! Transformation module.
//!
//! This module handles the CSV row to JSONL record transformation:
//! - Headers: Pick the cast, crew and id columns
//! - Literal: Recover entries from Python-literal cells
//! - Normalizer: Build one record per row
//! - Pipeline: Main conversion driver

pub mod headers;
pub mod literal;
pub mod normalizer;
pub mod pipeline;

pub use headers::resolve_columns;
pub use literal::{parse_cell, parse_literal, Literal};
pub use normalizer::normalize;
pub use pipeline::*;
