//! Run configuration.
//!
//! Paths are resolved relative to the working directory; there is no
//! configuration file.

use std::path::{Path, PathBuf};

/// Conventional location of the credits export.
pub const DEFAULT_INPUT: &str = "data/credits.csv";

/// Conventional location of the generated JSONL file.
pub const DEFAULT_OUTPUT: &str = "src/data/movies.raw.jsonl";

/// Options for a conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// CSV file to read
    pub input: PathBuf,

    /// JSONL file to (over)write
    pub output: PathBuf,
}

impl RunConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Same paths, resolved against `base` when relative.
    pub fn resolved_against(&self, base: &Path) -> Self {
        Self {
            input: absolutize(base, &self.input),
            output: absolutize(base, &self.output),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT, DEFAULT_OUTPUT)
    }
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
