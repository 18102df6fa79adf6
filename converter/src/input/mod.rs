//! CSV table reader.
//!
//! Reads a comma-separated, RFC 4180 quoted table whose first row is the
//! header. Rows are streamed one at a time as [`RawRow`]s aligned to the
//! header. Invalid UTF-8 is replaced rather than rejected, and ragged rows are
//! accepted: missing trailing cells read as `None`, extra cells are dropped.

use crate::error::{InputError, InputResult};
use csv::{ByteRecord, ReaderBuilder};
use std::io::Read;

const BOM: char = '\u{feff}';

/// One data row, cells aligned to the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: Vec<Option<String>>,
}

impl RawRow {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    /// Build a row from present cells (test and debug helper).
    pub fn from_cells<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(cells.into_iter().map(|c| Some(c.into())).collect())
    }

    /// Cell at `index`, `None` when the row was too short to reach it.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }

    /// Cells in header order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<&str>)> {
        self.cells.iter().enumerate().map(|(i, c)| (i, c.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn from_record(record: &ByteRecord, width: usize) -> Self {
        let mut cells: Vec<Option<String>> = record
            .iter()
            .take(width)
            .map(|field| Some(String::from_utf8_lossy(field).into_owned()))
            .collect();
        cells.resize(width, None);
        Self { cells }
    }
}

/// A credits table opened for streaming.
pub struct CreditsTable<R: Read> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
}

impl<R: Read> CreditsTable<R> {
    /// Open a table and read its header row.
    pub fn from_reader(input: R) -> InputResult<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let headers = reader
            .byte_headers()
            .map_err(InputError::Header)?
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let name = String::from_utf8_lossy(field);
                if i == 0 {
                    name.trim_start_matches(BOM).to_string()
                } else {
                    name.into_owned()
                }
            })
            .collect::<Vec<_>>();

        if headers.is_empty() {
            return Err(InputError::NoHeader);
        }

        Ok(Self { reader, headers })
    }

    /// Column names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Stream the data rows in file order.
    pub fn rows(&mut self) -> impl Iterator<Item = InputResult<RawRow>> + '_ {
        let width = self.headers.len();
        self.reader.byte_records().map(move |result| {
            result
                .map(|record| RawRow::from_record(&record, width))
                .map_err(|source| InputError::Row {
                    line: source.position().map(|p| p.line()).unwrap_or(0),
                    source,
                })
        })
    }
}
