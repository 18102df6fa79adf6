//! Row normalization: one raw CSV row in, one [`NormalizedRecord`] out.
//!
//! Nothing here can fail. Missing columns read as empty cells, malformed
//! cells yield no entries, and entries without a usable `name` or `job` are
//! left out of the derived fields.

use serde_json::Value;

use super::literal::parse_cell;
use crate::input::RawRow;
use crate::models::{
    ColumnRef, ColumnSelection, CrewByJob, NormalizedRecord, RecordId, TOP_CAST_LIMIT,
};

/// Build the output record for one row.
pub fn normalize(row: &RawRow, columns: &ColumnSelection) -> NormalizedRecord {
    let cast = parse_cell(cell(row, columns.cast.as_ref()));
    let crew = parse_cell(cell(row, columns.crew.as_ref()));
    let id = resolve_id(row, columns);

    let cast_names = cast_names(&cast);
    let top_cast = cast_names.iter().take(TOP_CAST_LIMIT).cloned().collect();
    let crew_by_job = crew_by_job(&crew);

    NormalizedRecord {
        id,
        cast,
        crew,
        cast_names,
        top_cast,
        crew_by_job,
    }
}

fn cell<'r>(row: &'r RawRow, column: Option<&ColumnRef>) -> &'r str {
    column.and_then(|c| row.get(c.index)).unwrap_or("")
}

/// Id from the id column when it has a cell, else the first non-blank cell
/// outside the cast and crew columns, in header order.
pub fn resolve_id(row: &RawRow, columns: &ColumnSelection) -> RecordId {
    let from_column = columns.id.as_ref().and_then(|c| row.get(c.index));

    let raw = from_column.or_else(|| {
        row.iter()
            .filter(|(i, _)| !columns.is_credit_column(*i))
            .filter_map(|(_, value)| value)
            .find(|value| !value.trim().is_empty())
    });

    raw.map(RecordId::from_raw).unwrap_or(RecordId::Null)
}

/// Non-empty string field of a mapping entry.
fn text_field<'v>(entry: &'v Value, key: &str) -> Option<&'v str> {
    entry
        .as_object()?
        .get(key)?
        .as_str()
        .filter(|s| !s.is_empty())
}

/// Names of cast entries, in cast order; unnamed entries are skipped.
pub fn cast_names(cast: &[Value]) -> Vec<String> {
    cast.iter()
        .filter_map(|entry| text_field(entry, "name"))
        .map(str::to_string)
        .collect()
}

/// Crew names grouped by job; entries missing either field are skipped.
pub fn crew_by_job(crew: &[Value]) -> CrewByJob {
    let mut grouped = CrewByJob::new();
    for entry in crew {
        if let (Some(job), Some(name)) = (text_field(entry, "job"), text_field(entry, "name")) {
            grouped.push(job, name);
        }
    }
    grouped
}
