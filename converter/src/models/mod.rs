//! Domain models for the credits conversion pipeline.
//!
//! - [`ColumnRef`] / [`ColumnSelection`] - Which CSV columns feed cast, crew and id
//! - [`RecordId`] - Integer, text or missing movie identifier
//! - [`CrewByJob`] - Crew names grouped by job, in first-seen order
//! - [`NormalizedRecord`] - One output line

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Number, Value};
use std::fmt;

/// Number of leading cast names kept in `top_cast`.
pub const TOP_CAST_LIMIT: usize = 10;

// =============================================================================
// Column Selection
// =============================================================================

/// A resolved column: its position in the header and its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub index: usize,
    pub name: String,
}

impl ColumnRef {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' (#{})", self.name, self.index + 1)
    }
}

/// Columns chosen by the header resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSelection {
    pub cast: Option<ColumnRef>,
    pub crew: Option<ColumnRef>,
    pub id: Option<ColumnRef>,
}

impl ColumnSelection {
    /// True when `index` feeds the cast or crew field.
    pub fn is_credit_column(&self, index: usize) -> bool {
        [&self.cast, &self.crew]
            .into_iter()
            .flatten()
            .any(|c| c.index == index)
    }
}

// =============================================================================
// Record Identifier
// =============================================================================

/// Movie identifier: an integer (of any size) when the cell parses as one,
/// the trimmed text otherwise, `Null` when the row holds no candidate value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(Number),
    Text(String),
    Null,
}

impl RecordId {
    /// Coerce a raw cell: trim, then try an integer.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        match parse_int(trimmed) {
            Some(n) => RecordId::Int(n),
            None => RecordId::Text(trimmed.to_string()),
        }
    }
}

/// Integer syntax accepted for ids: optional sign, ASCII digits, single `_`
/// between digits.
fn parse_int(s: &str) -> Option<Number> {
    let (negative, digits) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
        || !digits.bytes().all(|b| b.is_ascii_digit() || b == b'_')
    {
        return None;
    }
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    let magnitude = match cleaned.trim_start_matches('0') {
        "" => "0",
        rest => rest,
    };
    let signed = if negative && magnitude != "0" {
        format!("-{}", magnitude)
    } else {
        magnitude.to_string()
    };
    exact_integer(&signed)
}

/// Exact JSON number for decimal integer text (optional `-`, no leading
/// zeros). Values outside `i64` keep every digit.
pub fn exact_integer(text: &str) -> Option<Number> {
    match text.parse::<i64>() {
        Ok(n) => Some(Number::from(n)),
        Err(_) => text.parse().ok(),
    }
}

// =============================================================================
// Crew By Job
// =============================================================================

/// Crew member names grouped by job; jobs keep first-seen order and each
/// name list keeps crew order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrewByJob {
    groups: Vec<(String, Vec<String>)>,
}

impl CrewByJob {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `name` under `job`, creating the job on first sight.
    pub fn push(&mut self, job: &str, name: &str) {
        match self.groups.iter_mut().find(|(j, _)| j == job) {
            Some((_, names)) => names.push(name.to_string()),
            None => self.groups.push((job.to_string(), vec![name.to_string()])),
        }
    }

    pub fn get(&self, job: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(j, _)| j == job)
            .map(|(_, names)| names.as_slice())
    }

    pub fn jobs(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(j, _)| j.as_str())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Serialize for CrewByJob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (job, names) in &self.groups {
            map.serialize_entry(job, names)?;
        }
        map.end()
    }
}

// =============================================================================
// Normalized Record
// =============================================================================

/// One output line. Field order here is the serialized field order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub id: RecordId,
    /// Full cast entries, as parsed
    pub cast: Vec<Value>,
    /// Full crew entries, as parsed
    pub crew: Vec<Value>,
    pub cast_names: Vec<String>,
    /// Prefix of `cast_names`, at most [`TOP_CAST_LIMIT`] long
    pub top_cast: Vec<String>,
    pub crew_by_job: CrewByJob,
}
