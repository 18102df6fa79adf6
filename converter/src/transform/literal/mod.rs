//! Embedded-literal parsing.
//!
//! Credits exports store cast and crew as Python-literal text inside a CSV
//! cell, e.g. `[{'cast_id': 14, 'name': 'Tom Hanks', 'order': 0}]`. This
//! module recovers those entries as JSON values.
//!
//! [`parse_cell`] never fails: blank cells, cells that are not valid literals
//! and cells holding something other than a list all yield no entries.
//!
//! ```
//! use credits_jsonl::transform::literal::parse_cell;
//! use serde_json::json;
//!
//! let entries = parse_cell("[{'name': 'Tom Hanks', 'order': 0}]");
//! assert_eq!(entries, vec![json!({"name": "Tom Hanks", "order": 0})]);
//!
//! assert!(parse_cell("not a list").is_empty());
//! ```

pub mod grammar;

pub use grammar::parse_literal;

use serde_json::{Map, Number, Value};

/// A parsed literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    /// Integer outside the `i64` range, kept digit-exact
    BigInt(Number),
    Float(f64),
    Str(String),
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    /// Entries in first-insertion order
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    /// Whether the value may be used as a dict key.
    pub fn is_hashable(&self) -> bool {
        match self {
            Literal::List(_) | Literal::Dict(_) => false,
            Literal::Tuple(items) => items.iter().all(Literal::is_hashable),
            _ => true,
        }
    }

    /// Dict key equality: numbers compare by value across int, float and
    /// bool, everything else structurally.
    pub fn key_eq(&self, other: &Literal) -> bool {
        match (self, other) {
            (Literal::Float(a), Literal::Float(b)) => a == b,
            _ if self.is_number() && other.is_number() => {
                match (self.integer_text(), other.integer_text()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            (Literal::Tuple(a), Literal::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.key_eq(y))
            }
            _ => !self.is_number() && !other.is_number() && self == other,
        }
    }

    fn is_number(&self) -> bool {
        matches!(
            self,
            Literal::Bool(_) | Literal::Int(_) | Literal::BigInt(_) | Literal::Float(_)
        )
    }

    /// Exact decimal text of an integral number.
    fn integer_text(&self) -> Option<String> {
        match self {
            Literal::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            Literal::Int(n) => Some(n.to_string()),
            Literal::BigInt(n) => Some(n.to_string()),
            Literal::Float(f) if *f == 0.0 => Some("0".to_string()),
            Literal::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(format!("{:.0}", f)),
            _ => None,
        }
    }

    /// Convert to JSON. Tuples become arrays, non-string dict keys are
    /// rendered as text, and non-finite floats become null.
    pub fn to_json(&self) -> Value {
        match self {
            Literal::None => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(n) => Value::Number((*n).into()),
            Literal::BigInt(n) => Value::Number(n.clone()),
            Literal::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            Literal::Str(s) => Value::String(s.clone()),
            Literal::List(items) | Literal::Tuple(items) => {
                Value::Array(items.iter().map(Literal::to_json).collect())
            }
            Literal::Dict(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key.key_text(), value.to_json());
                }
                Value::Object(map)
            }
        }
    }

    fn key_text(&self) -> String {
        match self {
            Literal::Str(s) => s.clone(),
            Literal::None => "null".to_string(),
            Literal::Bool(b) => b.to_string(),
            Literal::Int(n) => n.to_string(),
            Literal::BigInt(n) => n.to_string(),
            Literal::Float(f) => float_text(*f),
            other => other.to_json().to_string(),
        }
    }
}

fn float_text(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

/// Undo CSV re-quoting: every `""` becomes `"`.
///
/// Applied to the whole cell, so content that really holds two adjacent
/// double quotes is collapsed too.
pub fn repair_quotes(cell: &str) -> String {
    cell.replace("\"\"", "\"")
}

/// Recover the list of entries encoded in a cell.
pub fn parse_cell(cell: &str) -> Vec<Value> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let repaired = repair_quotes(trimmed);
    match parse_literal(&repaired) {
        Ok(Literal::List(items)) => items.iter().map(Literal::to_json).collect(),
        Ok(Literal::Str(inner)) if inner.trim().starts_with('[') => match parse_literal(&inner) {
            Ok(Literal::List(items)) => items.iter().map(Literal::to_json).collect(),
            Ok(_) => Vec::new(),
            Err(err) => {
                tracing::trace!("double-encoded cell rejected: {}", err);
                Vec::new()
            }
        },
        Ok(_) => Vec::new(),
        Err(err) => {
            tracing::trace!("cell rejected: {}", err);
            Vec::new()
        }
    }
}
