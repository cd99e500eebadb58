//! Untyped feed rows
//!
//! A [`RawRow`] is exactly what the row source produced: column names from
//! the header row mapped to loosely-typed cells. Nothing here is validated.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

/// One loosely-typed feed cell
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Absent or blank cell
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    /// A cell the source already decoded to a calendar date
    Date(NaiveDate),
}

impl RawValue {
    /// True for absent cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Empty => true,
            RawValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed, non-empty textual rendering of the cell
    ///
    /// Numbers render without a trailing `.0` when integral so that a
    /// numeric church name or address survives as the sheet shows it.
    pub fn as_trimmed_text(&self) -> Option<String> {
        let text = match self {
            RawValue::Empty => return None,
            RawValue::Bool(b) => b.to_string(),
            RawValue::Number(n) => format_number(*n),
            RawValue::Text(s) => s.trim().to_string(),
            RawValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<NaiveDate> for RawValue {
    fn from(d: NaiveDate) -> Self {
        RawValue::Date(d)
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawValue::Empty,
            serde_json::Value::Bool(b) => RawValue::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(RawValue::Empty, RawValue::Number),
            serde_json::Value::String(s) => RawValue::Text(s),
            other => RawValue::Text(other.to_string()),
        }
    }
}

/// One feed row keyed by header column name
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct RawRow {
    cells: BTreeMap<String, RawValue>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(column, value)` pairs; later duplicates win
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RawValue>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Build a row from a JSON object; non-objects yield an empty row
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(map) => Self::from_pairs(map),
            _ => Self::default(),
        }
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<RawValue>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Cell by exact, case-sensitive column name
    pub fn get(&self, column: &str) -> Option<&RawValue> {
        self.cells.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
