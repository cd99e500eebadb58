//! Row feed abstraction and CSV tokenization
//!
//! A [`RowSource`] returns the full sheet as [`RawRow`]s in one call. A
//! failed fetch is reported and then treated as an empty sheet by
//! [`fetch_or_empty`]; it never aborts a refresh.

use async_trait::async_trait;
use thiserror::Error;
use tracing::error;

use crate::diagnostics::{emit, Diagnostic, DiagnosticSink};
use crate::visits::{RawRow, RawValue};

/// Failure to obtain the feed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, timeout, body read)
    #[error("Network error: {0}")]
    Network(String),

    /// The feed answered with a non-success HTTP status
    #[error("Feed returned status {0}: {1}")]
    Status(u16, String),

    /// The feed body could not be tokenized
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Supplies complete snapshots of the visit sheet
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Short identifier for logs, e.g. `google-sheets`
    fn source_id(&self) -> &'static str;

    /// Fetch every data row; the header row is consumed to name columns
    async fn fetch(&self) -> Result<Vec<RawRow>, FetchError>;
}

/// Fetch, degrading any failure to zero rows
///
/// Returns the rows together with the error that was swallowed, if any, so
/// callers can surface it next to the empty data set.
pub async fn fetch_or_empty(
    source: &dyn RowSource,
    diagnostics: Option<&dyn DiagnosticSink>,
) -> (Vec<RawRow>, Option<FetchError>) {
    match source.fetch().await {
        Ok(rows) => (rows, None),
        Err(e) => {
            error!(source = source.source_id(), error = %e, "Failed to fetch visit feed");
            emit(
                diagnostics,
                Diagnostic::FetchFailed {
                    message: e.to_string(),
                },
            );
            (Vec::new(), Some(e))
        }
    }
}

/// Tokenize a CSV export into rows keyed by the first record's headers
///
/// Rows may be shorter or longer than the header: missing cells are absent
/// and surplus cells are dropped. Cells are typed the way a spreadsheet
/// export reads: `true`/`false` become booleans, numerals become numbers,
/// blanks become [`RawValue::Empty`], anything else stays text.
pub fn parse_csv(text: &str) -> Result<Vec<RawRow>, FetchError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| FetchError::Parse(format!("failed to read CSV headers: {}", e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| FetchError::Parse(format!("failed to read CSV row: {}", e)))?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let row = RawRow::from_pairs(
            headers
                .iter()
                .zip(record.iter())
                .filter(|(header, _)| !header.is_empty())
                .map(|(header, field)| (header.clone(), type_cell(field))),
        );
        rows.push(row);
    }

    Ok(rows)
}

/// Dynamic typing for one CSV cell
pub fn type_cell(field: &str) -> RawValue {
    let trimmed = field.trim();
    match trimmed {
        "" => RawValue::Empty,
        "true" | "TRUE" | "True" => RawValue::Bool(true),
        "false" | "FALSE" | "False" => RawValue::Bool(false),
        _ => match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() && looks_numeric(trimmed) => RawValue::Number(n),
            _ => RawValue::Text(field.to_string()),
        },
    }
}

/// Plain decimal notation only; rejects `inf`, `NaN` and similar words
fn looks_numeric(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
}
