//! Structured pipeline diagnostics
//!
//! The visit pipeline is pure: it never writes to a global log. Callers that
//! want to know how rows degraded pass a [`DiagnosticSink`] explicitly.

use std::sync::Mutex;

use serde::Serialize;
use tracing::{debug, warn};

/// One observation made while obtaining or normalizing feed rows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A `Visit Date` cell was present but could not be parsed
    UnparseableDate { row: usize, value: String },

    /// A `Stage` value outside the canonical set
    UnknownStage { row: usize, value: String },

    /// A row marked visited carries no church name
    VisitWithoutChurch { row: usize },

    /// The row source failed; the refresh continues with zero rows
    FetchFailed { message: String },

    /// Totals for one pipeline run
    PipelineSummary {
        rows: usize,
        visited: usize,
        unique_churches: usize,
    },
}

/// Receiver for pipeline diagnostics
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, diagnostic: Diagnostic);
}

/// Report to an optional sink
pub(crate) fn emit(sink: Option<&dyn DiagnosticSink>, diagnostic: Diagnostic) {
    if let Some(sink) = sink {
        sink.record(diagnostic);
    }
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::FetchFailed { message } => {
                warn!(error = %message, "Feed fetch failed, continuing with empty data set");
            }
            Diagnostic::PipelineSummary {
                rows,
                visited,
                unique_churches,
            } => {
                debug!(rows, visited, unique_churches, "Pipeline run complete");
            }
            other => debug!(diagnostic = ?other, "Row degraded during normalization"),
        }
    }
}

/// Keeps every diagnostic in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn entries(&self) -> Vec<Diagnostic> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticSink for CollectingSink {
    fn record(&self, diagnostic: Diagnostic) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}
