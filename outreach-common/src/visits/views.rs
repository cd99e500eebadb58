//! All derived views for one refresh of the feed

use chrono::NaiveDateTime;
use serde::Serialize;

use super::aggregate::{monthly_series, stage_distribution, MonthlyScope, MonthlySeries, StageBucket};
use super::audit::{audit, VisitAudit};
use super::contacts::{contact_book, ContactBook};
use super::dedup::dedupe;
use super::normalize::VisitRecord;
use super::timeline::{timeline, Timeline};
use crate::diagnostics::{emit, Diagnostic, DiagnosticSink};

/// Inputs that shape the derived views but not the records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    /// Years charted in the monthly series
    pub years: Vec<i32>,
    pub monthly_scope: MonthlyScope,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            years: vec![2024, 2025],
            monthly_scope: MonthlyScope::VisitedOnly,
        }
    }
}

/// Every view the dashboard renders, computed together from one snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DashboardViews {
    /// All rows, including those with no stage or an unknown stage
    pub total_records: usize,
    pub churches: Vec<VisitRecord>,
    pub stages: Vec<StageBucket>,
    pub monthly: Vec<MonthlySeries>,
    pub timeline: Timeline,
    pub contacts: ContactBook,
    pub audit: VisitAudit,
}

impl DashboardViews {
    pub fn build(
        records: &[VisitRecord],
        now: NaiveDateTime,
        options: &ViewOptions,
        diagnostics: Option<&dyn DiagnosticSink>,
    ) -> Self {
        let views = Self {
            total_records: records.len(),
            churches: dedupe(records),
            stages: stage_distribution(records),
            monthly: monthly_series(records, &options.years, options.monthly_scope),
            timeline: timeline(records, now),
            contacts: contact_book(records, now),
            audit: audit(records),
        };

        emit(
            diagnostics,
            Diagnostic::PipelineSummary {
                rows: views.total_records,
                visited: views.timeline.totals.total,
                unique_churches: views.timeline.totals.unique_churches,
            },
        );

        views
    }
}
