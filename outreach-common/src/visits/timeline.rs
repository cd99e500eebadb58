//! Reverse-chronological visit timeline with summary counters

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::identity::church_key;
use super::normalize::VisitRecord;
use crate::time::in_same_week;

/// One confirmed visit as shown on the timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitEntry {
    pub church: Option<String>,
    pub date: Option<NaiveDate>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl From<&VisitRecord> for VisitEntry {
    fn from(record: &VisitRecord) -> Self {
        Self {
            church: record.church().map(str::to_string),
            date: record.visit_date(),
            address: record.address().map(str::to_string),
            notes: record.notes().map(str::to_string),
        }
    }
}

/// Summary counters over confirmed visits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TimelineTotals {
    pub total: usize,
    /// Visits dated in the current Sunday..=Saturday week
    pub this_week: usize,
    /// Visits dated after today
    pub upcoming: usize,
    pub unique_churches: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Timeline {
    pub entries: Vec<VisitEntry>,
    pub totals: TimelineTotals,
}

/// Build the timeline relative to `now`
///
/// Entries are newest first; undated visits sort last in feed order.
/// A date-only visit is "upcoming" when its midnight is after `now`,
/// which is exactly when the date is after `now`'s date.
pub fn timeline(records: &[VisitRecord], now: NaiveDateTime) -> Timeline {
    let today = now.date();
    let visited: Vec<&VisitRecord> = records.iter().filter(|r| r.visited()).collect();

    let mut entries: Vec<VisitEntry> = visited.iter().map(|r| VisitEntry::from(*r)).collect();
    // Stable sort: Some(date) descending, None after all dated entries
    entries.sort_by(|a, b| b.date.cmp(&a.date));

    let unique_churches = visited
        .iter()
        .filter_map(|r| church_key(r))
        .collect::<HashSet<_>>()
        .len();

    let dated = || visited.iter().filter_map(|r| r.visit_date());
    let totals = TimelineTotals {
        total: visited.len(),
        this_week: dated().filter(|d| in_same_week(*d, today)).count(),
        upcoming: dated().filter(|d| *d > today).count(),
        unique_churches,
    };

    Timeline { entries, totals }
}

impl Timeline {
    /// Entries `[offset, offset + limit)` for incremental display
    pub fn window(&self, offset: usize, limit: usize) -> &[VisitEntry] {
        let start = offset.min(self.entries.len());
        let end = offset.saturating_add(limit).min(self.entries.len());
        &self.entries[start..end]
    }
}
