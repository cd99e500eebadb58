//! Raw row → canonical [`VisitRecord`]
//!
//! Normalization is total. Missing columns, blank cells, odd types and
//! unparseable dates all degrade to absent fields; nothing here can fail.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

use super::predicate::is_visited;
use super::raw::{RawRow, RawValue};
use crate::diagnostics::{emit, Diagnostic, DiagnosticSink};

/// Recognized feed columns (exact, case-sensitive header names)
pub mod columns {
    pub const CHURCH: &str = "Church";
    pub const ADDRESS: &str = "Address";
    pub const STAGE: &str = "Stage";
    pub const VISITED: &str = "Visit?";
    pub const VISIT_DATE: &str = "Visit Date";
    pub const VISIT_NOTES: &str = "Visit Notes";
    pub const CONTACT: &str = "Contact";

    pub const RECOGNIZED: [&str; 7] = [
        CHURCH,
        ADDRESS,
        STAGE,
        VISITED,
        VISIT_DATE,
        VISIT_NOTES,
        CONTACT,
    ];
}

/// Outreach pipeline stage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stage {
    Prospect,
    /// Labelled `Visited` or `Contacted` in the feed
    Visited,
    Navigation,
    MeetingScheduled,
    Donated,
    /// Any other label, kept verbatim
    Other(String),
}

impl Stage {
    /// Canonical display order for stage distributions
    pub const CANONICAL: [Stage; 5] = [
        Stage::Prospect,
        Stage::Visited,
        Stage::Navigation,
        Stage::MeetingScheduled,
        Stage::Donated,
    ];

    /// Parse a trimmed stage label; unknown labels become [`Stage::Other`]
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "Prospect" => Stage::Prospect,
            "Visited" | "Contacted" => Stage::Visited,
            "Navigation" => Stage::Navigation,
            "Meeting Scheduled" => Stage::MeetingScheduled,
            "Donated" => Stage::Donated,
            other => Stage::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Stage::Prospect => "Prospect",
            Stage::Visited => "Visited",
            Stage::Navigation => "Navigation",
            Stage::MeetingScheduled => "Meeting Scheduled",
            Stage::Donated => "Donated",
            Stage::Other(label) => label,
        }
    }

    pub fn is_canonical(&self) -> bool {
        !matches!(self, Stage::Other(_))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Stage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Canonical, typed form of one feed row
///
/// Fields are private: a record is fixed once derived from its row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitRecord {
    church: Option<String>,
    address: Option<String>,
    stage: Option<Stage>,
    visited: bool,
    visit_date: Option<NaiveDate>,
    notes: Option<String>,
    contact: Option<String>,
    /// `Visit Date` cell was non-blank, whether or not it parsed
    #[serde(skip)]
    date_recorded: bool,
    #[serde(skip)]
    visit_flag: RawValue,
    #[serde(skip)]
    extras: BTreeMap<String, RawValue>,
}

impl VisitRecord {
    pub fn church(&self) -> Option<&str> {
        self.church.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn stage(&self) -> Option<&Stage> {
        self.stage.as_ref()
    }

    pub fn visited(&self) -> bool {
        self.visited
    }

    pub fn visit_date(&self) -> Option<NaiveDate> {
        self.visit_date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn contact(&self) -> Option<&str> {
        self.contact.as_deref()
    }

    pub fn has_visit_date_cell(&self) -> bool {
        self.date_recorded
    }

    /// The untouched `Visit?` cell, for predicates other than "visited"
    pub fn visit_flag(&self) -> &RawValue {
        &self.visit_flag
    }

    /// Cell from a column this normalizer does not recognize
    pub fn raw(&self, column: &str) -> Option<&RawValue> {
        self.extras.get(column)
    }

    /// All unrecognized columns
    pub fn extras(&self) -> &BTreeMap<String, RawValue> {
        &self.extras
    }
}

/// Normalize one raw row
pub fn normalize(row: &RawRow) -> VisitRecord {
    let text = |column: &str| row.get(column).and_then(RawValue::as_trimmed_text);
    let visit_flag = row.get(columns::VISITED).cloned().unwrap_or_default();

    let extras = row
        .iter()
        .filter(|(column, _)| !columns::RECOGNIZED.contains(column))
        .map(|(column, value)| (column.to_string(), value.clone()))
        .collect();

    VisitRecord {
        church: text(columns::CHURCH),
        address: text(columns::ADDRESS),
        stage: text(columns::STAGE).map(|label| Stage::parse(&label)),
        visited: is_visited(&visit_flag),
        visit_date: row.get(columns::VISIT_DATE).and_then(parse_visit_date),
        notes: text(columns::VISIT_NOTES),
        contact: text(columns::CONTACT),
        date_recorded: row
            .get(columns::VISIT_DATE)
            .is_some_and(|v| !v.is_blank()),
        visit_flag,
        extras,
    }
}

/// Normalize a full feed snapshot, reporting degradations to `diagnostics`
pub fn normalize_rows(
    rows: &[RawRow],
    diagnostics: Option<&dyn DiagnosticSink>,
) -> Vec<VisitRecord> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let record = normalize(row);
            if diagnostics.is_some() {
                report_degradations(index, row, &record, diagnostics);
            }
            record
        })
        .collect()
}

fn report_degradations(
    index: usize,
    row: &RawRow,
    record: &VisitRecord,
    diagnostics: Option<&dyn DiagnosticSink>,
) {
    if record.visit_date.is_none() {
        if let Some(value) = row.get(columns::VISIT_DATE).filter(|v| !v.is_blank()) {
            emit(
                diagnostics,
                Diagnostic::UnparseableDate {
                    row: index,
                    value: value.as_trimmed_text().unwrap_or_default(),
                },
            );
        }
    }
    if let Some(stage) = record.stage.as_ref().filter(|s| !s.is_canonical()) {
        emit(
            diagnostics,
            Diagnostic::UnknownStage {
                row: index,
                value: stage.label().to_string(),
            },
        );
    }
    if record.visited && record.church.is_none() {
        emit(diagnostics, Diagnostic::VisitWithoutChurch { row: index });
    }
}

/// Date-only notations accepted for text cells, tried in order
///
/// Two-digit years come before four-digit ones: `%y` rejects `2024`
/// (trailing input) while `%Y` would read `24` as year 24.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parse a `Visit Date` cell; anything unrecognized is absent
pub fn parse_visit_date(value: &RawValue) -> Option<NaiveDate> {
    match value {
        RawValue::Date(date) => Some(*date),
        RawValue::Text(text) => parse_date_text(text.trim()),
        _ => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(|datetime| datetime.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|datetime| datetime.date_naive())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_normalize_full_row() {
        let row = RawRow::from_json(json!({
            "Church": "  Grace Fellowship ",
            "Address": "1 Main St",
            "Stage": "Meeting Scheduled",
            "Visit?": "TRUE",
            "Visit Date": "2024-01-10",
            "Visit Notes": "Met the pastor",
            "Contact": "Pastor Lee"
        }));

        let record = normalize(&row);
        assert_eq!(record.church(), Some("Grace Fellowship"));
        assert_eq!(record.address(), Some("1 Main St"));
        assert_eq!(record.stage(), Some(&Stage::MeetingScheduled));
        assert!(record.visited());
        assert_eq!(record.visit_date(), Some(ymd(2024, 1, 10)));
        assert_eq!(record.notes(), Some("Met the pastor"));
        assert_eq!(record.contact(), Some("Pastor Lee"));
        assert!(record.extras().is_empty());
    }

    #[test]
    fn test_normalize_empty_row() {
        let record = normalize(&RawRow::new());
        assert_eq!(record.church(), None);
        assert_eq!(record.address(), None);
        assert_eq!(record.stage(), None);
        assert!(!record.visited());
        assert_eq!(record.visit_date(), None);
        assert_eq!(record.visit_flag(), &RawValue::Empty);
    }

    #[test]
    fn test_blank_strings_become_absent() {
        let row = RawRow::from_json(json!({
            "Church": "   ",
            "Address": "",
            "Stage": " ",
            "Visit Notes": "\t"
        }));
        let record = normalize(&row);
        assert_eq!(record.church(), None);
        assert_eq!(record.address(), None);
        assert_eq!(record.stage(), None);
        assert_eq!(record.notes(), None);
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        let row = RawRow::from_json(json!({ "church": "Grace", "VISIT?": "TRUE" }));
        let record = normalize(&row);
        assert_eq!(record.church(), None);
        assert!(!record.visited());
        assert_eq!(record.raw("church"), Some(&RawValue::from("Grace")));
    }

    #[test]
    fn test_unrecognized_columns_preserved() {
        let row = RawRow::from_json(json!({
            "Church": "Grace",
            "Denomination": "Baptist",
            "Members": 120
        }));
        let record = normalize(&row);
        assert_eq!(record.raw("Denomination"), Some(&RawValue::from("Baptist")));
        assert_eq!(record.raw("Members"), Some(&RawValue::Number(120.0)));
        assert_eq!(record.raw("Church"), None);
        assert_eq!(record.extras().len(), 2);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let row = RawRow::from_json(json!({
            "Church": "Grace",
            "Visit?": true,
            "Visit Date": "not a date",
            "Stage": "Custom"
        }));
        assert_eq!(normalize(&row), normalize(&row));
    }

    #[test]
    fn test_numeric_church_name_kept_as_text() {
        let row = RawRow::from_pairs([("Church", RawValue::Number(7.0))]);
        assert_eq!(normalize(&row).church(), Some("7"));
    }

    #[test]
    fn test_stage_parsing() {
        assert_eq!(Stage::parse("Prospect"), Stage::Prospect);
        assert_eq!(Stage::parse("Visited"), Stage::Visited);
        assert_eq!(Stage::parse("Contacted"), Stage::Visited);
        assert_eq!(Stage::parse(" Donated "), Stage::Donated);
        assert_eq!(
            Stage::parse("Unknown Custom Stage"),
            Stage::Other("Unknown Custom Stage".to_string())
        );
        // Labels are matched exactly
        assert_eq!(Stage::parse("prospect"), Stage::Other("prospect".to_string()));
    }

    #[test]
    fn test_stage_serializes_as_label() {
        let json = serde_json::to_string(&Stage::MeetingScheduled).unwrap();
        assert_eq!(json, "\"Meeting Scheduled\"");
    }

    #[test]
    fn test_parse_visit_date_notations() {
        let expected = Some(ymd(2024, 1, 10));
        for text in [
            "2024-01-10",
            "1/10/2024",
            "01/10/2024",
            "1/10/24",
            "2024/01/10",
            "January 10, 2024",
            "Jan 10, 2024",
            "10 January 2024",
            "2024-01-10 09:30:00",
            "2024-01-10T09:30:00",
            "1/10/2024 14:05:00",
            "2024-01-10T09:30:00Z",
        ] {
            assert_eq!(parse_visit_date(&RawValue::from(text)), expected, "{}", text);
        }
    }

    #[test]
    fn test_parse_visit_date_rejects_garbage() {
        assert_eq!(parse_visit_date(&RawValue::from("soon")), None);
        assert_eq!(parse_visit_date(&RawValue::from("13/45/2024")), None);
        assert_eq!(parse_visit_date(&RawValue::from("2024-02-30")), None);
        assert_eq!(parse_visit_date(&RawValue::from("")), None);
        assert_eq!(parse_visit_date(&RawValue::Number(45_000.0)), None);
        assert_eq!(parse_visit_date(&RawValue::Bool(true)), None);
        assert_eq!(parse_visit_date(&RawValue::Empty), None);
    }

    #[test]
    fn test_parse_visit_date_passes_decoded_dates_through() {
        let date = ymd(2025, 6, 1);
        assert_eq!(parse_visit_date(&RawValue::Date(date)), Some(date));
    }

    #[test]
    fn test_normalize_rows_reports_degradations() {
        let rows = vec![
            RawRow::from_json(json!({ "Church": "A", "Visit Date": "someday" })),
            RawRow::from_json(json!({ "Church": "B", "Stage": "Unknown Custom Stage" })),
            RawRow::from_json(json!({ "Visit?": "TRUE" })),
            RawRow::from_json(json!({ "Church": "C", "Visit Date": " " })),
        ];
        let sink = CollectingSink::new();
        let records = normalize_rows(&rows, Some(&sink));

        assert_eq!(records.len(), 4);
        assert_eq!(
            sink.entries(),
            vec![
                Diagnostic::UnparseableDate {
                    row: 0,
                    value: "someday".to_string()
                },
                Diagnostic::UnknownStage {
                    row: 1,
                    value: "Unknown Custom Stage".to_string()
                },
                Diagnostic::VisitWithoutChurch { row: 2 },
            ]
        );
    }
}
