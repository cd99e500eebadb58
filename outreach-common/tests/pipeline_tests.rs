//! End-to-end tests: CSV export → normalized records → derived views
//!
//! Tests cover:
//! - Visited flag forms accepted from a sheet export
//! - Church identity across case/whitespace variants
//! - Deduplication keeps the latest visit per church
//! - Stage distribution with unknown stages
//! - Monthly totals for years without data
//! - Timeline ordering with undated visits

use chrono::{NaiveDate, NaiveDateTime};
use outreach_common::feed::parse_csv;
use outreach_common::visits::{
    dedupe, monthly_totals, normalize_rows, stage_distribution, timeline, DashboardViews, Stage,
    ViewOptions,
};

const EXPORT: &str = "\
Church,Address,Stage,Visit?,Visit Date,Visit Notes,Contact,Region
A,1 St,Visited,TRUE,2024-01-10,First stop,,East
A,1 St,Visited,TRUE,2024-03-01,Follow-up,,East
Grace,1 Main St,Navigation,true,5/1/2024,,Pastor Lee,West
GRACE, 1 main st ,Navigation, True ,1/1/2024,,,West
Grace,9 Oak Ave,Prospect,Yes,,,,West
Bethel,,Unknown Custom Stage,TRUE,,Walk-in,,North
,4 Elm St,,TRUE,2024-02-02,,,North
Hope,,Donated,FALSE,not a date,,,South
";

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 15)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_export_normalizes_every_row() {
    let rows = parse_csv(EXPORT).unwrap();
    let records = normalize_rows(&rows, None);

    assert_eq!(records.len(), 8);
    let visited: Vec<_> = records.iter().map(|r| r.visited()).collect();
    assert_eq!(
        visited,
        vec![true, true, true, true, false, true, true, false]
    );
    assert_eq!(records[7].visit_date(), None);
    assert_eq!(
        records[0].raw("Region").and_then(|v| v.as_trimmed_text()).as_deref(),
        Some("East")
    );
}

#[test]
fn test_dedupe_latest_visit_per_church() {
    let records = normalize_rows(&parse_csv(EXPORT).unwrap(), None);
    let churches = dedupe(&records);

    let summary: Vec<_> = churches
        .iter()
        .map(|r| (r.church().unwrap(), r.visit_date()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("A", Some(ymd(2024, 3, 1))),
            ("Bethel", None),
            ("Grace", Some(ymd(2024, 5, 1))),
        ]
    );
}

#[test]
fn test_stage_distribution_over_export() {
    let records = normalize_rows(&parse_csv(EXPORT).unwrap(), None);
    let buckets = stage_distribution(&records);

    let counts: Vec<_> = buckets.iter().map(|b| (b.stage.clone(), b.count)).collect();
    assert_eq!(
        counts,
        vec![
            (Stage::Prospect, 1),
            (Stage::Visited, 2),
            (Stage::Navigation, 2),
            (Stage::MeetingScheduled, 0),
            (Stage::Donated, 1),
        ]
    );
    // 2 of 8 records
    assert_eq!(buckets[1].conversion_rate, 25);
}

#[test]
fn test_monthly_totals_over_export() {
    let records = normalize_rows(&parse_csv(EXPORT).unwrap(), None);

    let months = monthly_totals(&records, 2024);
    let counts: Vec<_> = months.iter().map(|m| m.count).collect();
    assert_eq!(counts, vec![2, 1, 1, 0, 1, 0, 0, 0, 0, 0, 0, 0]);

    let empty_year = monthly_totals(&records, 2026);
    assert_eq!(empty_year.len(), 12);
    assert!(empty_year.iter().all(|m| m.count == 0));
}

#[test]
fn test_timeline_over_export() {
    let records = normalize_rows(&parse_csv(EXPORT).unwrap(), None);
    let result = timeline(&records, now());

    let dates: Vec<_> = result.entries.iter().map(|e| e.date).collect();
    assert_eq!(
        dates,
        vec![
            Some(ymd(2024, 5, 1)),
            Some(ymd(2024, 3, 1)),
            Some(ymd(2024, 2, 2)),
            Some(ymd(2024, 1, 10)),
            Some(ymd(2024, 1, 1)),
            None,
        ]
    );
    assert_eq!(result.totals.total, 6);
    assert_eq!(result.totals.unique_churches, 3);
    assert_eq!(result.totals.upcoming, 0);
}

#[test]
fn test_views_bundle_is_consistent() {
    let records = normalize_rows(&parse_csv(EXPORT).unwrap(), None);
    let views = DashboardViews::build(&records, now(), &ViewOptions::default(), None);

    assert_eq!(views.total_records, 8);
    assert_eq!(views.churches.len(), views.timeline.totals.unique_churches);
    assert_eq!(views.audit.visits_without_church.len(), 1);
    assert_eq!(views.contacts.stats.total, 1);
}

#[test]
fn test_pipeline_is_repeatable() {
    let rows = parse_csv(EXPORT).unwrap();
    let first = DashboardViews::build(&normalize_rows(&rows, None), now(), &ViewOptions::default(), None);
    let second = DashboardViews::build(&normalize_rows(&rows, None), now(), &ViewOptions::default(), None);
    assert_eq!(first, second);
}
