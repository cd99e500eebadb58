//! Timestamp and calendar utilities

use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime};

/// Get the current local wall-clock time
///
/// Visit dates in the feed carry no timezone, so comparisons against "now"
/// happen in local time.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Convert milliseconds to duration
pub fn millis_to_duration(millis: u64) -> std::time::Duration {
    std::time::Duration::from_millis(millis)
}

/// Sunday..=Saturday calendar week containing `date`
///
/// Returns `(week_start, week_end)`, both inclusive.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = u64::from(date.weekday().num_days_from_sunday());
    let start = date.checked_sub_days(Days::new(offset)).unwrap_or(NaiveDate::MIN);
    let end = start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
    (start, end)
}

/// True when `date` lies in the Sunday..=Saturday week containing `reference`
pub fn in_same_week(date: NaiveDate, reference: NaiveDate) -> bool {
    let (start, end) = week_bounds(reference);
    date >= start && date <= end
}
