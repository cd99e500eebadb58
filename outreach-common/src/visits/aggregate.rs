//! Stage distribution and monthly visit totals

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::normalize::{Stage, VisitRecord};

/// Count of records in one canonical stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageBucket {
    pub stage: Stage,
    pub count: usize,
    /// Percentage of all records, rounded to the nearest whole number
    pub conversion_rate: u32,
}

/// One bucket per canonical stage, always in canonical order
///
/// Records with no stage or an unrecognized stage count towards the total
/// used for rates but get no bucket of their own.
pub fn stage_distribution(records: &[VisitRecord]) -> Vec<StageBucket> {
    let total = records.len();

    Stage::CANONICAL
        .iter()
        .map(|stage| {
            let count = records
                .iter()
                .filter(|r| r.stage() == Some(stage))
                .count();
            StageBucket {
                stage: stage.clone(),
                count,
                conversion_rate: conversion_rate(count, total),
            }
        })
        .collect()
}

fn conversion_rate(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * count as f64 / total as f64).round() as u32
}

/// Which records feed the monthly totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthlyScope {
    /// Confirmed visits only
    #[default]
    VisitedOnly,
    /// Every record that has a visit date
    AllDated,
}

/// Visits in one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    pub year: i32,
    /// Zero-based month, 0 = January
    pub month: u32,
    pub count: usize,
}

/// Twelve buckets, January..December, counting confirmed visits in `year`
pub fn monthly_totals(records: &[VisitRecord], year: i32) -> Vec<MonthBucket> {
    monthly_totals_scoped(records, year, MonthlyScope::VisitedOnly)
}

/// Twelve buckets for `year` under an explicit record scope
pub fn monthly_totals_scoped(
    records: &[VisitRecord],
    year: i32,
    scope: MonthlyScope,
) -> Vec<MonthBucket> {
    let mut counts = [0usize; 12];

    for record in records {
        if scope == MonthlyScope::VisitedOnly && !record.visited() {
            continue;
        }
        if let Some(date) = record.visit_date().filter(|d| d.year() == year) {
            counts[date.month0() as usize] += 1;
        }
    }

    counts
        .iter()
        .enumerate()
        .map(|(month, &count)| MonthBucket {
            year,
            month: month as u32,
            count,
        })
        .collect()
}

/// Monthly buckets for one year, as charted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySeries {
    pub year: i32,
    pub total: usize,
    pub months: Vec<MonthBucket>,
}

/// One series per requested year, in the order given
pub fn monthly_series(
    records: &[VisitRecord],
    years: &[i32],
    scope: MonthlyScope,
) -> Vec<MonthlySeries> {
    years
        .iter()
        .map(|&year| {
            let months = monthly_totals_scoped(records, year, scope);
            MonthlySeries {
                year,
                total: months.iter().map(|m| m.count).sum(),
                months,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visits::normalize::normalize;
    use crate::visits::raw::RawRow;
    use serde_json::json;

    fn records(rows: Vec<serde_json::Value>) -> Vec<VisitRecord> {
        rows.into_iter()
            .map(|row| normalize(&RawRow::from_json(row)))
            .collect()
    }

    #[test]
    fn test_empty_distribution_is_all_zero() {
        let buckets = stage_distribution(&[]);
        assert_eq!(buckets.len(), 5);
        assert!(buckets.iter().all(|b| b.count == 0 && b.conversion_rate == 0));
    }

    #[test]
    fn test_distribution_order_is_fixed() {
        let input = records(vec![
            json!({ "Stage": "Donated" }),
            json!({ "Stage": "Prospect" }),
        ]);
        let stages: Vec<_> = stage_distribution(&input)
            .into_iter()
            .map(|b| b.stage)
            .collect();
        assert_eq!(stages, Stage::CANONICAL.to_vec());
    }

    #[test]
    fn test_distribution_counts_and_rates() {
        let input = records(vec![
            json!({ "Stage": "Prospect" }),
            json!({ "Stage": "Prospect" }),
            json!({ "Stage": "Visited" }),
        ]);
        let buckets = stage_distribution(&input);
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[0].conversion_rate, 67);
        assert_eq!(buckets[1].count, 1);
        assert_eq!(buckets[1].conversion_rate, 33);
        assert_eq!(buckets[4].count, 0);
    }

    #[test]
    fn test_unknown_stage_counts_in_total_only() {
        let input = records(vec![
            json!({ "Stage": "Unknown Custom Stage" }),
            json!({ "Stage": "Navigation" }),
            json!({}),
            json!({ "Stage": "Navigation" }),
        ]);
        let buckets = stage_distribution(&input);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), 2);
        assert_eq!(buckets[2].count, 2);
        assert_eq!(buckets[2].conversion_rate, 50);
    }

    #[test]
    fn test_rate_rounds_half_up() {
        // 1 of 8 = 12.5%
        let mut rows = vec![json!({ "Stage": "Donated" })];
        rows.extend((0..7).map(|_| json!({})));
        let buckets = stage_distribution(&records(rows));
        assert_eq!(buckets[4].conversion_rate, 13);
    }

    #[test]
    fn test_monthly_totals_visited_only() {
        let input = records(vec![
            json!({ "Visit?": true, "Visit Date": "2024-01-10" }),
            json!({ "Visit?": "TRUE", "Visit Date": "2024-01-20" }),
            json!({ "Visit?": true, "Visit Date": "2024-12-31" }),
            json!({ "Visit?": false, "Visit Date": "2024-01-15" }),
            json!({ "Visit?": true, "Visit Date": "2023-01-15" }),
            json!({ "Visit?": true }),
        ]);
        let months = monthly_totals(&input, 2024);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].count, 2);
        assert_eq!(months[11].count, 1);
        assert_eq!(months.iter().map(|m| m.count).sum::<usize>(), 3);
        assert!(months.iter().enumerate().all(|(i, m)| m.month == i as u32 && m.year == 2024));
    }

    #[test]
    fn test_monthly_totals_all_dated_scope() {
        let input = records(vec![
            json!({ "Visit?": true, "Visit Date": "2024-01-10" }),
            json!({ "Visit?": false, "Visit Date": "2024-01-15" }),
        ]);
        let months = monthly_totals_scoped(&input, 2024, MonthlyScope::AllDated);
        assert_eq!(months[0].count, 2);
    }

    #[test]
    fn test_monthly_totals_year_without_data() {
        let input = records(vec![json!({ "Visit?": true, "Visit Date": "2024-05-01" })]);
        let months = monthly_totals(&input, 2026);
        assert_eq!(months.len(), 12);
        assert!(months.iter().all(|m| m.count == 0));
    }

    #[test]
    fn test_monthly_series_per_year() {
        let input = records(vec![
            json!({ "Visit?": true, "Visit Date": "2024-05-01" }),
            json!({ "Visit?": true, "Visit Date": "2025-05-01" }),
            json!({ "Visit?": true, "Visit Date": "2025-06-01" }),
        ]);
        let series = monthly_series(&input, &[2024, 2025], MonthlyScope::VisitedOnly);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].year, 2024);
        assert_eq!(series[0].total, 1);
        assert_eq!(series[1].total, 2);
        assert_eq!(series[1].months[5].count, 1);
    }

    #[test]
    fn test_scope_deserializes_snake_case() {
        let scope: MonthlyScope = serde_json::from_str("\"all_dated\"").unwrap();
        assert_eq!(scope, MonthlyScope::AllDated);
    }
}
