//! Visit data quality report
//!
//! Surfaces rows the per-church views silently drop: visits with no church
//! name, and churches whose visits were collapsed by deduplication.

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::dedup::name_sort_key;
use super::identity::{church_key, ChurchKey};
use super::normalize::VisitRecord;

/// A visited row that names no church
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrphanVisit {
    /// Zero-based data row index in the feed
    pub row: usize,
    pub date: Option<NaiveDate>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepeatVisits {
    pub key: ChurchKey,
    /// Name as first seen in the feed
    pub church: String,
    pub visits: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct VisitAudit {
    pub visit_rows: usize,
    pub unique_churches: usize,
    pub visits_without_church: Vec<OrphanVisit>,
    /// Most visits first, then by name
    pub churches_with_multiple_visits: Vec<RepeatVisits>,
}

pub fn audit(records: &[VisitRecord]) -> VisitAudit {
    let mut visit_rows = 0;
    let mut orphans = Vec::new();
    let mut groups: Vec<RepeatVisits> = Vec::new();
    let mut index: HashMap<ChurchKey, usize> = HashMap::new();

    for (row, record) in records.iter().enumerate().filter(|(_, r)| r.visited()) {
        visit_rows += 1;

        let Some(key) = church_key(record) else {
            orphans.push(OrphanVisit {
                row,
                date: record.visit_date(),
                address: record.address().map(str::to_string),
            });
            continue;
        };

        match index.get(&key) {
            Some(&slot) => groups[slot].visits += 1,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(RepeatVisits {
                    key,
                    church: record.church().unwrap_or_default().to_string(),
                    visits: 1,
                });
            }
        }
    }

    let unique_churches = groups.len();
    let mut repeats: Vec<RepeatVisits> = groups.into_iter().filter(|g| g.visits > 1).collect();
    repeats.sort_by_cached_key(|g| (Reverse(g.visits), name_sort_key(&g.church)));

    VisitAudit {
        visit_rows,
        unique_churches,
        visits_without_church: orphans,
        churches_with_multiple_visits: repeats,
    }
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
    fn test_audit_counts() {
        let input = records(vec![
            json!({ "Church": "Bethel", "Visit?": true }),
            json!({ "Church": "Agape", "Visit?": true }),
            json!({ "Church": "bethel", "Visit?": "TRUE" }),
            json!({ "Address": "3 Pine Rd", "Visit?": true, "Visit Date": "2024-02-02" }),
            json!({ "Church": "Agape", "Visit?": true }),
            json!({ "Church": "Bethel", "Visit?": true }),
            json!({ "Church": "Calvary", "Visit?": false }),
        ]);
        let report = audit(&input);

        assert_eq!(report.visit_rows, 6);
        assert_eq!(report.unique_churches, 2);
        assert_eq!(report.visits_without_church.len(), 1);
        assert_eq!(report.visits_without_church[0].row, 3);
        assert_eq!(
            report.visits_without_church[0].address.as_deref(),
            Some("3 Pine Rd")
        );

        let repeats: Vec<_> = report
            .churches_with_multiple_visits
            .iter()
            .map(|r| (r.church.as_str(), r.visits))
            .collect();
        assert_eq!(repeats, vec![("Bethel", 3), ("Agape", 2)]);
    }

    #[test]
    fn test_repeat_ties_sorted_by_folded_name() {
        let input = records(vec![
            json!({ "Church": "Zion", "Visit?": true }),
            json!({ "Church": "Zion", "Visit?": true }),
            json!({ "Church": "Église", "Visit?": true }),
            json!({ "Church": "Église", "Visit?": true }),
            json!({ "Church": "Faith", "Visit?": true }),
            json!({ "Church": "Faith", "Visit?": true }),
        ]);
        let names: Vec<_> = audit(&input)
            .churches_with_multiple_visits
            .into_iter()
            .map(|r| r.church)
            .collect();
        assert_eq!(names, vec!["Église", "Faith", "Zion"]);
    }

    #[test]
    fn test_audit_empty() {
        assert_eq!(audit(&[]), VisitAudit::default());
    }
}
