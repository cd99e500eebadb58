//! Most-recent visited record per church
//!
//! A left-to-right fold over the feed in row order. For each [`ChurchKey`]
//! the first visited record seen becomes the representative; a later record
//! replaces it only when it carries a strictly later visit date (an absent
//! date counts as earliest and never replaces anything).

use std::collections::HashMap;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::identity::{church_key, ChurchKey};
use super::normalize::VisitRecord;

/// One representative record per visited church, A-Z by name
pub fn dedupe(records: &[VisitRecord]) -> Vec<VisitRecord> {
    dedupe_keyed(records)
        .into_iter()
        .map(|(_, record)| record.clone())
        .collect()
}

fn dedupe_keyed(records: &[VisitRecord]) -> Vec<(ChurchKey, &VisitRecord)> {
    let mut slots: Vec<(ChurchKey, &VisitRecord)> = Vec::new();
    let mut index: HashMap<ChurchKey, usize> = HashMap::new();

    for record in records.iter().filter(|r| r.visited()) {
        let Some(key) = church_key(record) else {
            continue;
        };

        match index.get(&key) {
            Some(&slot) => {
                if is_more_recent(record, slots[slot].1) {
                    slots[slot].1 = record;
                }
            }
            None => {
                index.insert(key.clone(), slots.len());
                slots.push((key, record));
            }
        }
    }

    slots.sort_by_cached_key(|(_, record)| name_sort_key(record.church().unwrap_or_default()));
    slots
}

fn is_more_recent(candidate: &VisitRecord, current: &VisitRecord) -> bool {
    match (candidate.visit_date(), current.visit_date()) {
        (Some(candidate), Some(current)) => candidate > current,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Directory sort key for a church name
///
/// Primary strength first: accents and case folded, so `Église` files
/// between `Bethel` and `Emmanuel`. The lowercase form breaks ties between
/// names that differ only in accents; remaining ties keep input order.
pub(crate) fn name_sort_key(name: &str) -> (String, String) {
    let folded = name
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    (folded, name.to_lowercase())
}
