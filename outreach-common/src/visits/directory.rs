//! Searchable A-Z directory over deduplicated churches

use std::collections::BTreeSet;

use serde::Serialize;

use super::normalize::VisitRecord;

/// Uppercased first character of a church name
pub fn first_letter(name: &str) -> Option<char> {
    name.chars().next().and_then(|c| c.to_uppercase().next())
}

/// Directory filter; empty fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryFilter {
    /// Case-insensitive substring over name or address
    pub search: Option<String>,
    /// First letter of the church name
    pub letter: Option<char>,
}

impl DirectoryFilter {
    pub fn new(search: Option<&str>, letter: Option<&str>) -> Self {
        Self {
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase),
            letter: letter.and_then(first_letter),
        }
    }

    pub fn matches(&self, record: &VisitRecord) -> bool {
        let name = record.church().unwrap_or_default();

        let matches_search = match &self.search {
            None => true,
            Some(needle) => {
                name.to_lowercase().contains(needle.as_str())
                    || record
                        .address()
                        .is_some_and(|a| a.to_lowercase().contains(needle.as_str()))
            }
        };
        let matches_letter = self.letter.map_or(true, |l| first_letter(name) == Some(l));

        matches_search && matches_letter
    }

    /// Filter while keeping directory order
    pub fn apply<'a>(&self, churches: &'a [VisitRecord]) -> Vec<&'a VisitRecord> {
        churches.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Letters for which at least one church exists, sorted
pub fn available_letters(churches: &[VisitRecord]) -> Vec<char> {
    churches
        .iter()
        .filter_map(|r| r.church().and_then(first_letter))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Directory listing row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryEntry {
    pub church: String,
    pub address: Option<String>,
    pub stage: Option<String>,
    /// Most recent visit, if dated
    pub last_visited: Option<chrono::NaiveDate>,
}

impl From<&VisitRecord> for DirectoryEntry {
    fn from(record: &VisitRecord) -> Self {
        Self {
            church: record.church().unwrap_or_default().to_string(),
            address: record.address().map(str::to_string),
            stage: record.stage().map(|s| s.label().to_string()),
            last_visited: record.visit_date(),
        }
    }
}
