//! Church identity for deduplication

use std::fmt;

use serde::Serialize;

use super::normalize::VisitRecord;

/// Placeholder address segment for churches without an address
pub const NO_ADDRESS: &str = "no-address";

/// Case- and whitespace-insensitive `name|address` identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ChurchKey(String);

impl ChurchKey {
    /// Derive from a church name and optional address
    ///
    /// Returns `None` when the name is empty after trimming.
    pub fn derive(church: &str, address: Option<&str>) -> Option<Self> {
        let name = church.trim();
        if name.is_empty() {
            return None;
        }
        let address = address.unwrap_or(NO_ADDRESS).trim();
        Some(Self(format!(
            "{}|{}",
            name.to_lowercase(),
            address.to_lowercase()
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChurchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of the church a record refers to, if it names one
pub fn church_key(record: &VisitRecord) -> Option<ChurchKey> {
    ChurchKey::derive(record.church()?, record.address())
}
