//! Church contact follow-up summaries

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::normalize::VisitRecord;
use super::predicate::ContactStatus;

/// A recorded interaction with a contact
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interaction {
    pub kind: &'static str,
    pub date: Option<NaiveDate>,
    pub notes: String,
}

/// One named contact and where their follow-up stands
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactSummary {
    pub name: String,
    pub church: Option<String>,
    pub last_contact: Option<NaiveDate>,
    pub status: ContactStatus,
    /// Display form of `status`, e.g. `Follow Up Needed`
    pub status_label: &'static str,
    pub recent_interactions: Vec<Interaction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ContactStats {
    pub total: usize,
    pub responsive: usize,
    pub need_follow_up: usize,
    /// Last contact within the seven days before `now`
    pub new_this_week: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ContactBook {
    pub contacts: Vec<ContactSummary>,
    pub stats: ContactStats,
}

/// Summaries for every record that names a contact, in feed order
pub fn contact_book(records: &[VisitRecord], now: NaiveDateTime) -> ContactBook {
    let contacts: Vec<ContactSummary> = records
        .iter()
        .filter_map(|record| {
            let name = record.contact()?;
            let status = ContactStatus::classify(record.has_visit_date_cell(), record.visit_flag());
            Some(ContactSummary {
                name: name.to_string(),
                church: record.church().map(str::to_string),
                last_contact: record.visit_date(),
                status,
                status_label: status.label(),
                recent_interactions: record
                    .notes()
                    .map(|notes| Interaction {
                        kind: "visit",
                        date: record.visit_date(),
                        notes: notes.to_string(),
                    })
                    .into_iter()
                    .collect(),
            })
        })
        .collect();

    let week_ago = now
        .date()
        .checked_sub_days(Days::new(7))
        .unwrap_or(NaiveDate::MIN);
    let count = |status: ContactStatus| contacts.iter().filter(|c| c.status == status).count();

    let stats = ContactStats {
        total: contacts.len(),
        responsive: count(ContactStatus::Responsive),
        need_follow_up: count(ContactStatus::FollowUpNeeded),
        new_this_week: contacts
            .iter()
            .filter(|c| c.last_contact.is_some_and(|d| d >= week_ago))
            .count(),
    };

    ContactBook { contacts, stats }
}
