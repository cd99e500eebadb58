//! Visit and contact-status predicates
//!
//! Every consumer decides "was this church visited" through [`is_visited`].
//! Contact responsiveness is a different business question and has its own
//! predicate, [`ContactStatus::classify`].

use serde::Serialize;

use super::raw::RawValue;

/// Confirmed-visit flag from the raw `Visit?` cell
///
/// True only for boolean `true` or text equal to `TRUE` after trimming and
/// uppercasing. `"Yes"`, `1`, `false` and blanks are all false.
pub fn is_visited(value: &RawValue) -> bool {
    match value {
        RawValue::Bool(b) => *b,
        RawValue::Text(s) => s.trim().eq_ignore_ascii_case("TRUE"),
        _ => false,
    }
}

/// Follow-up state of a church contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContactStatus {
    /// Visit date cell still blank
    WaitingResponse,
    /// Visit flag reads `Yes`
    Responsive,
    FollowUpNeeded,
}

impl ContactStatus {
    /// Classify from whether the `Visit Date` cell holds anything and from
    /// the raw `Visit?` cell
    ///
    /// A date cell that is filled in but unparseable still counts as filled.
    /// `Yes` is matched verbatim after trimming; it is not accepted by
    /// [`is_visited`].
    pub fn classify(date_recorded: bool, visit_flag: &RawValue) -> Self {
        if !date_recorded {
            return ContactStatus::WaitingResponse;
        }
        match visit_flag {
            RawValue::Text(s) if s.trim() == "Yes" => ContactStatus::Responsive,
            _ => ContactStatus::FollowUpNeeded,
        }
    }

    /// Display label, e.g. `Follow Up Needed`
    pub fn label(&self) -> &'static str {
        match self {
            ContactStatus::WaitingResponse => "Waiting Response",
            ContactStatus::Responsive => "Responsive",
            ContactStatus::FollowUpNeeded => "Follow Up Needed",
        }
    }
}
