//! Visit record pipeline
//!
//! Raw feed rows flow through normalization into canonical
//! [`VisitRecord`]s, from which every dashboard view is derived:
//!
//! ```text
//! RawRow --normalize--> VisitRecord --+--> dedupe            (church directory)
//!                                     +--> stage_distribution
//!                                     +--> monthly_totals
//!                                     +--> timeline
//! ```
//!
//! Every function here is pure. Running the pipeline twice over the same
//! rows yields the same views.

pub mod aggregate;
pub mod audit;
pub mod contacts;
pub mod dedup;
pub mod directory;
pub mod identity;
pub mod normalize;
pub mod predicate;
pub mod raw;
pub mod timeline;
pub mod views;

pub use aggregate::{
    monthly_series, monthly_totals, monthly_totals_scoped, stage_distribution, MonthBucket,
    MonthlyScope, MonthlySeries, StageBucket,
};
pub use audit::{audit, VisitAudit};
pub use contacts::{contact_book, ContactBook, ContactStats, ContactSummary};
pub use dedup::dedupe;
pub use directory::{available_letters, DirectoryEntry, DirectoryFilter};
pub use identity::{church_key, ChurchKey};
pub use normalize::{normalize, normalize_rows, parse_visit_date, Stage, VisitRecord};
pub use predicate::{is_visited, ContactStatus};
pub use raw::{RawRow, RawValue};
pub use timeline::{timeline, Timeline, TimelineTotals, VisitEntry};
pub use views::{DashboardViews, ViewOptions};
