//! Current dashboard snapshot
//!
//! Each refresh computes a complete new [`Snapshot`] and swaps it in whole;
//! handlers hold an `Arc` to whichever snapshot was current when they ran.
//!
//! Refreshes may overlap. Every refresh takes a [`RefreshTicket`] before it
//! fetches, and a result is applied only if its ticket is newer than the
//! one behind the current snapshot: last write wins by start time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDateTime;
use outreach_common::feed::FetchError;
use outreach_common::time;
use outreach_common::visits::{DashboardViews, VisitRecord};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// One fully-derived view of the feed
#[derive(Debug, Default)]
pub struct Snapshot {
    /// Ticket id of the refresh that produced this snapshot; 0 = none yet
    pub refresh_id: u64,
    pub started_at: Option<NaiveDateTime>,
    pub fetched_at: Option<NaiveDateTime>,
    /// Fetch failure behind an empty snapshot, if any
    pub fetch_error: Option<String>,
    pub records: Vec<VisitRecord>,
    pub views: DashboardViews,
}

/// Start-order token for one refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    pub id: u64,
    pub started_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied { refresh_id: u64 },
    /// A refresh that started later has already been applied
    Stale { refresh_id: u64, current_id: u64 },
}

#[derive(Debug, Default)]
struct StoreInner {
    next_ticket: AtomicU64,
    current: RwLock<Arc<Snapshot>>,
}

/// Shared holder of the current snapshot
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    inner: Arc<StoreInner>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the ticket for a refresh that is about to fetch
    pub fn begin_refresh(&self) -> RefreshTicket {
        let id = self.inner.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        RefreshTicket {
            id,
            started_at: time::now(),
        }
    }

    /// Replace the current snapshot unless a newer refresh already landed
    pub async fn apply(
        &self,
        ticket: RefreshTicket,
        records: Vec<VisitRecord>,
        views: DashboardViews,
        fetch_error: Option<FetchError>,
    ) -> ApplyOutcome {
        let mut current = self.inner.current.write().await;

        if ticket.id <= current.refresh_id {
            debug!(
                refresh_id = ticket.id,
                current_id = current.refresh_id,
                "Discarding stale refresh result"
            );
            return ApplyOutcome::Stale {
                refresh_id: ticket.id,
                current_id: current.refresh_id,
            };
        }

        info!(
            refresh_id = ticket.id,
            records = records.len(),
            churches = views.churches.len(),
            "Applied dashboard snapshot"
        );

        *current = Arc::new(Snapshot {
            refresh_id: ticket.id,
            started_at: Some(ticket.started_at),
            fetched_at: Some(time::now()),
            fetch_error: fetch_error.map(|e| e.to_string()),
            records,
            views,
        });

        ApplyOutcome::Applied {
            refresh_id: ticket.id,
        }
    }

    pub async fn current(&self) -> Arc<Snapshot> {
        self.inner.current.read().await.clone()
    }
}
