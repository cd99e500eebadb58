//! Feed polling loop
//!
//! Every poll interval: fetch the sheet, run the visit pipeline over the
//! result and hand the snapshot to the [`SnapshotStore`]. Each refresh runs
//! in its own task, so a slow fetch never delays the next poll; the store's
//! ticket check keeps a late, older result from overwriting a newer one.

use std::sync::Arc;
use std::time::Duration;

use outreach_common::diagnostics::TracingSink;
use outreach_common::feed::{fetch_or_empty, RowSource};
use outreach_common::time;
use outreach_common::visits::{normalize_rows, DashboardViews, ViewOptions};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::snapshot::{ApplyOutcome, SnapshotStore};

/// Run one fetch → pipeline → apply cycle
pub async fn refresh_once(
    source: &dyn RowSource,
    store: &SnapshotStore,
    options: &ViewOptions,
) -> ApplyOutcome {
    let ticket = store.begin_refresh();
    let sink = TracingSink;

    let (rows, fetch_error) = fetch_or_empty(source, Some(&sink)).await;
    let records = normalize_rows(&rows, Some(&sink));
    let views = DashboardViews::build(&records, time::now(), options, Some(&sink));

    store.apply(ticket, records, views, fetch_error).await
}

/// Poll `source` every `interval` until `shutdown` flips to `true`
///
/// The first refresh starts immediately.
pub fn spawn_poller(
    source: Arc<dyn RowSource>,
    store: SnapshotStore,
    options: ViewOptions,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            source = source.source_id(),
            interval_ms = interval.as_millis() as u64,
            "Starting feed poller"
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let source = Arc::clone(&source);
                    let store = store.clone();
                    let options = options.clone();
                    tokio::spawn(async move {
                        refresh_once(source.as_ref(), &store, &options).await;
                    });
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Stopping feed poller");
                        break;
                    }
                }
            }
        }
    })
}
