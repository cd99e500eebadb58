//! outreach-dash library - church outreach dashboard
//!
//! Serves the views derived from the shared visit sheet. A background poller
//! refreshes the [`snapshot::SnapshotStore`]; handlers only ever read it.

use std::sync::Arc;

use axum::Router;
use outreach_common::visits::ViewOptions;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod pagination;
pub mod poller;
pub mod sheets_client;
pub mod snapshot;

use api::SessionGate;
use snapshot::SnapshotStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: SnapshotStore,
    pub gate: Arc<SessionGate>,
    pub view_options: Arc<ViewOptions>,
    pub poll_interval_ms: u64,
}

impl AppState {
    pub fn new(
        store: SnapshotStore,
        gate: SessionGate,
        view_options: ViewOptions,
        poll_interval_ms: u64,
    ) -> Self {
        Self {
            store,
            gate: Arc::new(gate),
            view_options: Arc::new(view_options),
            poll_interval_ms,
        }
    }
}

/// Build application router
///
/// Dashboard views sit behind the session gate; the directory, status,
/// login and static page stay public.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    let protected = Router::new()
        .route("/api/timeline", get(api::get_timeline))
        .route("/api/stages", get(api::get_stages))
        .route("/api/monthly", get(api::get_monthly))
        .route("/api/contacts", get(api::get_contacts))
        .route("/api/audit", get(api::get_audit))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::session_middleware,
        ));

    let public = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/api/churches", get(api::list_churches))
        .route("/api/status", get(api::get_status))
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/api/session", get(api::session_status))
        .route("/api/login", post(api::login))
        .route("/api/logout", post(api::logout))
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
