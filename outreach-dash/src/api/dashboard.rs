//! Dashboard view endpoints
//!
//! Every handler reads the current snapshot once and answers from it; views
//! are never recomputed per request except for an explicitly requested
//! monthly year outside the configured set.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDateTime;
use outreach_common::visits::{
    monthly_series, ContactBook, MonthlySeries, StageBucket, TimelineTotals, VisitAudit,
    VisitEntry,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::pagination::{calculate_pagination, TIMELINE_PAGE_SIZE};
use crate::AppState;

const MIN_CHART_YEAR: i32 = 1900;
const MAX_CHART_YEAR: i32 = 2100;

#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub has_more: bool,
    pub entries: Vec<VisitEntry>,
    pub totals: TimelineTotals,
}

/// GET /api/timeline?page=N
pub async fn get_timeline(
    State(state): State<AppState>,
    Query(query): Query<TimelineQuery>,
) -> Json<TimelineResponse> {
    let snapshot = state.store.current().await;
    let timeline = &snapshot.views.timeline;

    let pagination = calculate_pagination(
        timeline.entries.len() as i64,
        query.page,
        TIMELINE_PAGE_SIZE,
    );
    let entries = timeline
        .window(pagination.offset as usize, pagination.page_size as usize)
        .to_vec();

    Json(TimelineResponse {
        page: pagination.page,
        page_size: pagination.page_size,
        total_pages: pagination.total_pages,
        has_more: pagination.has_more(),
        entries,
        totals: timeline.totals,
    })
}

#[derive(Debug, Serialize)]
pub struct StagesResponse {
    pub total_records: usize,
    pub total_churches: usize,
    pub stages: Vec<StageBucket>,
}

/// GET /api/stages
pub async fn get_stages(State(state): State<AppState>) -> Json<StagesResponse> {
    let snapshot = state.store.current().await;
    Json(StagesResponse {
        total_records: snapshot.views.total_records,
        total_churches: snapshot.views.churches.len(),
        stages: snapshot.views.stages.clone(),
    })
}

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    pub year: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct MonthlyResponse {
    pub series: Vec<MonthlySeries>,
}

/// GET /api/monthly[?year=YYYY]
///
/// Without a year, returns the configured chart years.
pub async fn get_monthly(
    State(state): State<AppState>,
    Query(query): Query<MonthlyQuery>,
) -> Result<Json<MonthlyResponse>, DashboardError> {
    let snapshot = state.store.current().await;

    let series = match query.year {
        None => snapshot.views.monthly.clone(),
        Some(year) if !(MIN_CHART_YEAR..=MAX_CHART_YEAR).contains(&year) => {
            return Err(DashboardError::InvalidYear(year));
        }
        Some(year) => match snapshot.views.monthly.iter().find(|s| s.year == year) {
            Some(cached) => vec![cached.clone()],
            None => monthly_series(
                &snapshot.records,
                &[year],
                state.view_options.monthly_scope,
            ),
        },
    };

    Ok(Json(MonthlyResponse { series }))
}

/// GET /api/contacts
pub async fn get_contacts(State(state): State<AppState>) -> Json<ContactBook> {
    let snapshot = state.store.current().await;
    Json(snapshot.views.contacts.clone())
}

/// GET /api/audit
pub async fn get_audit(State(state): State<AppState>) -> Json<VisitAudit> {
    let snapshot = state.store.current().await;
    Json(snapshot.views.audit.clone())
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub refresh_id: u64,
    pub started_at: Option<NaiveDateTime>,
    pub fetched_at: Option<NaiveDateTime>,
    pub fetch_error: Option<String>,
    pub record_count: usize,
    pub poll_interval_ms: u64,
    pub gate: bool,
}

/// GET /api/status
///
/// Public; the page polls this and reloads views when `refresh_id` moves.
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let snapshot = state.store.current().await;
    Json(StatusResponse {
        refresh_id: snapshot.refresh_id,
        started_at: snapshot.started_at,
        fetched_at: snapshot.fetched_at,
        fetch_error: snapshot.fetch_error.clone(),
        record_count: snapshot.records.len(),
        poll_interval_ms: state.poll_interval_ms,
        gate: state.gate.is_enabled(),
    })
}

#[derive(Debug)]
pub enum DashboardError {
    InvalidYear(i32),
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            DashboardError::InvalidYear(year) => (
                StatusCode::BAD_REQUEST,
                format!(
                    "Invalid year {}: expected {}..={}",
                    year, MIN_CHART_YEAR, MAX_CHART_YEAR
                ),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
