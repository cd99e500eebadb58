//! Public church directory

use axum::{
    extract::{Query, State},
    Json,
};
use outreach_common::visits::{available_letters, DirectoryEntry, DirectoryFilter};
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ChurchQuery {
    pub search: Option<String>,
    pub letter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChurchListResponse {
    /// Unique visited churches before filtering
    pub total_churches: usize,
    /// Churches matching the filter
    pub count: usize,
    /// Initials present in the unfiltered list, for the letter bar
    pub letters: Vec<char>,
    pub churches: Vec<DirectoryEntry>,
}

/// GET /api/churches?search=&letter=
pub async fn list_churches(
    State(state): State<AppState>,
    Query(query): Query<ChurchQuery>,
) -> Json<ChurchListResponse> {
    let snapshot = state.store.current().await;
    let churches = &snapshot.views.churches;

    let filter = DirectoryFilter::new(query.search.as_deref(), query.letter.as_deref());
    let matched: Vec<DirectoryEntry> = filter
        .apply(churches)
        .into_iter()
        .map(DirectoryEntry::from)
        .collect();

    Json(ChurchListResponse {
        total_churches: churches.len(),
        count: matched.len(),
        letters: available_letters(churches),
        churches: matched,
    })
}
