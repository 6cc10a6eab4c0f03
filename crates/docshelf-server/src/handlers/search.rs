//! Search endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::error::ServerError;
use crate::search::{PAGE_SIZE, SearchPage};
use crate::state::AppState;

/// Query parameters of `/search`.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    q: String,
    /// Zero-based page number.
    #[serde(default)]
    page: u64,
}

/// Handle GET /search.
pub(crate) async fn get_search(
    Query(query): Query<SearchQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SearchPage>, ServerError> {
    let index = state.search.clone().ok_or(ServerError::SearchDisabled)?;
    let SearchQuery { q, page } = query;

    let start = page.saturating_mul(PAGE_SIZE);
    let (q, results) = tokio::task::spawn_blocking(move || {
        let results = index.search(&q, start, PAGE_SIZE);
        (q, results)
    })
    .await?;
    let results = results?;

    tracing::info!(query = %q, page, matches = results.matches, "Search");
    Ok(Json(SearchPage::new(q, page, results)))
}
