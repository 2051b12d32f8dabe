//! Cross-collection search endpoint.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use puspresma_common::AppResult;
use puspresma_core::SearchResults;
use serde::Deserialize;

use crate::{middleware::AppState, response::ApiResponse};

/// Create the search router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(search))
}

/// Search query.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search term.
    #[serde(default)]
    pub q: String,
    /// Restrict to one collection: `lomba`, `expo`, or `prestasi`.
    #[serde(rename = "type")]
    pub type_filter: Option<String>,
}

/// Search competitions, exhibitions, and achievements.
async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<ApiResponse<SearchResults>> {
    let results = state
        .search_service
        .search(&query.q, query.type_filter.as_deref())
        .await?;
    Ok(ApiResponse::ok(results))
}
