//! Article pages.
//!
//! Returns parsed articles as JSON with their navigation and SEO metadata.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use docshelf_catalog::ArticlePage;
use serde::{Deserialize, Serialize};

use crate::error::ServerError;
use crate::handlers::{cached_json, moved_permanently};
use crate::state::AppState;

/// Query parameters of article pages.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ArticleQuery {
    /// Present after finishing a tutorial.
    congrats: Option<String>,
}

/// Response for article pages.
#[derive(Serialize)]
struct ArticleResponse {
    #[serde(flatten)]
    page: ArticlePage,
    congrats: bool,
}

/// Handle GET /.
pub(crate) async fn get_home(State(state): State<Arc<AppState>>) -> Response {
    moved_permanently(&format!("/articles/{}", state.home_article))
}

/// Handle GET /articles/{article}.
pub(crate) async fn get_article(
    Path(article): Path<String>,
    Query(query): Query<ArticleQuery>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    if let Some(target) = state.redirects.get(&article) {
        return Ok(moved_permanently(target));
    }
    render(&state, &article, None, &query, &headers)
}

/// Handle GET /{prefix}/articles/{article}.
///
/// A prefix that looks like a version selects that version. Anything else is
/// an old language URL and redirects to the default page.
pub(crate) async fn get_prefixed_article(
    Path((prefix, article)): Path<(String, String)>,
    Query(query): Query<ArticleQuery>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let catalog = &state.catalog;
    if catalog.has_version(&prefix) || catalog.naming().is_version_segment(&prefix) {
        return render(&state, &article, Some(&prefix), &query, &headers);
    }

    tracing::info!(article = %article, language = %prefix, "Redirecting language URL");
    Ok(moved_permanently(&format!("/articles/{article}")))
}

fn render(
    state: &AppState,
    article: &str,
    version: Option<&str>,
    query: &ArticleQuery,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    tracing::info!(article = %article, version, "Article requested");

    let page = state.catalog.render_article(article, None, version)?;
    let response = ArticleResponse {
        page,
        congrats: query.congrats.is_some(),
    };
    cached_json(&state.version, headers, &response)
}
