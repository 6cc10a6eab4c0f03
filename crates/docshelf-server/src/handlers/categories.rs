//! Category pages.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use docshelf_catalog::CategoryView;
use serde::Serialize;

use crate::error::ServerError;
use crate::handlers::{cached_json, moved_permanently};
use crate::state::AppState;

/// Response for category listings.
#[derive(Serialize)]
struct CategoryResponse<'a> {
    id: &'a str,
    title: &'a str,
    version: &'a str,
    keywords: Vec<String>,
    articles: Vec<ArticleLink<'a>>,
}

/// Article entry of a listing.
#[derive(Serialize)]
struct ArticleLink<'a> {
    id: &'a str,
    title: &'a str,
    url: String,
}

/// Handle GET /categories/{category}.
pub(crate) async fn get_default_category(
    Path(category): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let naming = state.catalog.naming();
    moved_permanently(&naming.category_url(&category, naming.default_version()))
}

/// Handle GET /{prefix}/categories/{category}.
pub(crate) async fn get_category(
    Path((version, category)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let catalog = &state.catalog;

    match catalog.render_category(&category, &version)? {
        CategoryView::Redirect { location, .. } => Ok(moved_permanently(&location)),
        CategoryView::Listing { category: listing } => {
            let response = CategoryResponse {
                id: &listing.id,
                title: &listing.title,
                version: &version,
                keywords: catalog.find_keywords("", Some(&listing.id), Some(&version)),
                articles: listing
                    .articles
                    .iter()
                    .map(|article| ArticleLink {
                        id: &article.id,
                        title: &article.title,
                        url: catalog.naming().article_url(&article.id, &version),
                    })
                    .collect(),
            };
            cached_json(&state.version, &headers, &response)
        }
    }
}
