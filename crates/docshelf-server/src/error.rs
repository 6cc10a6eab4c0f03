//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use docshelf_catalog::CatalogError;
use serde_json::json;

use crate::search::SearchError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Article, category, or version does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Catalog could not serve the request.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Search is not configured.
    #[error("Search is disabled")]
    SearchDisabled,

    /// Search service failed.
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Response body could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Blocking task panicked or was cancelled.
    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::NotFound(what) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Not found", "path": what}),
            ),
            Self::Catalog(e) if e.is_not_found() => (
                StatusCode::NOT_FOUND,
                json!({"error": "Not found"}),
            ),
            Self::Catalog(e) => {
                tracing::error!(error = %e, "Catalog error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": e.to_string()}),
                )
            }
            Self::SearchDisabled => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({"error": "Search is disabled"}),
            ),
            Self::Search(e) => {
                tracing::error!(error = %e, "Search failed");
                (StatusCode::BAD_GATEWAY, json!({"error": e.to_string()}))
            }
            Self::Json(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": e.to_string()}),
            ),
            Self::Task(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": e.to_string()}),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_not_found_status() {
        let response = ServerError::NotFound("docs/missing.txt".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_catalog_not_found_status() {
        let error = ServerError::from(CatalogError::NotFound("version v9".to_owned()));
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_search_disabled_status() {
        assert_eq!(
            ServerError::SearchDisabled.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_search_failure_status() {
        let error = ServerError::from(SearchError::HttpResponse {
            status: 500,
            body: "boom".to_owned(),
        });
        assert_eq!(error.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
