//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers::{articles, categories, recipes, search, sitemap};
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// Static segments take precedence over `{prefix}`, so `/articles/...` and
/// `/categories/...` never reach the prefixed handlers.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(articles::get_home))
        .route("/robots.txt", get(sitemap::get_robots))
        .route("/sitemap.xml", get(sitemap::get_sitemap))
        .route("/search", get(search::get_search))
        .route("/categories/{category}", get(categories::get_default_category))
        .route("/{prefix}/categories/{category}", get(categories::get_category))
        .route("/recipe/apache/{sink}", get(recipes::get_apache_recipe))
        .route("/recipe/{source}/{sink}", get(recipes::get_recipe))
        .route("/articles/{article}", get(articles::get_article))
        .route("/{prefix}/articles/{article}", get(articles::get_prefixed_article))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer())
                .layer(security::referrer_policy_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use docshelf_catalog::{Catalog, CatalogConfig};
    use docshelf_storage::{MockStorage, Storage};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;
    use crate::search::{SearchError, SearchHit, SearchIndex, SearchResults};

    const TOC: &str = "
- id: overview
  title: Overview
  categories:
    - id: getting-started
      title: Getting Started
      articles:
        - id: quickstart
          title: Quickstart Guide
    - id: concepts
      title: Concepts
      articles:
        - id: fluentd-overview
          title: Fluentd Overview
        - id: buffer
          title: Buffer
";

    struct FixedIndex;

    impl SearchIndex for FixedIndex {
        fn search(&self, query: &str, start: u64, _len: u64) -> Result<SearchResults, SearchError> {
            Ok(SearchResults {
                matches: 25,
                results: vec![SearchHit {
                    docid: format!("{query}-{start}"),
                    title: "Hit".to_owned(),
                    snippet_text: String::new(),
                }],
            })
        }
    }

    fn router(search: Option<Arc<dyn SearchIndex>>) -> Router {
        let storage: Arc<dyn Storage> = Arc::new(
            MockStorage::new()
                .with_file("toc/toc.en.v0.12.yaml", TOC)
                .with_file("toc/toc.en.v0.10.yaml", TOC)
                .with_file("docs/v0.12/quickstart.txt", "# Quickstart Guide\n\nHello.\n\n## Install\n")
                .with_file("docs/quickstart.txt", "# Old Quickstart\n\nLegacy.\n")
                .with_file("docs/v0.12/broken.txt", "no title\n")
                .with_file("config/last_updated.json", "{}"),
        );
        let catalog = Catalog::load(storage, CatalogConfig::default()).unwrap();

        let mut redirects = BTreeMap::new();
        redirects.insert(
            "architecture".to_owned(),
            "http://www.fluentd.org/architecture".to_owned(),
        );

        create_router(Arc::new(AppState {
            catalog: Arc::new(catalog),
            search,
            redirects,
            base_url: "https://docs.example.com".to_owned(),
            home_article: "quickstart".to_owned(),
            version: "test".to_owned(),
        }))
    }

    async fn get(router: Router, uri: &str) -> Response {
        router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_str(&body_string(response).await).unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_home_redirects() {
        let response = get(router(None), "/").await;

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(location(&response), "/articles/quickstart");
    }

    #[tokio::test]
    async fn test_article_default_version() {
        let response = get(router(None), "/articles/quickstart").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=21600"
        );
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");

        let json = body_json(response).await;
        assert_eq!(json["title"], "Quickstart Guide");
        assert_eq!(json["article_version"], "v0.12");
        assert_eq!(json["category"], "getting-started");
        assert_eq!(json["congrats"], false);
        assert_eq!(json["toc"][0]["anchor"], "install");
    }

    #[tokio::test]
    async fn test_article_congrats_flag() {
        let json = body_json(get(router(None), "/articles/quickstart?congrats=1").await).await;
        assert_eq!(json["congrats"], true);
    }

    #[tokio::test]
    async fn test_article_etag_not_modified() {
        let router = router(None);
        let first = get(router.clone(), "/articles/quickstart").await;
        let etag = first.headers()[header::ETAG].clone();

        let response = router
            .oneshot(
                Request::get("/articles/quickstart")
                    .header(header::IF_NONE_MATCH, etag)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_article_missing_is_404() {
        let response = get(router(None), "/articles/missing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_article_parse_error_is_404() {
        let response = get(router(None), "/articles/broken").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_legacy_redirect_wins() {
        let response = get(router(None), "/articles/architecture").await;

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(location(&response), "http://www.fluentd.org/architecture");
    }

    #[tokio::test]
    async fn test_versioned_article() {
        let response = get(router(None), "/v0.10/articles/quickstart").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["title"], "Old Quickstart");
        assert_eq!(json["article_version"], "v0.10");
    }

    #[tokio::test]
    async fn test_unknown_version_is_404() {
        let response = get(router(None), "/v9/articles/quickstart").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_language_url_redirects() {
        let response = get(router(None), "/ja/articles/quickstart").await;

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(location(&response), "/articles/quickstart");
    }

    #[tokio::test]
    async fn test_category_default_redirect() {
        let response = get(router(None), "/categories/concepts").await;

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(location(&response), "/v0.12/categories/concepts");
    }

    #[tokio::test]
    async fn test_single_article_category_redirects() {
        let response = get(router(None), "/v0.12/categories/getting-started").await;

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(location(&response), "/articles/quickstart");
    }

    #[tokio::test]
    async fn test_category_listing() {
        let response = get(router(None), "/v0.10/categories/concepts").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["title"], "Concepts");
        assert_eq!(json["articles"][0]["url"], "/v0.10/articles/fluentd-overview");
        assert_eq!(json["articles"][1]["id"], "buffer");
        assert_eq!(json["keywords"][2], "Concepts");
    }

    #[tokio::test]
    async fn test_category_missing_is_404() {
        let response = get(router(None), "/v0.12/categories/missing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_recipe_redirects() {
        let response = get(router(None), "/recipe/apache/s3").await;
        assert_eq!(location(&response), "/recipe/apache-logs/s3");

        let response = get(router(None), "/recipe/apache-logs/s3").await;
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(location(&response), "/articles/recipe-apache-logs-to-s3");
    }

    #[tokio::test]
    async fn test_robots() {
        let body = body_string(get(router(None), "/robots.txt").await).await;
        assert_eq!(body, "User-agent: *\nSitemap: /sitemap.xml\n");
    }

    #[tokio::test]
    async fn test_sitemap_lists_default_version() {
        let response = get(router(None), "/sitemap.xml").await;

        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/xml");
        let body = body_string(response).await;
        let quickstart = body
            .find("https://docs.example.com/articles/quickstart")
            .unwrap();
        let buffer = body.find("https://docs.example.com/articles/buffer").unwrap();
        assert!(quickstart < buffer);
    }

    #[tokio::test]
    async fn test_search_disabled() {
        let response = get(router(None), "/search?q=buffer").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_search_pages() {
        let response = get(router(Some(Arc::new(FixedIndex))), "/search?q=buffer&page=1").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["results"][0]["docid"], "buffer-10");
        assert_eq!(json["prev_page"], 0);
        assert_eq!(json["next_page"], 2);
    }

    #[tokio::test]
    async fn test_search_huge_page() {
        let response = get(
            router(Some(Arc::new(FixedIndex))),
            "/search?q=buffer&page=1844674407370955161",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["page"], 1_844_674_407_370_955_161_u64);
        assert!(json["next_page"].is_null());
    }
}
