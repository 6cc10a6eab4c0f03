//! HTTP request handlers.

pub(crate) mod articles;
pub(crate) mod categories;
pub(crate) mod recipes;
pub(crate) mod search;
pub(crate) mod sitemap;

use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use md5::{Digest, Md5};
use serde::Serialize;

use crate::error::ServerError;

/// Cache lifetime of article and category pages (6 hours).
const CACHE_LONG: &str = "public, max-age=21600";

/// 301 redirect.
///
/// axum's `Redirect::permanent` answers 308; old links expect 301.
pub(crate) fn moved_permanently(location: &str) -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location.to_owned())],
    )
        .into_response()
}

/// JSON response with a long cache lifetime and a content `ETag`.
///
/// Answers 304 when `If-None-Match` carries the current `ETag`.
pub(crate) fn cached_json<T: Serialize>(
    version: &str,
    headers: &HeaderMap,
    value: &T,
) -> Result<Response, ServerError> {
    let body = serde_json::to_string(value)?;
    let etag = compute_etag(version, &body);

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok((
            StatusCode::NOT_MODIFIED,
            [
                (header::ETAG, etag),
                (header::CACHE_CONTROL, CACHE_LONG.to_owned()),
            ],
        )
            .into_response());
    }

    Ok((
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, CACHE_LONG.to_owned()),
            (header::CONTENT_TYPE, "application/json".to_owned()),
        ],
        body,
    )
        .into_response())
}

/// Compute `ETag` from version and content.
///
/// MD5 truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_compute_etag_includes_version() {
        assert_ne!(compute_etag("1.0.0", "content"), compute_etag("1.0.1", "content"));
    }

    #[test]
    fn test_compute_etag_format() {
        let etag = compute_etag("1.0.0", "content");

        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert_eq!(etag.len(), 18);
    }

    #[test]
    fn test_cached_json_headers() {
        let response = cached_json("1.0.0", &HeaderMap::new(), &["a", "b"]).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], CACHE_LONG);
        assert!(response.headers().contains_key(header::ETAG));
    }

    #[test]
    fn test_cached_json_not_modified() {
        let etag = compute_etag("1.0.0", r#"["a","b"]"#);
        let mut headers = HeaderMap::new();
        headers.insert(header::IF_NONE_MATCH, HeaderValue::from_str(&etag).unwrap());

        let response = cached_json("1.0.0", &headers, &["a", "b"]).unwrap();
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(response.headers()[header::ETAG], etag.as_str());
        assert_eq!(response.headers()[header::CACHE_CONTROL], CACHE_LONG);
    }

    #[test]
    fn test_moved_permanently() {
        let response = moved_permanently("/articles/quickstart");

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[header::LOCATION], "/articles/quickstart");
    }
}
