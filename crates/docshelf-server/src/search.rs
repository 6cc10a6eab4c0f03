//! External full-text search collaborator.
//!
//! Ranking lives in a separate index service; this module only forwards a
//! query with an offset window and pages through the results.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use ureq::Agent;

/// Results shown per search page.
pub(crate) const PAGE_SIZE: u64 = 10;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 10;

/// Error from the search service.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("Search request failed: {0}")]
    HttpRequest(#[from] ureq::Error),

    /// Service returned an error status.
    #[error("Search service error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },
}

/// One matching document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Article id.
    pub docid: String,
    #[serde(default)]
    pub title: String,
    /// Highlighted excerpt.
    #[serde(default)]
    pub snippet_text: String,
}

/// A window of search results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Total number of matches.
    pub matches: u64,
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

/// Full-text index consulted by `/search`.
pub trait SearchIndex: Send + Sync {
    /// Return up to `len` results starting at `start`.
    fn search(&self, query: &str, start: u64, len: u64) -> Result<SearchResults, SearchError>;
}

/// Index served over HTTP.
///
/// Calls `<api_url>/v1/indexes/<index>/search`. Blocking; run it on the
/// blocking pool.
pub struct HttpSearchIndex {
    agent: Agent,
    api_url: String,
    index: String,
}

impl HttpSearchIndex {
    #[must_use]
    pub fn new(api_url: &str, index: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            api_url: api_url.trim_end_matches('/').to_owned(),
            index: index.to_owned(),
        }
    }

    fn search_url(&self) -> String {
        format!("{}/v1/indexes/{}/search", self.api_url, self.index)
    }
}

impl SearchIndex for HttpSearchIndex {
    fn search(&self, query: &str, start: u64, len: u64) -> Result<SearchResults, SearchError> {
        tracing::debug!(query, start, len, "Querying search index");

        let response = self
            .agent
            .get(&self.search_url())
            .query("q", query)
            .query("start", start.to_string())
            .query("len", len.to_string())
            .query("fetch", "title")
            .query("snippet", "text")
            .header("Accept", "application/json")
            .call()?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let body = body
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(SearchError::HttpResponse { status, body });
        }

        Ok(body.read_json()?)
    }
}

/// One page of results with navigation.
#[derive(Debug, Serialize)]
pub(crate) struct SearchPage {
    pub(crate) query: String,
    pub(crate) page: u64,
    pub(crate) matches: u64,
    pub(crate) results: Vec<SearchHit>,
    pub(crate) prev_page: Option<u64>,
    pub(crate) next_page: Option<u64>,
}

impl SearchPage {
    /// Wrap results of the zero-based `page`.
    pub(crate) fn new(query: String, page: u64, results: SearchResults) -> Self {
        let next_page = page.checked_add(1).filter(|next| {
            next.checked_mul(PAGE_SIZE)
                .is_some_and(|seen| results.matches > seen)
        });
        let prev_page = page.checked_sub(1);

        Self {
            query,
            page,
            matches: results.matches,
            results: results.results,
            prev_page,
            next_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn results(matches: u64) -> SearchResults {
        SearchResults {
            matches,
            results: Vec::new(),
        }
    }

    #[test]
    fn test_first_page() {
        let page = SearchPage::new("buffer".to_owned(), 0, results(25));

        assert_eq!(page.prev_page, None);
        assert_eq!(page.next_page, Some(1));
    }

    #[test]
    fn test_middle_page() {
        let page = SearchPage::new("buffer".to_owned(), 1, results(25));

        assert_eq!(page.prev_page, Some(0));
        assert_eq!(page.next_page, Some(2));
    }

    #[test]
    fn test_last_page_exact_boundary() {
        let page = SearchPage::new("buffer".to_owned(), 1, results(20));

        assert_eq!(page.prev_page, Some(0));
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn test_huge_page_has_no_next() {
        let page = SearchPage::new("buffer".to_owned(), u64::MAX / PAGE_SIZE, results(25));
        assert_eq!(page.next_page, None);

        let page = SearchPage::new("buffer".to_owned(), u64::MAX, results(u64::MAX));
        assert_eq!(page.prev_page, Some(u64::MAX - 1));
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn test_results_deserialize() {
        let json = r#"{
            "matches": 2,
            "search_time": "0.004",
            "results": [
                {"docid": "quickstart", "title": "Quickstart", "snippet_text": "get <b>started</b>"},
                {"docid": "buffer"}
            ]
        }"#;

        let results: SearchResults = serde_json::from_str(json).unwrap();

        assert_eq!(results.matches, 2);
        assert_eq!(results.results[0].title, "Quickstart");
        assert_eq!(results.results[1].title, "");
    }

    #[test]
    fn test_search_url() {
        let index = HttpSearchIndex::new("http://search.local/", "td-docs");
        assert_eq!(
            index.search_url(),
            "http://search.local/v1/indexes/td-docs/search"
        );
    }
}
