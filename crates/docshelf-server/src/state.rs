//! Application state.
//!
//! Shared state for all request handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use docshelf_catalog::Catalog;

use crate::search::SearchIndex;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Article and TOC catalog.
    pub(crate) catalog: Arc<Catalog>,
    /// External search index (`None` disables `/search`).
    pub(crate) search: Option<Arc<dyn SearchIndex>>,
    /// Legacy article redirects: article id to target URL.
    pub(crate) redirects: BTreeMap<String, String>,
    /// Absolute base URL for sitemap entries.
    pub(crate) base_url: String,
    /// Article the root URL redirects to.
    pub(crate) home_article: String,
    /// Application version for cache invalidation.
    pub(crate) version: String,
}
