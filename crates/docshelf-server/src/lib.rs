//! HTTP server for Docshelf.
//!
//! Serves parsed articles, category listings, the sitemap and search results
//! as JSON over axum. All content comes from a [`Catalog`] built once at
//! startup; handlers share it through [`Arc`].
//!
//! # Quick Start
//!
//! ```ignore
//! use docshelf_config::Config;
//! use docshelf_server::{run_server, server_config_from_config};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load(None, None).unwrap();
//!     let server_config = server_config_from_config(&config, "1.0.0".to_owned()).unwrap();
//!     run_server(server_config).await.unwrap();
//! }
//! ```
//!
//! # Routes
//!
//! ```text
//! /                                  301 -> /articles/<home>
//! /robots.txt, /sitemap.xml          crawler endpoints
//! /search?q=&page=                   external search index
//! /categories/{category}             301 -> /<default version>/categories/{category}
//! /{version}/categories/{category}   listing, or 301 to the only article
//! /recipe/{source}/{sink}            301 -> /articles/recipe-<source>-to-<sink>
//! /articles/{article}                default version
//! /{version}/articles/{article}      older version
//! /{language}/articles/{article}     301 -> /articles/{article}
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod search;
mod state;

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use docshelf_catalog::{Catalog, CatalogConfig};
use docshelf_config::{Config, ConfigError, DocsConfig};
use docshelf_storage::{FsStorage, Storage};
pub use error::ServerError;
pub use search::{HttpSearchIndex, SearchError, SearchHit, SearchIndex, SearchResults};
use state::AppState;

/// Search service settings.
#[derive(Clone, Debug)]
pub struct SearchSettings {
    /// Base URL of the search API.
    pub api_url: String,
    /// Index name.
    pub index: String,
}

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory the resource namespace is read from.
    pub site_root: PathBuf,
    /// Catalog layout and naming conventions.
    pub catalog: CatalogConfig,
    /// Absolute base URL for sitemap entries.
    pub base_url: String,
    /// Article the root URL redirects to.
    pub home_article: String,
    /// Search service (`None` disables `/search`).
    pub search: Option<SearchSettings>,
    /// Legacy article redirects: article id to target URL.
    pub redirects: BTreeMap<String, String>,
    /// Application version (for cache invalidation).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            site_root: PathBuf::from("."),
            catalog: CatalogConfig::default(),
            base_url: "http://localhost:7979".to_owned(),
            home_article: "quickstart".to_owned(),
            search: None,
            redirects: BTreeMap::new(),
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// Builds the catalog from `site_root` before binding, so a broken site
/// fails fast.
///
/// # Errors
///
/// Returns an error if the catalog cannot be built or the server fails to
/// start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let storage: Arc<dyn Storage> = Arc::new(FsStorage::new(config.site_root.clone()));
    let catalog = Arc::new(Catalog::load(storage, config.catalog.clone())?);

    let search = config.search.as_ref().map(|s| {
        tracing::info!(api_url = %s.api_url, index = %s.index, "Search enabled");
        Arc::new(HttpSearchIndex::new(&s.api_url, &s.index)) as Arc<dyn SearchIndex>
    });

    let state = Arc::new(AppState {
        catalog,
        search,
        redirects: config.redirects.clone(),
        base_url: config.base_url.clone(),
        home_article: config.home_article.clone(),
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Catalog settings from the resolved `[docs]` section.
#[must_use]
pub fn catalog_config(docs: &DocsConfig) -> CatalogConfig {
    CatalogConfig {
        root: docs.root.clone(),
        extension: docs.extension.clone(),
        default_language: docs.default_language.clone(),
        default_version: docs.default_version.clone(),
        legacy_version: docs.legacy_version.clone(),
        version_pattern: docs.version_pattern.clone(),
        toc_dir: docs.toc_dir.clone(),
        last_updated: docs.last_updated.clone(),
        keywords: docs.keywords.clone(),
        warm_cache: docs.warm_cache,
    }
}

/// Create server configuration from Docshelf config.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] if the `[search]` section is invalid.
pub fn server_config_from_config(
    config: &Config,
    version: String,
) -> Result<ServerConfig, ConfigError> {
    let search = config.search()?.map(|s| SearchSettings {
        api_url: s.api_url.clone(),
        index: s.index.clone(),
    });

    Ok(ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        site_root: config.docs_resolved.site_root.clone(),
        catalog: catalog_config(&config.docs_resolved),
        base_url: config.site.base_url.clone(),
        home_article: config.site.home_article.clone(),
        search,
        redirects: config.redirects.clone(),
        version,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_catalog_config_from_docs() {
        let mut docs = DocsConfig::default();
        docs.default_version = "v1.0".to_owned();
        docs.warm_cache = false;

        let catalog = catalog_config(&docs);

        assert_eq!(catalog.default_version, "v1.0");
        assert_eq!(catalog.root, "docs");
        assert!(!catalog.warm_cache);
    }

    #[test]
    fn test_server_config_from_default_config() {
        let config = Config::default();

        let server = server_config_from_config(&config, "0.1.0".to_owned()).unwrap();

        assert_eq!(server.port, 7979);
        assert_eq!(server.home_article, "quickstart");
        assert!(server.search.is_none());
        assert_eq!(server.version, "0.1.0");
    }
}
