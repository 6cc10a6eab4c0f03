//! The catalog context shared by request handlers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use docshelf_storage::Storage;
use serde::Serialize;

use crate::article::Article;
use crate::availability::AvailabilityIndex;
use crate::error::{CatalogError, StartupError};
use crate::last_updated::LastUpdatedIndex;
use crate::naming::Naming;
use crate::navigation::CategoryView;
use crate::resolver;
use crate::store::ResourceStore;
use crate::toc::TocSet;

/// Catalog settings, usually taken from the `[docs]` config section.
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    /// Namespace directory holding article files.
    pub root: String,
    /// Article file extension without the dot.
    pub extension: String,
    pub default_language: String,
    pub default_version: String,
    /// Version stored without a version directory.
    pub legacy_version: String,
    /// Regex matching version directory names.
    pub version_pattern: String,
    /// Directory holding `toc.<language>.<version>.yaml` files.
    pub toc_dir: String,
    /// Path of the last-updated JSON snapshot.
    pub last_updated: String,
    /// Keywords every page starts with.
    pub keywords: Vec<String>,
    /// Load all article files into memory at startup.
    pub warm_cache: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root: "docs".to_owned(),
            extension: "txt".to_owned(),
            default_language: "en".to_owned(),
            default_version: "v0.12".to_owned(),
            legacy_version: "v0.10".to_owned(),
            version_pattern: r"^v\d+".to_owned(),
            toc_dir: "toc".to_owned(),
            last_updated: "config/last_updated.json".to_owned(),
            keywords: vec!["Fluentd".to_owned(), "log collector".to_owned()],
            warm_cache: true,
        }
    }
}

/// Everything a page needs to render an article.
#[derive(Debug, Serialize)]
pub struct ArticlePage {
    #[serde(flatten)]
    pub article: Article,
    /// Language the article was resolved in.
    pub language: String,
    /// Languages the article is translated into.
    pub available_languages: Vec<String>,
    pub last_updated: Option<DateTime<Utc>>,
    /// Translation lags the default-language article.
    pub outdated: bool,
    /// Current (default) documentation version.
    pub current_version: String,
    /// Version the article was resolved in.
    pub article_version: String,
    /// URL of the article in the default version.
    pub default_url: String,
    /// Article also exists in the default version.
    pub has_default_version: bool,
    pub category: Option<String>,
    pub keywords: Vec<String>,
}

/// Immutable catalog plus the shared content cache.
///
/// Built once at startup; share it behind an [`Arc`].
pub struct Catalog {
    storage: Arc<dyn Storage>,
    naming: Naming,
    store: ResourceStore,
    tocs: TocSet,
    availability: AvailabilityIndex,
    last_updated: LastUpdatedIndex,
    keywords: Vec<String>,
}

impl Catalog {
    /// Build the catalog from the resource namespace.
    ///
    /// # Errors
    ///
    /// Any [`StartupError`] is fatal: TOC, availability scan, or snapshot
    /// failures leave no catalog to serve from.
    pub fn load(storage: Arc<dyn Storage>, config: CatalogConfig) -> Result<Self, StartupError> {
        let naming = Naming::new(&config)?;
        let tocs = TocSet::load(
            storage.as_ref(),
            &config.toc_dir,
            naming.default_language(),
            naming.default_version(),
        )?;
        let availability = AvailabilityIndex::build(storage.as_ref(), &naming)?;
        let last_updated = LastUpdatedIndex::load(storage.as_ref(), &config.last_updated)?;

        let store = ResourceStore::new(Arc::clone(&storage));
        if config.warm_cache {
            let root = naming.root();
            let ext = naming.extension();
            let mut paths = storage.glob(&format!("{root}/*.{ext}"))?;
            paths.extend(storage.glob(&format!("{root}/*/*.{ext}"))?);
            store.warm(paths);
        }

        tracing::info!(
            versions = tocs.versions().count(),
            default_version = tocs.default_version(),
            articles = availability.len(),
            cached = store.len(),
            "Catalog loaded"
        );

        Ok(Self {
            storage,
            naming,
            store,
            tocs,
            availability,
            last_updated,
            keywords: config.keywords,
        })
    }

    #[must_use]
    pub fn naming(&self) -> &Naming {
        &self.naming
    }

    #[must_use]
    pub fn tocs(&self) -> &TocSet {
        &self.tocs
    }

    #[must_use]
    pub fn availability(&self) -> &AvailabilityIndex {
        &self.availability
    }

    #[must_use]
    pub fn last_updated(&self) -> &LastUpdatedIndex {
        &self.last_updated
    }

    #[must_use]
    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    /// True if `version` has a TOC.
    #[must_use]
    pub fn has_version(&self, version: &str) -> bool {
        self.tocs.has_version(version)
    }

    /// Storage path of an article.
    #[must_use]
    pub fn resolve(&self, article_id: &str, language: &str, version: &str) -> String {
        resolver::resolve(&self.naming, article_id, language, version)
    }

    /// Resolve, read, and parse an article with its page metadata.
    ///
    /// Language and version default to the configured defaults.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] for unknown versions and missing files
    /// - [`CatalogError::Parse`] when the source has no title
    /// - [`CatalogError::Storage`] for other read failures
    pub fn render_article(
        &self,
        article_id: &str,
        language: Option<&str>,
        version: Option<&str>,
    ) -> Result<ArticlePage, CatalogError> {
        let language = language.unwrap_or(self.naming.default_language());
        let version = version.unwrap_or(self.naming.default_version());
        if !self.tocs.has_version(version) {
            return Err(CatalogError::NotFound(format!("version {version}")));
        }

        let path = self.resolve(article_id, language, version);
        let source = self.store.get(&path).map_err(|e| {
            if e.is_not_found() {
                CatalogError::NotFound(path.clone())
            } else {
                CatalogError::Storage(e)
            }
        })?;

        let doc_dir = self.naming.article_base(version);
        let article = Article::parse(article_id, &source, &doc_dir).map_err(|source| {
            tracing::error!(path, error = %source, "Malformed article");
            CatalogError::Parse {
                path: path.clone(),
                source,
            }
        })?;

        let default_version = self.naming.default_version();
        let default_path = self.resolve(article_id, language, default_version);
        let has_default_version =
            self.store.contains(&default_path) || self.storage.exists(&default_path);

        Ok(ArticlePage {
            article,
            language: language.to_owned(),
            available_languages: self.availability.languages(article_id),
            last_updated: self.last_updated.get(language, article_id),
            outdated: self.last_updated.is_outdated(
                article_id,
                language,
                self.naming.default_language(),
            ),
            current_version: default_version.to_owned(),
            article_version: version.to_owned(),
            default_url: self.naming.article_url(article_id, default_version),
            has_default_version,
            category: self
                .tocs
                .find_category(article_id, Some(version))
                .map(str::to_owned),
            keywords: self
                .tocs
                .find_keywords(article_id, None, Some(version), &self.keywords),
        })
    }

    /// Decide how a category page is served.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for unknown versions and for
    /// missing or empty categories.
    pub fn render_category(
        &self,
        category_id: &str,
        version: &str,
    ) -> Result<CategoryView<'_>, CatalogError> {
        if !self.tocs.has_version(version) {
            return Err(CatalogError::NotFound(format!("version {version}")));
        }
        self.tocs.render_category(category_id, version, &self.naming)
    }

    /// Article ids of a version in tree order.
    #[must_use]
    pub fn sitemap_articles(&self, version: Option<&str>) -> Vec<&str> {
        self.tocs.sitemap_articles(version)
    }

    #[must_use]
    pub fn find_category(&self, article_id: &str, version: Option<&str>) -> Option<&str> {
        self.tocs.find_category(article_id, version)
    }

    /// SEO keywords for a page, starting with the configured prefix.
    #[must_use]
    pub fn find_keywords(
        &self,
        article_id: &str,
        category: Option<&str>,
        version: Option<&str>,
    ) -> Vec<String> {
        self.tocs
            .find_keywords(article_id, category, version, &self.keywords)
    }
}

#[cfg(test)]
mod tests {
    use docshelf_storage::{FsStorage, MockStorage};
    use pretty_assertions::assert_eq;

    use super::*;

    const TOC_CURRENT: &str = "
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
          keywords: [architecture]
        - id: buffer
          title: Buffer
";

    const TOC_LEGACY: &str = "
- id: overview
  title: Overview
  categories:
    - id: getting-started
      title: Getting Started
      articles:
        - id: quickstart
          title: Quickstart Guide
";

    const QUICKSTART: &str = "# Quickstart Guide\n\nGet going fast.\n\n## Install\n\nSee [gem](install-by-gem).\n";

    fn storage() -> MockStorage {
        MockStorage::new()
            .with_file("toc/toc.en.v0.12.yaml", TOC_CURRENT)
            .with_file("toc/toc.en.v0.10.yaml", TOC_LEGACY)
            .with_file("docs/quickstart.txt", "# Quickstart (legacy)\n\nOld.\n")
            .with_file("docs/ja/quickstart.txt", "# クイックスタート\n\n古い。\n")
            .with_file("docs/v0.12/quickstart.txt", QUICKSTART)
            .with_file("docs/v0.12/fluentd-overview.txt", "# Fluentd Overview\n\nWhat it is.\n")
            .with_file("docs/v0.12/broken.txt", "No title here.\n")
            .with_file(
                "config/last_updated.json",
                r#"{"en": {"quickstart": "2016-06-01T00:00:00Z"},
                    "ja": {"quickstart": "2016-01-01T00:00:00Z"}}"#,
            )
    }

    fn catalog_with(storage: MockStorage, config: CatalogConfig) -> (Arc<MockStorage>, Catalog) {
        let storage = Arc::new(storage);
        let catalog = Catalog::load(Arc::clone(&storage) as Arc<dyn Storage>, config).unwrap();
        (storage, catalog)
    }

    fn catalog() -> Catalog {
        catalog_with(storage(), CatalogConfig::default()).1
    }

    #[test]
    fn test_render_article_defaults() {
        let page = catalog().render_article("quickstart", None, None).unwrap();

        assert_eq!(page.article.title, "Quickstart Guide");
        assert_eq!(page.article.description, "Get going fast.");
        assert!(page.article.body.contains(r#"href="/articles/install-by-gem""#));
        assert_eq!(page.language, "en");
        assert_eq!(page.article_version, "v0.12");
        assert_eq!(page.current_version, "v0.12");
        assert_eq!(page.default_url, "/articles/quickstart");
        assert!(page.has_default_version);
        assert_eq!(page.available_languages, vec!["en", "ja"]);
        assert_eq!(page.category.as_deref(), Some("getting-started"));
        assert_eq!(page.keywords, vec!["Fluentd", "log collector", "Quickstart Guide"]);
        assert!(!page.outdated);
    }

    #[test]
    fn test_render_article_legacy_translation() {
        let page = catalog()
            .render_article("quickstart", Some("ja"), Some("v0.10"))
            .unwrap();

        assert_eq!(page.article.title, "クイックスタート");
        assert_eq!(page.article_version, "v0.10");
        assert!(page.outdated);
        assert!(!page.has_default_version);
        assert!(page.last_updated.is_some());
    }

    #[test]
    fn test_render_article_unknown_version() {
        let err = catalog()
            .render_article("quickstart", None, Some("v9.9"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[test]
    fn test_render_article_missing() {
        let err = catalog().render_article("missing", None, None).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(ref p) if p == "docs/v0.12/missing.txt"));
    }

    #[test]
    fn test_render_article_parse_error() {
        let err = catalog().render_article("broken", None, None).unwrap_err();

        assert!(matches!(err, CatalogError::Parse { .. }));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_experimental_article_defaults_languages() {
        let storage = storage().with_file("drafts/new.txt", "# New\n\nDraft.\n");
        let (_, catalog) = catalog_with(storage, CatalogConfig::default());

        let page = catalog.render_article("drafts/new.txt", None, None).unwrap();
        assert_eq!(page.available_languages, vec!["en"]);
        assert_eq!(page.article.title, "New");
    }

    #[test]
    fn test_warm_cache_avoids_reads() {
        let (storage, catalog) = catalog_with(storage(), CatalogConfig::default());

        assert!(catalog.store().contains("docs/v0.12/quickstart.txt"));
        catalog.render_article("quickstart", None, None).unwrap();
        catalog.render_article("quickstart", None, None).unwrap();
        assert_eq!(storage.read_count("docs/v0.12/quickstart.txt"), 1);
    }

    #[test]
    fn test_lazy_cache_reads_once() {
        let config = CatalogConfig {
            warm_cache: false,
            ..CatalogConfig::default()
        };
        let (storage, catalog) = catalog_with(storage(), config);

        assert!(catalog.store().is_empty());
        catalog.render_article("quickstart", None, None).unwrap();
        catalog.render_article("quickstart", None, None).unwrap();
        assert_eq!(storage.read_count("docs/v0.12/quickstart.txt"), 1);
    }

    #[test]
    fn test_render_category() {
        let catalog = catalog();

        assert_eq!(
            catalog.render_category("getting-started", "v0.12").unwrap(),
            CategoryView::Redirect {
                location: "/articles/quickstart".to_owned(),
                permanent: true,
            }
        );
        assert!(matches!(
            catalog.render_category("concepts", "v0.12").unwrap(),
            CategoryView::Listing { .. }
        ));
        assert!(
            catalog
                .render_category("concepts", "v9")
                .unwrap_err()
                .is_not_found()
        );
    }

    #[test]
    fn test_find_keywords_for_category() {
        assert_eq!(
            catalog().find_keywords("fluentd-overview", Some("concepts"), Some("v0.12")),
            vec!["Fluentd", "log collector", "Concepts"]
        );
    }

    #[test]
    fn test_sitemap_and_lookup() {
        let catalog = catalog();

        assert_eq!(catalog.sitemap_articles(None), vec![
            "quickstart",
            "fluentd-overview",
            "buffer"
        ]);
        assert_eq!(catalog.find_category("buffer", None), Some("concepts"));
        assert!(catalog.has_version("v0.10"));
    }

    #[test]
    fn test_load_fails_without_default_toc() {
        let storage = MockStorage::new().with_file("toc/toc.en.v0.10.yaml", TOC_LEGACY);

        let result = Catalog::load(Arc::new(storage), CatalogConfig::default());
        assert!(matches!(result, Err(StartupError::MissingDefaultToc(_))));
    }

    #[test]
    fn test_load_fails_without_snapshot() {
        let storage = MockStorage::new()
            .with_file("toc/toc.en.v0.12.yaml", TOC_CURRENT)
            .with_file("docs/v0.12/quickstart.txt", QUICKSTART);

        let result = Catalog::load(Arc::new(storage), CatalogConfig::default());
        assert!(matches!(result, Err(StartupError::MissingSnapshot(_))));
    }

    #[test]
    fn test_load_from_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("toc")).unwrap();
        std::fs::create_dir_all(root.join("docs/v0.12")).unwrap();
        std::fs::create_dir_all(root.join("config")).unwrap();
        std::fs::write(root.join("toc/toc.en.v0.12.yaml"), TOC_CURRENT).unwrap();
        std::fs::write(root.join("docs/v0.12/quickstart.txt"), QUICKSTART).unwrap();
        std::fs::write(root.join("config/last_updated.json"), "{}").unwrap();

        let catalog = Catalog::load(
            Arc::new(FsStorage::new(root.to_path_buf())),
            CatalogConfig::default(),
        )
        .unwrap();

        let page = catalog.render_article("quickstart", None, None).unwrap();
        assert_eq!(page.article.title, "Quickstart Guide");
        assert_eq!(page.last_updated, None);
    }
}
