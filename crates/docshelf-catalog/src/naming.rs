//! Naming conventions of the resource namespace and public URLs.
//!
//! Every string convention the catalog relies on lives here: which directory
//! names are versions, which version uses the flat legacy layout, and how
//! article ids map to canonical URLs.

use regex::Regex;

use crate::catalog::CatalogConfig;
use crate::error::StartupError;

/// Prefix shared by all recipe article ids.
const RECIPE_PREFIX: &str = "recipe-";

/// Separator between data source and data sink in recipe ids.
const RECIPE_SEPARATOR: &str = "-to-";

/// Naming conventions for one documentation site.
#[derive(Debug, Clone)]
pub struct Naming {
    root: String,
    extension: String,
    default_language: String,
    default_version: String,
    legacy_version: String,
    version_pattern: Regex,
}

impl Naming {
    /// Build naming conventions from catalog configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::InvalidVersionPattern`] if the version pattern
    /// is not a valid regex.
    pub fn new(config: &CatalogConfig) -> Result<Self, StartupError> {
        let version_pattern =
            Regex::new(&config.version_pattern).map_err(|source| {
                StartupError::InvalidVersionPattern {
                    pattern: config.version_pattern.clone(),
                    source,
                }
            })?;

        Ok(Self {
            root: config.root.trim_matches('/').to_owned(),
            extension: config.extension.clone(),
            default_language: config.default_language.clone(),
            default_version: config.default_version.clone(),
            legacy_version: config.legacy_version.clone(),
            version_pattern,
        })
    }

    /// Namespace root holding article files.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Article file extension without the dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Language served when none is requested.
    #[must_use]
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Version served when none is requested.
    #[must_use]
    pub fn default_version(&self) -> &str {
        &self.default_version
    }

    /// Version stored in the flat layout.
    #[must_use]
    pub fn legacy_version(&self) -> &str {
        &self.legacy_version
    }

    /// True if a directory name denotes a version folder.
    ///
    /// Version folders are never language folders, even when a language code
    /// would also match.
    #[must_use]
    pub fn is_version_segment(&self, name: &str) -> bool {
        self.version_pattern.is_match(name)
    }

    /// True if `version` uses the flat layout without a version segment.
    #[must_use]
    pub fn is_legacy_version(&self, version: &str) -> bool {
        version == self.legacy_version
    }

    #[must_use]
    pub fn is_default_language(&self, language: &str) -> bool {
        language == self.default_language
    }

    #[must_use]
    pub fn is_default_version(&self, version: &str) -> bool {
        version == self.default_version
    }

    /// File name of an article (`<id>.<ext>`).
    #[must_use]
    pub fn article_file(&self, article_id: &str) -> String {
        format!("{article_id}.{}", self.extension)
    }

    /// Article id from a file name, if it carries the article extension.
    #[must_use]
    pub fn article_id<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        file_name
            .strip_suffix(self.extension.as_str())?
            .strip_suffix('.')
            .filter(|id| !id.is_empty())
    }

    /// URL directory that article pages of `version` live under.
    #[must_use]
    pub fn article_base(&self, version: &str) -> String {
        if self.is_default_version(version) {
            "/articles".to_owned()
        } else {
            format!("/{version}/articles")
        }
    }

    /// Canonical URL of an article.
    ///
    /// Recipe ids (`recipe-<source>-to-<sink>`) map to `/recipe/<source>/<sink>`.
    /// Other ids map to `/articles/<id>` for the default version and
    /// `/<version>/articles/<id>` otherwise.
    #[must_use]
    pub fn article_url(&self, article_id: &str, version: &str) -> String {
        if let Some((source, sink)) = split_recipe(article_id) {
            return format!("/recipe/{source}/{sink}");
        }
        format!("{}/{article_id}", self.article_base(version))
    }

    /// Canonical URL of a category page.
    #[must_use]
    pub fn category_url(&self, category_id: &str, version: &str) -> String {
        format!("/{version}/categories/{category_id}")
    }
}

/// Article id for a recipe URL (`/recipe/<source>/<sink>`).
#[must_use]
pub fn recipe_article_id(source: &str, sink: &str) -> String {
    format!("{RECIPE_PREFIX}{source}{RECIPE_SEPARATOR}{sink}")
}

/// Split a recipe id into its data source and data sink.
fn split_recipe(article_id: &str) -> Option<(&str, &str)> {
    let (source, sink) = article_id
        .strip_prefix(RECIPE_PREFIX)?
        .split_once(RECIPE_SEPARATOR)?;
    (!source.is_empty() && !sink.is_empty()).then_some((source, sink))
}
