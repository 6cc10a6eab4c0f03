//! Table-of-contents trees.
//!
//! Each documentation version has one tree of sections, categories and
//! articles, defined in `toc.<language>.<version>.yaml`:
//!
//! ```yaml
//! - id: overview
//!   title: Overview
//!   categories:
//!     - id: getting-started
//!       title: Getting Started
//!       articles:
//!         - id: quickstart
//!           title: Quickstart Guide
//!           keywords: [install]
//! ```
//!
//! Trees are loaded once at startup and never change. Order is preserved as
//! written and drives navigation and sitemap order.

use std::collections::{BTreeMap, HashSet};

use docshelf_storage::Storage;
use serde::{Deserialize, Serialize};

use crate::error::StartupError;

/// Top-level grouping of categories.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Named grouping of articles within a section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub articles: Vec<ArticleRef>,
}

/// An article as listed in the TOC.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRef {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// The TOC of one version.
///
/// Article ids are unique within a tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocTree {
    version: String,
    sections: Vec<Section>,
}

impl TocTree {
    /// Build a tree, rejecting duplicate article ids.
    pub fn new(version: impl Into<String>, sections: Vec<Section>) -> Result<Self, StartupError> {
        let version = version.into();
        let mut seen = HashSet::new();
        for section in &sections {
            for category in &section.categories {
                for article in &category.articles {
                    if !seen.insert(article.id.as_str()) {
                        return Err(StartupError::DuplicateArticle {
                            version,
                            article: article.id.clone(),
                        });
                    }
                }
            }
        }

        Ok(Self { version, sections })
    }

    /// Parse a tree from its YAML definition.
    pub fn from_yaml(version: &str, path: &str, yaml: &str) -> Result<Self, StartupError> {
        let sections: Vec<Section> =
            serde_yaml::from_str(yaml).map_err(|source| StartupError::Toc {
                path: path.to_owned(),
                source,
            })?;
        Self::new(version, sections)
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// All categories in tree order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.sections.iter().flat_map(|s| s.categories.iter())
    }

    /// All articles in tree order, paired with their category.
    pub fn articles(&self) -> impl Iterator<Item = (&Category, &ArticleRef)> {
        self.categories()
            .flat_map(|c| c.articles.iter().map(move |a| (c, a)))
    }
}

/// TOC trees of every known version.
#[derive(Clone, Debug)]
pub struct TocSet {
    trees: BTreeMap<String, TocTree>,
    default_version: String,
}

impl TocSet {
    /// Assemble a set from trees.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::MissingDefaultToc`] if no tree exists for the
    /// default version.
    pub fn new(
        default_version: impl Into<String>,
        trees: impl IntoIterator<Item = TocTree>,
    ) -> Result<Self, StartupError> {
        let default_version = default_version.into();
        let trees: BTreeMap<_, _> = trees
            .into_iter()
            .map(|tree| (tree.version.clone(), tree))
            .collect();

        if !trees.contains_key(&default_version) {
            return Err(StartupError::MissingDefaultToc(default_version));
        }

        Ok(Self {
            trees,
            default_version,
        })
    }

    /// Load every `toc.<language>.<version>.yaml` in `toc_dir`.
    pub fn load(
        storage: &dyn Storage,
        toc_dir: &str,
        language: &str,
        default_version: &str,
    ) -> Result<Self, StartupError> {
        let prefix = format!("toc.{language}.");
        let toc_dir = toc_dir.trim_matches('/');
        let pattern = if toc_dir.is_empty() {
            format!("{prefix}*.yaml")
        } else {
            format!("{toc_dir}/{prefix}*.yaml")
        };

        let mut trees = Vec::new();
        for path in storage.glob(&pattern)? {
            let file_name = path.rsplit('/').next().unwrap_or(&path);
            let Some(version) = file_name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(".yaml"))
                .filter(|v| !v.is_empty())
            else {
                continue;
            };

            let yaml = storage.read(&path)?;
            let tree = TocTree::from_yaml(version, &path, &yaml)?;
            tracing::info!(
                version,
                articles = tree.articles().count(),
                "Loaded TOC"
            );
            trees.push(tree);
        }

        Self::new(default_version, trees)
    }

    /// Version used when none (or an unknown one) is requested.
    #[must_use]
    pub fn default_version(&self) -> &str {
        &self.default_version
    }

    /// Known versions, sorted.
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.trees.keys().map(String::as_str)
    }

    #[must_use]
    pub fn has_version(&self, version: &str) -> bool {
        self.trees.contains_key(version)
    }

    /// Tree for a version, falling back to the default version.
    #[must_use]
    pub fn tree(&self, version: Option<&str>) -> &TocTree {
        version
            .and_then(|v| self.trees.get(v))
            .unwrap_or_else(|| &self.trees[&self.default_version])
    }
}
