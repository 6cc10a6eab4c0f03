//! Navigation queries over the TOC of one version.
//!
//! Every query takes an optional version and falls back to the default
//! version's tree when it is absent or unknown.

use crate::error::CatalogError;
use crate::naming::Naming;
use crate::toc::{ArticleRef, Category, Section, TocSet};

/// Outcome of resolving a category page.
#[derive(Debug, PartialEq, Eq)]
pub enum CategoryView<'a> {
    /// The category has a single article; send the reader straight to it.
    Redirect { location: String, permanent: bool },
    /// The category lists two or more articles in tree order.
    Listing { category: &'a Category },
}

impl TocSet {
    /// Sections of a version's tree.
    #[must_use]
    pub fn sections(&self, version: Option<&str>) -> &[Section] {
        self.tree(version).sections()
    }

    /// Id of the first category listing the article.
    #[must_use]
    pub fn find_category(&self, article_id: &str, version: Option<&str>) -> Option<&str> {
        self.tree(version)
            .articles()
            .find(|(_, article)| article.id == article_id)
            .map(|(category, _)| category.id.as_str())
    }

    /// First TOC entry for an article.
    #[must_use]
    pub fn find_article(&self, article_id: &str, version: Option<&str>) -> Option<&ArticleRef> {
        self.tree(version)
            .articles()
            .find(|(_, article)| article.id == article_id)
            .map(|(_, article)| article)
    }

    /// Category by id.
    #[must_use]
    pub fn category(&self, category_id: &str, version: Option<&str>) -> Option<&Category> {
        self.tree(version)
            .categories()
            .find(|category| category.id == category_id)
    }

    /// SEO keywords for a page.
    ///
    /// Walks categories in tree order. A category whose id equals `category`
    /// contributes its title; an article whose id equals `article_id`
    /// contributes its title and keywords. The first match wins. Either way
    /// the result starts with `prefix`.
    #[must_use]
    pub fn find_keywords(
        &self,
        article_id: &str,
        category: Option<&str>,
        version: Option<&str>,
        prefix: &[String],
    ) -> Vec<String> {
        let mut keywords = prefix.to_vec();

        for cat in self.tree(version).categories() {
            if category == Some(cat.id.as_str()) {
                keywords.push(cat.title.clone());
                return keywords;
            }
            if let Some(article) = cat.articles.iter().find(|a| a.id == article_id) {
                keywords.push(article.title.clone());
                keywords.extend(article.keywords.iter().cloned());
                return keywords;
            }
        }

        keywords
    }

    /// Decide how a category page is served.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the category does not exist in
    /// the version or lists no articles.
    pub fn render_category(
        &self,
        category_id: &str,
        version: &str,
        naming: &Naming,
    ) -> Result<CategoryView<'_>, CatalogError> {
        let category = self
            .category(category_id, Some(version))
            .filter(|c| !c.articles.is_empty())
            .ok_or_else(|| CatalogError::NotFound(format!("category {category_id}")))?;

        match category.articles.as_slice() {
            [only] => Ok(CategoryView::Redirect {
                location: naming.article_url(&only.id, version),
                permanent: true,
            }),
            _ => Ok(CategoryView::Listing { category }),
        }
    }

    /// Article ids of a version in tree order.
    #[must_use]
    pub fn sitemap_articles(&self, version: Option<&str>) -> Vec<&str> {
        self.tree(version)
            .articles()
            .map(|(_, article)| article.id.as_str())
            .collect()
    }
}
