//! Article and TOC resolution engine.
//!
//! Resolves a logical article (id, language, version) to a file in the
//! resource namespace, parses it into title, description, intro, table of
//! contents and body, and answers navigation queries against the versioned
//! TOC trees.
//!
//! # Architecture
//!
//! - [`naming`] string conventions (version folders, URLs)
//! - [`resolve`] pure path resolution
//! - [`ResourceStore`] read-through content cache
//! - [`Article`] parsed article
//! - [`TocSet`] per-version TOC trees with navigation queries
//! - [`AvailabilityIndex`] and [`LastUpdatedIndex`] startup indexes
//! - [`Catalog`] the context owning all of the above
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use docshelf_catalog::{Catalog, CatalogConfig};
//! use docshelf_storage::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new("site".into()));
//! let catalog = Catalog::load(storage, CatalogConfig::default())?;
//! let page = catalog.render_article("quickstart", None, None)?;
//! ```

mod article;
mod availability;
mod catalog;
mod error;
mod last_updated;
pub mod naming;
mod navigation;
mod resolver;
mod store;
mod toc;

pub use article::{Article, ParseError, TocEntry};
pub use availability::AvailabilityIndex;
pub use catalog::{ArticlePage, Catalog, CatalogConfig};
pub use error::{CatalogError, StartupError};
pub use last_updated::LastUpdatedIndex;
pub use naming::{Naming, recipe_article_id};
pub use navigation::CategoryView;
pub use resolver::resolve;
pub use store::ResourceStore;
pub use toc::{ArticleRef, Category, Section, TocSet, TocTree};
