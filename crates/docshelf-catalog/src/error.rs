//! Error types for catalog startup and request-time resolution.

use docshelf_storage::StorageError;

use crate::article::ParseError;

/// Failure while building the catalog at startup.
///
/// Always fatal: the process must not serve requests without a complete
/// catalog.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Version pattern does not compile.
    #[error("Invalid version pattern {pattern:?}: {source}")]
    InvalidVersionPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    /// TOC definition is not valid YAML for the expected shape.
    #[error("Invalid TOC definition {path}: {source}")]
    Toc {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    /// Article id listed twice in one version's TOC.
    #[error("Duplicate article {article:?} in TOC for {version}")]
    DuplicateArticle { version: String, article: String },
    /// No TOC exists for the default version.
    #[error("No TOC found for default version {0}")]
    MissingDefaultToc(String),
    /// Last-updated snapshot does not exist.
    #[error("Last-updated snapshot not found: {0}")]
    MissingSnapshot(String),
    /// Last-updated snapshot is malformed.
    #[error("Invalid last-updated snapshot {path}: {source}")]
    Snapshot {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// Resource namespace could not be read.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Failure while resolving a request against the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Article, category, or version does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
    /// Article source violates the authoring convention.
    #[error("Cannot parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ParseError,
    },
    /// Resource exists but could not be read.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CatalogError {
    /// True if the caller should present a "not found" outcome.
    ///
    /// Parse errors count as not found for users even though they are
    /// authoring defects.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Parse { .. })
    }
}
