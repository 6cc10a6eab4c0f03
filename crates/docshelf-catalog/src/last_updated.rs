//! Last-modified timestamps of articles, per language.
//!
//! Loaded once from a JSON snapshot produced at deploy time:
//!
//! ```json
//! { "en": { "quickstart": "2016-04-01T12:00:00Z" } }
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use docshelf_storage::Storage;

use crate::error::StartupError;

/// A translation this much older than the default-language article is outdated.
const OUTDATED_SPAN_DAYS: i64 = 30;

type Snapshot = HashMap<String, HashMap<String, DateTime<Utc>>>;

/// Language to article to last-updated timestamp.
#[derive(Clone, Debug, Default)]
pub struct LastUpdatedIndex {
    entries: Snapshot,
}

impl LastUpdatedIndex {
    /// Load the snapshot at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::MissingSnapshot`] if the file does not exist,
    /// [`StartupError::Snapshot`] for malformed JSON and
    /// [`StartupError::Storage`] for other read failures.
    pub fn load(storage: &dyn Storage, path: &str) -> Result<Self, StartupError> {
        let json = storage.read(path).map_err(|e| {
            if e.is_not_found() {
                StartupError::MissingSnapshot(path.to_owned())
            } else {
                e.into()
            }
        })?;
        let index = Self::from_json(path, &json)?;
        tracing::debug!(path, languages = index.entries.len(), "Loaded last-updated snapshot");
        Ok(index)
    }

    /// Parse a snapshot.
    pub fn from_json(path: &str, json: &str) -> Result<Self, StartupError> {
        let entries: Snapshot =
            serde_json::from_str(json).map_err(|source| StartupError::Snapshot {
                path: path.to_owned(),
                source,
            })?;
        Ok(Self { entries })
    }

    #[must_use]
    pub fn get(&self, language: &str, article_id: &str) -> Option<DateTime<Utc>> {
        self.entries.get(language)?.get(article_id).copied()
    }

    /// True if the translation lags the default-language article by more
    /// than 30 days.
    ///
    /// The default language itself is never outdated, and missing timestamps
    /// never mark an article outdated.
    #[must_use]
    pub fn is_outdated(&self, article_id: &str, language: &str, default_language: &str) -> bool {
        if language == default_language {
            return false;
        }
        match (
            self.get(language, article_id),
            self.get(default_language, article_id),
        ) {
            (Some(translated), Some(original)) => {
                original - translated > Duration::days(OUTDATED_SPAN_DAYS)
            }
            _ => false,
        }
    }
}
