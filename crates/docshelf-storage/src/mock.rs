//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use glob::{MatchOptions, Pattern};

use crate::storage::{Storage, StorageError, StorageErrorKind};

/// Mock storage for testing.
///
/// Stores files in memory and counts reads per path, so callers can assert
/// on caching behavior.
///
/// # Example
///
/// ```ignore
/// use docshelf_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("docs/quickstart.txt", "# Quickstart\n\nHello.");
///
/// let content = storage.read("docs/quickstart.txt").unwrap();
/// assert_eq!(storage.read_count("docs/quickstart.txt"), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<BTreeMap<String, String>>,
    reads: RwLock<HashMap<String, usize>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with content.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), content.into());
        self
    }

    /// Number of `read` calls made for a path, successful or not.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn read_count(&self, path: &str) -> usize {
        self.reads.read().unwrap().get(path).copied().unwrap_or(0)
    }
}

impl Storage for MockStorage {
    fn read(&self, path: &str) -> Result<String, StorageError> {
        *self
            .reads
            .write()
            .unwrap()
            .entry(path.to_owned())
            .or_default() += 1;

        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path).with_backend("Mock"))
    }

    fn exists(&self, path: &str) -> bool {
        self.files.read().unwrap().contains_key(path)
    }

    fn glob(&self, pattern: &str) -> Result<Vec<String>, StorageError> {
        let pattern = Pattern::new(pattern).map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(pattern)
                .with_backend("Mock")
                .with_source(e)
        })?;
        let options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::new()
        };

        Ok(self
            .files
            .read()
            .unwrap()
            .keys()
            .filter(|path| pattern.matches_with(path, options))
            .cloned()
            .collect())
    }
}
