//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for reading the resource namespace from a local
//! directory.

use std::fs;
use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::storage::{Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage rooted at a site directory.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use docshelf_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("site"));
/// let text = storage.read("docs/quickstart.txt")?;
/// ```
#[derive(Debug, Clone)]
pub struct FsStorage {
    /// Root directory of the resource namespace.
    root: PathBuf,
}

impl FsStorage {
    /// Create a new filesystem storage.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Root directory of this storage.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate that a path doesn't escape the root directory.
    ///
    /// Rejects absolute paths and paths containing parent directory
    /// components (`..`), e.g. `../../../etc/passwd`.
    fn validate_path(path: &str) -> Result<(), StorageError> {
        let escapes = Path::new(path)
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));

        if escapes {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    /// Convert an absolute match back to a `/`-separated storage path.
    fn to_storage_path(&self, full_path: &Path) -> Option<String> {
        let rel = full_path.strip_prefix(&self.root).ok()?;
        let segments: Vec<_> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(segments.join("/"))
    }
}

impl Storage for FsStorage {
    fn read(&self, path: &str) -> Result<String, StorageError> {
        Self::validate_path(path)?;
        let full_path = self.root.join(path);
        fs::read_to_string(&full_path)
            .map_err(|e| StorageError::io(e, Some(PathBuf::from(path))).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        Self::validate_path(path).is_ok() && self.root.join(path).is_file()
    }

    fn glob(&self, pattern: &str) -> Result<Vec<String>, StorageError> {
        Self::validate_path(pattern)?;

        let root = Pattern::escape(&self.root.to_string_lossy());
        let full_pattern = format!("{}/{pattern}", root.trim_end_matches('/'));
        let options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::new()
        };

        let entries = glob::glob_with(&full_pattern, options).map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(pattern)
                .with_backend(BACKEND)
                .with_source(e)
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let full_path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                StorageError::io(std::io::Error::from(e), Some(path)).with_backend(BACKEND)
            })?;
            if !full_path.is_file() {
                continue;
            }
            if let Some(path) = self.to_storage_path(&full_path) {
                paths.push(path);
            }
        }
        paths.sort();

        tracing::debug!(pattern, matches = paths.len(), "Globbed storage");
        Ok(paths)
    }
}
