//! Read-through cache of raw resource content.
//!
//! [`ResourceStore`] maps storage paths to their text. Entries are created on
//! first read (or by [`ResourceStore::warm`] at startup) and live until the
//! process exits: content is static until redeploy.
//!
//! # Thread Safety
//!
//! Lookups load an immutable snapshot of the map through [`ArcSwap`] and never
//! take a lock. A miss reads from storage and publishes a new snapshot with
//! `rcu`, so concurrent fills cannot corrupt the map. Two requests missing the
//! same path may both read it; the first insert wins and both return
//! identical content.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use docshelf_storage::{Storage, StorageError};

type Entries = HashMap<String, Arc<str>>;

/// Read-through content cache keyed by storage path.
pub struct ResourceStore {
    storage: Arc<dyn Storage>,
    entries: ArcSwap<Entries>,
}

impl ResourceStore {
    /// Create an empty store over a storage backend.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            entries: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// Get content for a path, reading and caching it on a miss.
    ///
    /// Failed reads are neither retried nor cached.
    ///
    /// # Errors
    ///
    /// Returns the storage error (`NotFound` for absent resources).
    pub fn get(&self, path: &str) -> Result<Arc<str>, StorageError> {
        if let Some(content) = self.entries.load().get(path) {
            return Ok(Arc::clone(content));
        }

        let content: Arc<str> = Arc::from(self.storage.read(path)?);
        self.entries.rcu(|current| {
            let mut next = Entries::clone(current);
            next.entry(path.to_owned())
                .or_insert_with(|| Arc::clone(&content));
            next
        });

        tracing::debug!(path, "Cached resource");
        Ok(content)
    }

    /// Eagerly load paths that are not cached yet.
    ///
    /// Unreadable paths are logged and skipped. Returns the number of newly
    /// cached entries.
    pub fn warm<I, S>(&self, paths: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cached = self.entries.load_full();
        let mut loaded = Vec::new();

        for path in paths {
            let path = path.as_ref();
            if cached.contains_key(path) {
                continue;
            }
            match self.storage.read(path) {
                Ok(content) => loaded.push((path.to_owned(), Arc::<str>::from(content))),
                Err(e) => tracing::warn!(path, error = %e, "Failed to warm resource"),
            }
        }

        if loaded.is_empty() {
            return 0;
        }

        let mut inserted = 0;
        self.entries.rcu(|current| {
            let mut next = Entries::clone(current);
            inserted = 0;
            for (path, content) in &loaded {
                if !next.contains_key(path) {
                    next.insert(path.clone(), Arc::clone(content));
                    inserted += 1;
                }
            }
            next
        });

        tracing::info!(entries = inserted, "Warmed resource store");
        inserted
    }

    /// True if the path is cached.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.load().contains_key(path)
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }
}
