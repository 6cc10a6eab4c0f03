//! Which languages each article is translated into.

use std::collections::{BTreeMap, BTreeSet};

use docshelf_storage::Storage;

use crate::error::StartupError;
use crate::naming::Naming;

/// Article id to the sorted set of languages it exists in.
///
/// Every known article includes the default language.
#[derive(Clone, Debug, Default)]
pub struct AvailabilityIndex {
    languages: BTreeMap<String, BTreeSet<String>>,
    default_language: String,
}

impl AvailabilityIndex {
    /// Scan the resource namespace.
    ///
    /// Known articles are `<root>/*.<ext>` and `<root>/<default_version>/*.<ext>`.
    /// Translations live in `<root>/<language>/<article>.<ext>`; directories
    /// named like versions are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::Storage`] if the namespace cannot be listed.
    pub fn build(storage: &dyn Storage, naming: &Naming) -> Result<Self, StartupError> {
        let root = naming.root();
        let ext = naming.extension();
        let default_language = naming.default_language().to_owned();

        let mut languages: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let flat = storage.glob(&format!("{root}/*.{ext}"))?;
        let versioned = storage.glob(&format!("{root}/{}/*.{ext}", naming.default_version()))?;
        for path in flat.iter().chain(&versioned) {
            if let Some(id) = file_name(path).and_then(|name| naming.article_id(name)) {
                languages
                    .entry(id.to_owned())
                    .or_default()
                    .insert(default_language.clone());
            }
        }

        for path in storage.glob(&format!("{root}/*/*.{ext}"))? {
            let mut segments = path.rsplit('/');
            let (Some(name), Some(dir)) = (segments.next(), segments.next()) else {
                continue;
            };
            if naming.is_version_segment(dir) {
                continue;
            }
            if let Some(langs) = naming.article_id(name).and_then(|id| languages.get_mut(id)) {
                langs.insert(dir.to_owned());
            }
        }

        tracing::info!(articles = languages.len(), "Built availability index");
        Ok(Self {
            languages,
            default_language,
        })
    }

    /// Languages an article is available in.
    ///
    /// Unknown articles report only the default language, so experimental
    /// articles outside the scanned layout still render.
    #[must_use]
    pub fn languages(&self, article_id: &str) -> Vec<String> {
        self.languages.get(article_id).map_or_else(
            || vec![self.default_language.clone()],
            |langs| langs.iter().cloned().collect(),
        )
    }

    /// True if the article has a translation in `language`.
    ///
    /// The default language is always available.
    #[must_use]
    pub fn is_available(&self, article_id: &str, language: &str) -> bool {
        language == self.default_language
            || self
                .languages
                .get(article_id)
                .is_some_and(|langs| langs.contains(language))
    }

    /// Number of known articles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

fn file_name(path: &str) -> Option<&str> {
    path.rsplit('/').next()
}

#[cfg(test)]
mod tests {
    use docshelf_storage::MockStorage;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::catalog::CatalogConfig;

    fn build(storage: &MockStorage) -> AvailabilityIndex {
        let naming = Naming::new(&CatalogConfig::default()).unwrap();
        AvailabilityIndex::build(storage, &naming).unwrap()
    }

    #[test]
    fn test_translations_detected() {
        let storage = MockStorage::new()
            .with_file("docs/quickstart.txt", "# Q")
            .with_file("docs/ja/quickstart.txt", "# Q")
            .with_file("docs/ko/quickstart.txt", "# Q")
            .with_file("docs/out_file.txt", "# O");

        let index = build(&storage);

        assert_eq!(index.languages("quickstart"), vec!["en", "ja", "ko"]);
        assert_eq!(index.languages("out_file"), vec!["en"]);
        assert!(index.is_available("quickstart", "ja"));
        assert!(!index.is_available("out_file", "ja"));
    }

    #[test]
    fn test_version_directories_skipped() {
        let storage = MockStorage::new()
            .with_file("docs/quickstart.txt", "# Q")
            .with_file("docs/v0.12/quickstart.txt", "# Q")
            .with_file("docs/v1/quickstart.txt", "# Q");

        assert_eq!(build(&storage).languages("quickstart"), vec!["en"]);
    }

    #[test]
    fn test_default_version_articles_known() {
        let storage = MockStorage::new()
            .with_file("docs/v0.12/buffer-section.txt", "# B")
            .with_file("docs/ja/buffer-section.txt", "# B");

        let index = build(&storage);
        assert_eq!(index.len(), 1);
        assert_eq!(index.languages("buffer-section"), vec!["en", "ja"]);
    }

    #[test]
    fn test_unknown_article_defaults() {
        let index = build(&MockStorage::new());

        assert!(index.is_empty());
        assert_eq!(index.languages("experimental"), vec!["en"]);
        assert!(index.is_available("experimental", "en"));
        assert!(!index.is_available("experimental", "ja"));
    }

    #[test]
    fn test_default_language_always_present() {
        let storage = MockStorage::new()
            .with_file("docs/a.txt", "")
            .with_file("docs/zh/a.txt", "")
            .with_file("docs/b.txt", "")
            .with_file("docs/v0.12/c.txt", "");

        let index = build(&storage);
        for article in ["a", "b", "c"] {
            assert!(index.languages(article).contains(&"en".to_owned()));
        }
    }
}
