//! Article path resolution.
//!
//! Maps `(article id, language, version)` to a storage path:
//!
//! ```text
//! <root>/[<version>/][<language>/]<article>.<ext>
//! ```
//!
//! The version segment is omitted for the legacy version and the language
//! segment for the default language.

use crate::naming::Naming;

/// Resolve an article to its storage path.
///
/// Ids containing `/` are literal paths and are returned unchanged. Never
/// fails: malformed ids resolve to a path that does not exist.
#[must_use]
pub fn resolve(naming: &Naming, article_id: &str, language: &str, version: &str) -> String {
    if article_id.contains('/') {
        return article_id.to_owned();
    }

    let mut path = String::with_capacity(
        naming.root().len() + version.len() + language.len() + article_id.len() + 8,
    );
    path.push_str(naming.root());
    path.push('/');

    if !naming.is_legacy_version(version) {
        path.push_str(version);
        path.push('/');
    }

    if !naming.is_default_language(language) {
        path.push_str(language);
        path.push('/');
    }

    path.push_str(&naming.article_file(article_id));
    path
}
