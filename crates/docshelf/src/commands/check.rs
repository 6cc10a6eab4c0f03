//! `docshelf check` command implementation.
//!
//! Loads the catalog exactly as the server would, then renders every article
//! listed in every TOC so broken or missing files surface before deploy.

use clap::Args;
use docshelf_catalog::Catalog;
use docshelf_config::CliSettings;

use super::{ConfigArgs, load_catalog};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    config: ConfigArgs,
}

/// An article listed in a TOC that cannot be rendered.
#[derive(Debug, PartialEq, Eq)]
struct Failure {
    version: String,
    article: String,
    reason: String,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be built or any listed article
    /// fails to render.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.config.load(CliSettings {
            warm_cache: Some(false),
            ..CliSettings::default()
        })?;
        let catalog = load_catalog(&config)?;

        output.heading(format_args!(
            "Catalog at {}",
            config.docs_resolved.site_root.display()
        ));
        for version in catalog.tocs().versions() {
            output.field(
                version,
                format_args!("{} articles", catalog.sitemap_articles(Some(version)).len()),
            );
        }
        output.field("translated", catalog.availability().len());

        let failures = check_articles(&catalog);
        if failures.is_empty() {
            output.passed("All listed articles render");
            return Ok(());
        }

        for failure in &failures {
            output.failed(format_args!(
                "  {}/{}: {}",
                failure.version, failure.article, failure.reason
            ));
        }
        Err(CliError::Validation(format!(
            "{} listed articles failed to render",
            failures.len()
        )))
    }
}

/// Render every TOC article of every version in the default language.
fn check_articles(catalog: &Catalog) -> Vec<Failure> {
    let mut failures = Vec::new();
    for version in catalog.tocs().versions() {
        tracing::debug!(version, "Checking articles");
        for article in catalog.sitemap_articles(Some(version)) {
            if let Err(e) = catalog.render_article(article, None, Some(version)) {
                tracing::warn!(version, article, error = %e, "Article failed to render");
                failures.push(Failure {
                    version: version.to_owned(),
                    article: article.to_owned(),
                    reason: e.to_string(),
                });
            }
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use docshelf_catalog::CatalogConfig;
    use docshelf_storage::{FsStorage, Storage};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_check_reports_missing_and_broken() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        std::fs::create_dir_all(dir.join("toc")).unwrap();
        std::fs::create_dir_all(dir.join("docs/v0.12")).unwrap();
        std::fs::create_dir_all(dir.join("config")).unwrap();
        std::fs::write(dir.join("config/last_updated.json"), "{}").unwrap();
        std::fs::write(
            dir.join("toc/toc.en.v0.12.yaml"),
            "- id: s\n  title: S\n  categories:\n    - id: c\n      title: C\n      articles:\n        - { id: ok, title: Ok }\n        - { id: broken, title: Broken }\n        - { id: missing, title: Missing }\n",
        )
        .unwrap();
        std::fs::write(dir.join("docs/v0.12/ok.txt"), "# Ok\n").unwrap();
        std::fs::write(dir.join("docs/v0.12/broken.txt"), "no title\n").unwrap();

        let storage: Arc<dyn Storage> = Arc::new(FsStorage::new(dir.to_path_buf()));
        let catalog = Catalog::load(storage, CatalogConfig::default()).unwrap();
        let failures = check_articles(&catalog);

        let articles: Vec<_> = failures.iter().map(|f| f.article.as_str()).collect();
        assert_eq!(articles, vec!["broken", "missing"]);
        assert!(failures.iter().all(|f| f.version == "v0.12"));
    }
}
