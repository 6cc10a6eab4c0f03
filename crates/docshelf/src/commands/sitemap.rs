//! `docshelf sitemap` command implementation.

use clap::Args;
use docshelf_config::CliSettings;

use super::{ConfigArgs, load_catalog};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sitemap command.
#[derive(Args)]
pub(crate) struct SitemapArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Version to list (default: the default version).
    #[arg(long = "doc-version")]
    doc_version: Option<String>,
}

impl SitemapArgs {
    /// Execute the sitemap command.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be built or the version is
    /// unknown.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.config.load(CliSettings {
            warm_cache: Some(false),
            ..CliSettings::default()
        })?;
        let catalog = load_catalog(&config)?;

        if let Some(version) = &self.doc_version
            && !catalog.has_version(version)
        {
            return Err(CliError::Validation(format!("Unknown version: {version}")));
        }

        let articles = catalog.sitemap_articles(self.doc_version.as_deref());
        tracing::info!(
            version = self.doc_version.as_deref().unwrap_or(catalog.tocs().default_version()),
            articles = articles.len(),
            "Listing sitemap articles"
        );
        for article in articles {
            output.line(article)?;
        }
        Ok(())
    }
}
