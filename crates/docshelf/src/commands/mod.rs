//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod serve;
pub(crate) mod sitemap;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
pub(crate) use check::CheckArgs;
use docshelf_catalog::Catalog;
use docshelf_config::{CliSettings, Config};
use docshelf_server::catalog_config;
use docshelf_storage::FsStorage;
pub(crate) use serve::ServeArgs;
pub(crate) use sitemap::SitemapArgs;

use crate::error::CliError;

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct ConfigArgs {
    /// Path to configuration file (default: auto-discover docshelf.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site root holding docs, TOCs and the last-updated snapshot (overrides config).
    #[arg(short = 'r', long, env = "DOCSHELF_SITE_ROOT")]
    site_root: Option<PathBuf>,
}

impl ConfigArgs {
    /// Load configuration with these arguments applied on top.
    pub(crate) fn load(&self, mut settings: CliSettings) -> Result<Config, CliError> {
        settings.site_root.clone_from(&self.site_root);
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}

/// Build the catalog the server would serve.
pub(crate) fn load_catalog(config: &Config) -> Result<Catalog, CliError> {
    let site_root = &config.docs_resolved.site_root;
    tracing::info!(site_root = %site_root.display(), "Loading catalog");
    let storage = Arc::new(FsStorage::new(site_root.clone()));
    let catalog = Catalog::load(storage, catalog_config(&config.docs_resolved))?;
    tracing::info!(
        versions = catalog.tocs().versions().count(),
        default_version = catalog.tocs().default_version(),
        "Catalog loaded"
    );
    Ok(catalog)
}
