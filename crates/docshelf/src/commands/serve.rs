//! `docshelf serve` command implementation.

use clap::Args;
use docshelf_config::CliSettings;
use docshelf_server::{run_server, server_config_from_config};

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Read articles lazily instead of loading them all at startup.
    #[arg(long)]
    no_warm_cache: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            site_root: None,
            warm_cache: self.no_warm_cache.then_some(false),
        };
        let config = self.config.load(cli_settings)?;

        output.heading(format_args!(
            "Serving on {}:{}",
            config.server.host, config.server.port
        ));
        output.field("site root", config.docs_resolved.site_root.display());
        output.field(
            "default",
            format_args!(
                "{} ({})",
                config.docs_resolved.default_version, config.docs_resolved.default_language
            ),
        );

        let server_config = server_config_from_config(&config, version.to_owned())?;
        match &server_config.search {
            Some(search) => output.field("search", format_args!("{} ({})", search.api_url, search.index)),
            None => output.field("search", "disabled"),
        }

        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
