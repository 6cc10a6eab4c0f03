//! Configuration management for Docshelf.
//!
//! Parses `docshelf.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `site.base_url`
//! - `search.api_url`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override site root directory.
    pub site_root: Option<PathBuf>,
    /// Override eager cache warming.
    pub warm_cache: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docshelf.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Documentation layout and naming conventions (paths as strings from TOML).
    docs: DocsConfigRaw,
    /// Public site configuration.
    pub site: SiteConfig,
    /// External search service (optional section).
    pub search: Option<SearchConfig>,
    /// Legacy article redirects: article id to absolute target URL.
    pub redirects: BTreeMap<String, String>,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

/// Public site configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Absolute base URL used in the sitemap (no trailing slash).
    pub base_url: String,
    /// Article the root URL redirects to.
    pub home_article: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:7979".to_owned(),
            home_article: "quickstart".to_owned(),
        }
    }
}

/// External search service configuration.
#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the search API.
    pub api_url: String,
    /// Index name.
    #[serde(default = "default_search_index")]
    pub index: String,
}

fn default_search_index() -> String {
    "td-docs".to_owned()
}

impl SearchConfig {
    /// Validate that all required fields are properly set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.api_url, "search.api_url")?;
        require_http_url(&self.api_url, "search.api_url")?;
        require_non_empty(&self.index, "search.index")?;
        Ok(())
    }
}

/// Raw docs configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    site_root: Option<String>,
    root: Option<String>,
    extension: Option<String>,
    default_language: Option<String>,
    default_version: Option<String>,
    legacy_version: Option<String>,
    version_pattern: Option<String>,
    toc_dir: Option<String>,
    last_updated: Option<String>,
    keywords: Option<Vec<String>>,
    warm_cache: Option<bool>,
}

/// Resolved documentation configuration.
///
/// `site_root` is an absolute directory. All other paths are storage paths
/// relative to `site_root`, separated by `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsConfig {
    /// Directory the resource namespace is read from.
    pub site_root: PathBuf,
    /// Namespace root holding article files (e.g., `docs`).
    pub root: String,
    /// Article file extension without the dot.
    pub extension: String,
    /// Language served when none is requested.
    pub default_language: String,
    /// Version served when none is requested.
    pub default_version: String,
    /// Oldest version, stored in the flat layout without a version segment.
    pub legacy_version: String,
    /// Regex matched against directory names to detect version folders.
    pub version_pattern: String,
    /// Directory holding `toc.<lang>.<version>.yaml` files.
    pub toc_dir: String,
    /// Last-updated snapshot (JSON).
    pub last_updated: String,
    /// Keyword prefix for every page.
    pub keywords: Vec<String>,
    /// Load all article files into memory at startup.
    pub warm_cache: bool,
}

impl DocsConfig {
    /// Defaults with the given site root.
    #[must_use]
    pub fn with_site_root(site_root: PathBuf) -> Self {
        Self {
            site_root,
            root: "docs".to_owned(),
            extension: "txt".to_owned(),
            default_language: "en".to_owned(),
            default_version: "v0.12".to_owned(),
            legacy_version: "v0.10".to_owned(),
            version_pattern: r"^v\d+".to_owned(),
            toc_dir: "toc".to_owned(),
            last_updated: "config/last_updated.json".to_owned(),
            keywords: vec!["Fluentd".to_owned(), "log collector".to_owned()],
            warm_cache: true,
        }
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self::with_site_root(PathBuf::from("."))
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// A `${VAR}` reference without default names an unset variable.
    #[error("{field} references ${{{var}}}, which is not set")]
    UnsetEnvVar { field: &'static str, var: String },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docshelf.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(site_root) = &settings.site_root {
            self.docs_resolved.site_root.clone_from(site_root);
        }
        if let Some(warm_cache) = settings.warm_cache {
            self.docs_resolved.warm_cache = warm_cache;
        }
    }

    /// Get validated search configuration.
    ///
    /// Returns `None` when the `[search]` section is absent (search disabled).
    pub fn search(&self) -> Result<Option<&SearchConfig>, ConfigError> {
        match &self.search {
            Some(search) => {
                search.validate()?;
                Ok(Some(search))
            }
            None => Ok(None),
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            docs: DocsConfigRaw::default(),
            site: SiteConfig::default(),
            search: None,
            redirects: BTreeMap::new(),
            docs_resolved: DocsConfig::with_site_root(base.to_path_buf()),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_docs()?;
        require_http_url(&self.site.base_url, "site.base_url")?;
        require_non_empty(&self.site.home_article, "site.home_article")?;
        for (article, target) in &self.redirects {
            require_http_url(target, &format!("redirects.{article}"))?;
        }
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate docs configuration.
    fn validate_docs(&self) -> Result<(), ConfigError> {
        let docs = &self.docs_resolved;
        require_non_empty(&docs.root, "docs.root")?;
        require_non_empty(&docs.extension, "docs.extension")?;
        require_non_empty(&docs.default_language, "docs.default_language")?;
        require_non_empty(&docs.default_version, "docs.default_version")?;
        require_non_empty(&docs.legacy_version, "docs.legacy_version")?;
        require_non_empty(&docs.version_pattern, "docs.version_pattern")?;

        if docs.extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "docs.extension must not start with a dot".to_owned(),
            ));
        }
        if docs.default_language.contains('/') || docs.default_version.contains('/') {
            return Err(ConfigError::Validation(
                "docs.default_language and docs.default_version must be single path segments"
                    .to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand_field("server.host", &mut self.server.host)?;
        expand_field("site.base_url", &mut self.site.base_url)?;
        if let Some(search) = &mut self.search {
            expand_field("search.api_url", &mut search.api_url)?;
        }
        Ok(())
    }

    /// Resolve docs settings against defaults and the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let mut resolved =
            DocsConfig::with_site_root(config_dir.join(self.docs.site_root.as_deref().unwrap_or(".")));
        let raw = std::mem::take(&mut self.docs);

        let set = |target: &mut String, value: Option<String>| {
            if let Some(value) = value {
                *target = value.trim_matches('/').to_owned();
            }
        };
        set(&mut resolved.root, raw.root);
        set(&mut resolved.extension, raw.extension);
        set(&mut resolved.default_language, raw.default_language);
        set(&mut resolved.default_version, raw.default_version);
        set(&mut resolved.legacy_version, raw.legacy_version);
        set(&mut resolved.toc_dir, raw.toc_dir);
        set(&mut resolved.last_updated, raw.last_updated);
        if let Some(pattern) = raw.version_pattern {
            resolved.version_pattern = pattern;
        }
        if let Some(keywords) = raw.keywords {
            resolved.keywords = keywords;
        }
        if let Some(warm_cache) = raw.warm_cache {
            resolved.warm_cache = warm_cache;
        }

        self.docs_resolved = resolved;
    }
}

/// Replace `${VAR}` and `${VAR:-default}` in `value` in place.
///
/// Values without `${` are left untouched, including bare `$name` text.
fn expand_field(field: &'static str, value: &mut String) -> Result<(), ConfigError> {
    if !value.contains("${") {
        return Ok(());
    }
    let expanded = shellexpand::env_with_context(value.as_str(), |var| {
        std::env::var(var).map(Some)
    })
    .map_err(|e| ConfigError::UnsetEnvVar {
        field,
        var: e.var_name,
    })?;
    *value = expanded.into_owned();
    Ok(())
}
