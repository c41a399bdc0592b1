//! Application configuration for the clinic site.
//!
//! Deployment config lives at `~/.clinicsite/clinicsite.toml`.
//! CLI flags override config file values, which override defaults.
//!
//! The `[site]` table selects the brand identity for a deployment; several
//! clinics can share this codebase by shipping different config files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SiteError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "clinicsite.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".clinicsite";

/// Environment variable that overrides `content.api_url`.
pub const CONTENT_API_URL_ENV: &str = "CLINICSITE_CONTENT_API_URL";

// ---------------------------------------------------------------------------
// Config structs (matching clinicsite.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Site identity.
    #[serde(default)]
    pub site: SiteConfig,

    /// Remote content backend.
    #[serde(default)]
    pub content: ContentConfig,

    /// Explicit per-page metadata overrides, keyed by route path.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pages: BTreeMap<String, PageOverride>,
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Static site name, used whenever the CMS does not supply one.
    #[serde(default = "default_site_name")]
    pub name: String,

    /// Static site tagline.
    #[serde(default = "default_site_description")]
    pub description: String,

    /// Absolute public origin, e.g. `https://specialklinik-taastrup.dk`.
    #[serde(default = "default_site_url")]
    pub url: String,

    /// Open Graph locale (`da_DK`).
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Joins the page label and the site name in `<title>`.
    #[serde(default = "default_title_separator")]
    pub title_separator: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            description: default_site_description(),
            url: default_site_url(),
            locale: default_locale(),
            title_separator: default_title_separator(),
        }
    }
}

fn default_site_name() -> String {
    "Specialklinik Taastrup".into()
}
fn default_site_description() -> String {
    "Professionel omskæring i trygge rammer for drengebørn. Tryghed - hele vejen.".into()
}
fn default_site_url() -> String {
    "https://specialklinik-taastrup.dk".into()
}
fn default_locale() -> String {
    "da_DK".into()
}
fn default_title_separator() -> String {
    " | ".into()
}

impl SiteConfig {
    /// The validated public origin without a trailing slash.
    ///
    /// Fails loudly: every canonical URL is built from this value.
    pub fn origin(&self) -> Result<String> {
        let url = Url::parse(self.url.trim()).map_err(|e| {
            SiteError::config(format!("site.url '{}' is not an absolute URL: {e}", self.url))
        })?;

        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(SiteError::config(format!(
                "site.url '{}' must be an http(s) URL with a host",
                self.url
            )));
        }

        // Paths are appended to the origin, so nothing may follow it.
        if url.query().is_some() || url.fragment().is_some() {
            return Err(SiteError::config(format!(
                "site.url '{}' must not have a query or fragment",
                self.url
            )));
        }

        Ok(url.as_str().trim_end_matches('/').to_string())
    }
}

/// `[content]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Base URL of the WordPress install. `None` disables remote content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Upper bound on a single content fetch.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Slug of the CMS page backing the home route.
    #[serde(default = "default_front_page_slug")]
    pub front_page_slug: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout_secs: default_timeout_secs(),
            front_page_slug: default_front_page_slug(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    5
}
fn default_front_page_slug() -> String {
    "forside".into()
}

impl ContentConfig {
    /// Fetch timeout, never zero.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// `[pages."<path>"]` entry: explicit values that win over CMS content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl AppConfig {
    /// Override for `path`, if one is configured.
    pub fn page_override(&self, path: &str) -> Option<&PageOverride> {
        self.pages.get(path)
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(api_url) = lookup(CONTENT_API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            tracing::debug!(%api_url, "content.api_url overridden from environment");
            self.content.api_url = Some(api_url);
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Check everything that would otherwise break every page.
    pub fn validate(&self) -> Result<()> {
        self.site.origin()?;

        if self.site.name.trim().is_empty() {
            return Err(SiteError::config("site.name must not be empty"));
        }

        if let Some(api_url) = &self.content.api_url {
            Url::parse(api_url).map_err(|e| {
                SiteError::config(format!("content.api_url '{api_url}' is invalid: {e}"))
            })?;
        }

        for path in self.pages.keys() {
            if !path.starts_with('/') {
                return Err(SiteError::config(format!(
                    "page override key '{path}' must start with '/'"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.clinicsite/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| SiteError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.clinicsite/clinicsite.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SiteError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| SiteError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SiteError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content = toml::to_string_pretty(&config).map_err(|e| SiteError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SiteError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("Specialklinik Taastrup"));
        assert!(toml_str.contains("front_page_slug"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.content.timeout_secs, 5);
        assert_eq!(parsed.site.locale, "da_DK");
        assert!(parsed.content.api_url.is_none());
    }

    #[test]
    fn config_with_brand_and_overrides() {
        let toml_str = r#"
[site]
name = "ABB Medical"
url = "https://abbmedical.dk/"
title_separator = " — "

[content]
api_url = "https://cms.abbmedical.dk"

[pages."/priser"]
title = "Priser & Forløb — ABB Medical"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.site.name, "ABB Medical");
        assert_eq!(config.site.origin().unwrap(), "https://abbmedical.dk");
        assert_eq!(config.site.locale, "da_DK");
        let over = config.page_override("/priser").expect("override");
        assert_eq!(over.title.as_deref(), Some("Priser & Forløb — ABB Medical"));
        assert!(over.description.is_none());
        config.validate().expect("valid");
    }

    #[test]
    fn relative_site_url_is_rejected() {
        let mut config = AppConfig::default();
        config.site.url = "/faq".into();
        assert!(config.validate().is_err());

        config.site.url = "ftp://example.dk".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn site_url_with_query_or_fragment_is_rejected() {
        let mut site = SiteConfig::default();

        site.url = "https://example.dk/?x=1".into();
        let err = site.origin().unwrap_err();
        assert!(err.to_string().contains("query or fragment"));

        site.url = "https://example.dk/#top".into();
        assert!(site.origin().is_err());

        site.url = "https://example.dk/?".into();
        assert!(site.origin().is_err());

        site.url = "https://example.dk/".into();
        assert_eq!(site.origin().unwrap(), "https://example.dk");
    }

    #[test]
    fn override_keys_must_be_absolute_paths() {
        let mut config = AppConfig::default();
        config.pages.insert("faq".into(), PageOverride::default());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must start with '/'"));
    }

    #[test]
    fn env_overrides_api_url() {
        let mut config = AppConfig::default();
        config.apply_env_with(|key| {
            (key == CONTENT_API_URL_ENV).then(|| "https://cms.example.dk".to_string())
        });
        assert_eq!(config.content.api_url.as_deref(), Some("https://cms.example.dk"));

        let mut config = AppConfig::default();
        config.apply_env_with(|_| Some("  ".into()));
        assert!(config.content.api_url.is_none());
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let content = ContentConfig {
            timeout_secs: 0,
            ..ContentConfig::default()
        };
        assert_eq!(content.timeout(), Duration::from_secs(1));
    }
}
