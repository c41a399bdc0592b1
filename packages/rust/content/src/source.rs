//! The `ContentSource` capability and the sources built from config.

use std::fmt;
use std::future::Future;

use clinicsite_shared::{ContentConfig, PageContent, Result, SiteError, SiteInfo};

use crate::wordpress::WordPressSource;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Read-only access to optional CMS content.
///
/// Every call may fail. Callers never see these errors directly: they go
/// through [`crate::Resolver`], which turns any failure into `None`.
pub trait ContentSource: Send + Sync {
    /// Site name and tagline.
    fn site_info(&self) -> impl Future<Output = Result<SiteInfo>> + Send;

    /// The page backing the home route.
    fn front_page(&self) -> impl Future<Output = Result<PageContent>> + Send;

    /// A page by its CMS slug.
    fn page_by_slug(&self, slug: &str) -> impl Future<Output = Result<PageContent>> + Send;

    /// Human-readable source name for tracing.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Content selectors
// ---------------------------------------------------------------------------

/// Which CMS page a route wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRef {
    /// Whatever the CMS treats as its front page.
    Front,
    /// A page by slug.
    Slug(String),
}

/// What a single content resolution asks for. Used in logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentKind {
    SiteInfo,
    Page(PageRef),
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SiteInfo => f.write_str("site-info"),
            Self::Page(PageRef::Front) => f.write_str("front-page"),
            Self::Page(PageRef::Slug(slug)) => write!(f, "page:{slug}"),
        }
    }
}

// ---------------------------------------------------------------------------
// DisabledSource
// ---------------------------------------------------------------------------

/// Source used when no CMS is configured. Every call reports
/// [`SiteError::ContentDisabled`], so every page renders from static copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSource;

impl ContentSource for DisabledSource {
    async fn site_info(&self) -> Result<SiteInfo> {
        Err(SiteError::ContentDisabled)
    }

    async fn front_page(&self) -> Result<PageContent> {
        Err(SiteError::ContentDisabled)
    }

    async fn page_by_slug(&self, _slug: &str) -> Result<PageContent> {
        Err(SiteError::ContentDisabled)
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

// ---------------------------------------------------------------------------
// ConfiguredSource
// ---------------------------------------------------------------------------

/// The source selected by deployment config.
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    WordPress(WordPressSource),
    Disabled(DisabledSource),
}

impl ConfiguredSource {
    /// Build the source for `config`: WordPress when `api_url` is set,
    /// disabled otherwise.
    pub fn from_config(config: &ContentConfig) -> Result<Self> {
        match config.api_url.as_deref() {
            Some(api_url) => Ok(Self::WordPress(WordPressSource::new(
                api_url,
                &config.front_page_slug,
                config.timeout(),
            )?)),
            None => {
                tracing::info!("no content.api_url configured, serving static copy only");
                Ok(Self::Disabled(DisabledSource))
            }
        }
    }
}

impl ContentSource for ConfiguredSource {
    async fn site_info(&self) -> Result<SiteInfo> {
        match self {
            Self::WordPress(source) => source.site_info().await,
            Self::Disabled(source) => source.site_info().await,
        }
    }

    async fn front_page(&self) -> Result<PageContent> {
        match self {
            Self::WordPress(source) => source.front_page().await,
            Self::Disabled(source) => source.front_page().await,
        }
    }

    async fn page_by_slug(&self, slug: &str) -> Result<PageContent> {
        match self {
            Self::WordPress(source) => source.page_by_slug(slug).await,
            Self::Disabled(source) => source.page_by_slug(slug).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::WordPress(source) => source.name(),
            Self::Disabled(source) => source.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_kind_display() {
        assert_eq!(ContentKind::SiteInfo.to_string(), "site-info");
        assert_eq!(ContentKind::Page(PageRef::Front).to_string(), "front-page");
        assert_eq!(
            ContentKind::Page(PageRef::Slug("priser".into())).to_string(),
            "page:priser"
        );
    }

    #[test]
    fn missing_api_url_selects_disabled_source() {
        let source = ConfiguredSource::from_config(&ContentConfig::default()).unwrap();
        assert_eq!(source.name(), "disabled");
    }

    #[test]
    fn api_url_selects_wordpress() {
        let config = ContentConfig {
            api_url: Some("https://cms.example.dk".into()),
            ..ContentConfig::default()
        };
        let source = ConfiguredSource::from_config(&config).unwrap();
        assert_eq!(source.name(), "wordpress");
    }

    #[tokio::test]
    async fn disabled_source_always_fails_soft() {
        let err = DisabledSource.site_info().await.unwrap_err();
        assert!(err.is_soft());
        assert!(DisabledSource.page_by_slug("faq").await.is_err());
    }
}
