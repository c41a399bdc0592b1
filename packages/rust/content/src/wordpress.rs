//! WordPress REST API content source.
//!
//! Site identity comes from the API index (`/wp-json`), pages from
//! `/wp-json/wp/v2/pages?slug=<slug>&_embed` so the featured image arrives
//! in the same response.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use clinicsite_shared::{ContentDate, PageContent, Result, SiteError, SiteInfo};

use crate::source::ContentSource;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 3;

/// Maximum response size we consider valid (5 MB). The API index of a
/// plugin-heavy install is large, pages are small.
const MAX_RESPONSE_SIZE: u64 = 5 * 1024 * 1024;

/// User-Agent string for CMS requests.
const USER_AGENT: &str = concat!("clinicsite/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

// Every field is optional: a missing or `null` value is absent content, not
// a broken response.

#[derive(Debug, Deserialize)]
struct WpSiteInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WpRendered {
    #[serde(default)]
    rendered: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WpMedia {
    #[serde(default)]
    source_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WpEmbedded {
    #[serde(default, rename = "wp:featuredmedia")]
    featured_media: Option<Vec<Option<WpMedia>>>,
}

#[derive(Debug, Deserialize)]
struct WpPage {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    modified: Option<String>,
    #[serde(default)]
    title: Option<WpRendered>,
    #[serde(default)]
    excerpt: Option<WpRendered>,
    #[serde(default)]
    content: Option<WpRendered>,
    #[serde(default, rename = "_embedded")]
    embedded: Option<WpEmbedded>,
}

fn rendered(field: Option<WpRendered>) -> String {
    field.and_then(|r| r.rendered).unwrap_or_default()
}

impl From<WpPage> for PageContent {
    fn from(page: WpPage) -> Self {
        let featured_image_url = page
            .embedded
            .and_then(|e| e.featured_media)
            .and_then(|media| media.into_iter().flatten().next())
            .and_then(|m| m.source_url)
            .filter(|u| !u.trim().is_empty());

        Self {
            title: rendered(page.title),
            excerpt_html: rendered(page.excerpt),
            body_html: rendered(page.content),
            featured_image_url,
            published: page.date.as_deref().and_then(ContentDate::parse),
            modified: page.modified.as_deref().and_then(ContentDate::parse),
        }
    }
}

// ---------------------------------------------------------------------------
// WordPressSource
// ---------------------------------------------------------------------------

/// Content source backed by a WordPress install.
#[derive(Debug, Clone)]
pub struct WordPressSource {
    client: Client,
    api_base: Url,
    front_page_slug: String,
}

impl WordPressSource {
    /// Create a source for the WordPress install at `api_url`.
    pub fn new(api_url: &str, front_page_slug: &str, timeout: Duration) -> Result<Self> {
        let mut api_base = Url::parse(api_url).map_err(|e| {
            SiteError::config(format!("content api url '{api_url}' is invalid: {e}"))
        })?;

        // `Url::join` replaces the last segment unless the path ends in '/'.
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }

        Ok(Self {
            client: build_client(timeout)?,
            api_base,
            front_page_slug: front_page_slug.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_base
            .join(path)
            .map_err(|e| SiteError::config(format!("cannot build endpoint '{path}': {e}")))
    }

    fn pages_url(&self, slug: &str) -> Result<Url> {
        let mut url = self.endpoint("wp-json/wp/v2/pages")?;
        url.query_pairs_mut()
            .append_pair("slug", slug)
            .append_pair("_embed", "1");
        Ok(url)
    }

    async fn fetch_page(&self, slug: &str) -> Result<PageContent> {
        let url = self.pages_url(slug)?;
        let pages: Vec<WpPage> = fetch_json(&self.client, &url).await?;

        let page = pages
            .into_iter()
            .next()
            .ok_or_else(|| SiteError::NotFound(format!("page with slug '{slug}'")))?;

        Ok(page.into())
    }
}

impl ContentSource for WordPressSource {
    #[instrument(skip_all, fields(api = %self.api_base))]
    async fn site_info(&self) -> Result<SiteInfo> {
        let url = self.endpoint("wp-json")?;
        let info: WpSiteInfo = fetch_json(&self.client, &url).await?;
        // Blank fields fall through to static copy downstream.
        Ok(SiteInfo {
            name: info.name.unwrap_or_default(),
            description: info.description.unwrap_or_default(),
        })
    }

    #[instrument(skip_all, fields(slug = %self.front_page_slug))]
    async fn front_page(&self) -> Result<PageContent> {
        self.fetch_page(&self.front_page_slug).await
    }

    #[instrument(skip(self))]
    async fn page_by_slug(&self, slug: &str) -> Result<PageContent> {
        self.fetch_page(slug).await
    }

    fn name(&self) -> &str {
        "wordpress"
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a reqwest client with appropriate settings.
fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(timeout)
        .build()
        .map_err(|e| SiteError::Network(format!("failed to build HTTP client: {e}")))
}

/// Fetch a URL and decode its JSON body.
async fn fetch_json<T: DeserializeOwned>(client: &Client, url: &Url) -> Result<T> {
    debug!(%url, "fetching content");

    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| SiteError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SiteError::Http {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    if let Some(len) = response.content_length() {
        if len > MAX_RESPONSE_SIZE {
            return Err(SiteError::Payload(format!(
                "{url}: response too large ({len} bytes, max {MAX_RESPONSE_SIZE})"
            )));
        }
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| SiteError::Network(format!("{url}: failed to read body: {e}")))?;

    serde_json::from_slice(&body).map_err(|e| SiteError::Payload(format!("{url}: {e}")))
}
