//! Fail-open content resolution.
//!
//! Each fetch is guarded on its own: a failure, a timeout, or a disabled
//! source all settle to `None`, and one kind failing never discards another.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use clinicsite_shared::{PageContent, Result, SiteError, SiteInfo};

use crate::source::{ContentKind, ContentSource, PageRef};

/// What a route needs from the CMS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentNeeds {
    /// Fetch site name and tagline.
    pub site_info: bool,
    /// Fetch a page.
    pub page: Option<PageRef>,
}

impl ContentNeeds {
    /// Only the site identity.
    pub fn site_only() -> Self {
        Self {
            site_info: true,
            page: None,
        }
    }

    /// Site identity plus one page.
    pub fn with_page(page: PageRef) -> Self {
        Self {
            site_info: true,
            page: Some(page),
        }
    }
}

/// Whatever could be fetched for one render. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedContent {
    pub site_info: Option<SiteInfo>,
    pub page: Option<PageContent>,
}

/// Resolves optional content from a [`ContentSource`] with a finite timeout.
#[derive(Debug, Clone)]
pub struct Resolver<S> {
    source: S,
    timeout: Duration,
}

impl<S: ContentSource> Resolver<S> {
    pub fn new(source: S, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Site info, or `None` if it could not be fetched.
    pub async fn site_info(&self) -> Option<SiteInfo> {
        guarded(ContentKind::SiteInfo, self.timeout, self.source.site_info()).await
    }

    /// A page, or `None` if it could not be fetched.
    pub async fn page(&self, page: &PageRef) -> Option<PageContent> {
        let kind = ContentKind::Page(page.clone());
        match page {
            PageRef::Front => guarded(kind, self.timeout, self.source.front_page()).await,
            PageRef::Slug(slug) => guarded(kind, self.timeout, self.source.page_by_slug(slug)).await,
        }
    }

    /// Resolve everything `needs` asks for, concurrently.
    ///
    /// Waits for every fetch to settle. Never fails.
    #[instrument(skip_all, fields(source = self.source.name()))]
    pub async fn resolve(&self, needs: &ContentNeeds) -> ResolvedContent {
        let site_info = async {
            if needs.site_info {
                self.site_info().await
            } else {
                None
            }
        };
        let page = async {
            match &needs.page {
                Some(page) => self.page(page).await,
                None => None,
            }
        };

        let (site_info, page) = tokio::join!(site_info, page);

        debug!(
            site_info = site_info.is_some(),
            page = page.is_some(),
            "content resolved"
        );

        ResolvedContent { site_info, page }
    }
}

/// Run one fetch under a timeout and swallow any failure.
async fn guarded<T>(
    kind: ContentKind,
    timeout: Duration,
    fetch: impl Future<Output = Result<T>>,
) -> Option<T> {
    match tokio::time::timeout(timeout, fetch).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(SiteError::ContentDisabled)) => {
            debug!(%kind, "content source disabled, using fallback");
            None
        }
        Ok(Err(e)) => {
            warn!(%kind, error = %e, "content fetch failed, using fallback");
            None
        }
        Err(_) => {
            let err = SiteError::Timeout(timeout.as_millis() as u64);
            warn!(%kind, error = %err, "content fetch failed, using fallback");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::source::DisabledSource;
    use crate::wordpress::WordPressSource;

    #[derive(Clone)]
    enum Behavior<T> {
        Ok(T),
        Fail,
        Hang,
    }

    impl<T: Clone> Behavior<T> {
        async fn run(&self) -> Result<T> {
            match self {
                Self::Ok(value) => Ok(value.clone()),
                Self::Fail => Err(SiteError::Network("connection refused".into())),
                Self::Hang => std::future::pending().await,
            }
        }
    }

    struct FakeSource {
        site: Behavior<SiteInfo>,
        page: Behavior<PageContent>,
    }

    impl ContentSource for FakeSource {
        async fn site_info(&self) -> Result<SiteInfo> {
            self.site.run().await
        }

        async fn front_page(&self) -> Result<PageContent> {
            self.page.run().await
        }

        async fn page_by_slug(&self, _slug: &str) -> Result<PageContent> {
            self.page.run().await
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn site() -> SiteInfo {
        SiteInfo {
            name: "CMS Klinik".into(),
            description: "Fra CMS".into(),
        }
    }

    fn page() -> PageContent {
        PageContent {
            title: "Forside".into(),
            excerpt_html: "<p>Uddrag</p>".into(),
            body_html: "<p>Krop</p>".into(),
            featured_image_url: None,
            published: None,
            modified: None,
        }
    }

    fn resolver(site: Behavior<SiteInfo>, page: Behavior<PageContent>) -> Resolver<FakeSource> {
        Resolver::new(FakeSource { site, page }, Duration::from_millis(100))
    }

    #[tokio::test]
    async fn test_both_succeed() {
        let r = resolver(Behavior::Ok(site()), Behavior::Ok(page()));
        let content = r.resolve(&ContentNeeds::with_page(PageRef::Front)).await;
        assert_eq!(content.site_info, Some(site()));
        assert_eq!(content.page, Some(page()));
    }

    #[tokio::test]
    async fn test_site_failure_keeps_page() {
        let r = resolver(Behavior::Fail, Behavior::Ok(page()));
        let content = r.resolve(&ContentNeeds::with_page(PageRef::Front)).await;
        assert!(content.site_info.is_none());
        assert_eq!(content.page, Some(page()));
    }

    #[tokio::test]
    async fn test_page_failure_keeps_site() {
        let r = resolver(Behavior::Ok(site()), Behavior::Fail);
        let content = r
            .resolve(&ContentNeeds::with_page(PageRef::Slug("faq".into())))
            .await;
        assert_eq!(content.site_info, Some(site()));
        assert!(content.page.is_none());
    }

    #[tokio::test]
    async fn test_hung_fetch_settles_to_none_within_timeout() {
        let r = resolver(Behavior::Hang, Behavior::Ok(page()));
        let start = Instant::now();
        let content = r.resolve(&ContentNeeds::with_page(PageRef::Front)).await;
        assert!(start.elapsed() < Duration::from_secs(2));
        assert!(content.site_info.is_none());
        assert_eq!(content.page, Some(page()));
    }

    #[tokio::test]
    async fn test_unrequested_content_is_not_fetched() {
        // A hung page fetch would stall the test if it were polled.
        let r = resolver(Behavior::Ok(site()), Behavior::Hang);
        let content = r.resolve(&ContentNeeds::site_only()).await;
        assert_eq!(content.site_info, Some(site()));
        assert!(content.page.is_none());
    }

    #[tokio::test]
    async fn test_disabled_source_resolves_empty() {
        let r = Resolver::new(DisabledSource, Duration::from_secs(1));
        let content = r.resolve(&ContentNeeds::with_page(PageRef::Front)).await;
        assert_eq!(content, ResolvedContent::default());
    }

    #[tokio::test]
    async fn test_slow_http_source_times_out() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/wp-json"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string(r#"{"name":"Langsom"}"#)
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let source =
            WordPressSource::new(&server.uri(), "forside", Duration::from_secs(10)).unwrap();
        let r = Resolver::new(source, Duration::from_millis(200));

        let start = Instant::now();
        assert!(r.site_info().await.is_none());
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_http_error_is_single_attempt() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/wp-json"))
            .respond_with(wiremock::ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let source =
            WordPressSource::new(&server.uri(), "forside", Duration::from_secs(2)).unwrap();
        let r = Resolver::new(source, Duration::from_secs(2));
        assert!(r.site_info().await.is_none());
    }
}
