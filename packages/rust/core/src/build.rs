//! Whole-site build: every route rendered to disk, plus robots and sitemap.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};

use clinicsite_content::{ContentSource, Resolver};
use clinicsite_shared::{Result, SiteError};

use crate::render::{SiteContext, render_page};
use crate::routes::{NOT_FOUND, ROUTES, RouteMetaConfig};
use crate::site_files::{robots_txt, sitemap_entries, sitemap_xml};

/// Result of a site build.
#[derive(Debug)]
pub struct BuildResult {
    /// Output directory.
    pub out_dir: PathBuf,
    /// Number of HTML pages written.
    pub page_count: usize,
    /// Pages that carried at least some CMS content.
    pub enriched_count: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting build status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each page is written.
    fn page_rendered(&self, path: &str, current: usize, total: usize);
    /// Called when the build completes.
    fn done(&self, result: &BuildResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_rendered(&self, _path: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &BuildResult) {}
}

/// Render the whole site into `out_dir`.
///
/// Layout:
/// ```text
/// <out_dir>/
/// ├── index.html
/// ├── faq/index.html
/// ├── ...
/// ├── 404.html
/// ├── robots.txt
/// └── sitemap.xml
/// ```
///
/// Each page resolves its own content; a CMS outage only costs enrichment.
/// Only filesystem errors fail the build.
#[instrument(skip_all, fields(out_dir = %out_dir.display()))]
pub async fn build_site<S: ContentSource>(
    resolver: &Resolver<S>,
    site: &SiteContext,
    out_dir: &Path,
    progress: &dyn ProgressReporter,
) -> Result<BuildResult> {
    let start = Instant::now();
    std::fs::create_dir_all(out_dir).map_err(|e| SiteError::io(out_dir, e))?;

    info!(source = resolver.source().name(), "building site");

    progress.phase("Rendering pages");
    let routes: Vec<&'static RouteMetaConfig> = ROUTES.iter().chain([&NOT_FOUND]).collect();
    let total = routes.len();
    let mut entries = sitemap_entries(site, ROUTES);
    let mut enriched_count = 0;

    for (i, route) in routes.into_iter().enumerate() {
        let content = resolver.resolve(&route.needs()).await;
        let page = render_page(route, &content, site);

        if page.enriched {
            enriched_count += 1;
        }

        // CMS modification time is the only lastmod we know.
        if let Some(modified) = content.page.as_ref().and_then(|p| p.modified) {
            let loc = &page.head.canonical;
            if let Some(entry) = entries.iter_mut().find(|e| &e.loc == loc) {
                entry.lastmod = Some(modified.to_ymd());
            }
        }

        write_file(&out_dir.join(output_path(route)), &page.html)?;
        progress.page_rendered(route.path, i + 1, total);
    }

    progress.phase("Writing robots.txt and sitemap.xml");
    write_file(&out_dir.join("robots.txt"), &robots_txt(site))?;
    write_file(&out_dir.join("sitemap.xml"), &sitemap_xml(&entries))?;

    let result = BuildResult {
        out_dir: out_dir.to_path_buf(),
        page_count: total,
        enriched_count,
        elapsed: start.elapsed(),
    };

    info!(
        pages = result.page_count,
        enriched = result.enriched_count,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "site built"
    );
    progress.done(&result);

    Ok(result)
}

/// Relative output path for a route.
pub fn output_path(route: &RouteMetaConfig) -> PathBuf {
    if !route.indexable {
        return PathBuf::from(format!("{}.html", route.path.trim_start_matches('/')));
    }
    match route.path.trim_matches('/') {
        "" => PathBuf::from("index.html"),
        dir => Path::new(dir).join("index.html"),
    }
}

/// Write via a temp file and rename, so a crashed build never leaves a
/// half-written page behind.
fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SiteError::io(parent, e))?;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, content).map_err(|e| SiteError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| SiteError::io(path, e))?;

    debug!(path = %path.display(), size = content.len(), "wrote file");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::find_route;
    use clinicsite_content::{DisabledSource, WordPressSource};
    use clinicsite_shared::AppConfig;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("clinicsite-build-test-{}", uuid::Uuid::now_v7()))
    }

    fn site() -> SiteContext {
        let mut config = AppConfig::default();
        config.site.url = "https://example.dk".into();
        SiteContext::from_config(&config).unwrap()
    }

    #[test]
    fn test_output_paths() {
        assert_eq!(output_path(find_route("/").unwrap()), PathBuf::from("index.html"));
        assert_eq!(
            output_path(find_route("/faq").unwrap()),
            Path::new("faq").join("index.html")
        );
        assert_eq!(output_path(&NOT_FOUND), PathBuf::from("404.html"));
    }

    #[tokio::test]
    async fn test_build_with_content_disabled() {
        let out = temp_dir();
        let resolver = Resolver::new(DisabledSource, Duration::from_secs(1));

        let result = build_site(&resolver, &site(), &out, &SilentProgress)
            .await
            .unwrap();

        assert_eq!(result.page_count, ROUTES.len() + 1);
        assert_eq!(result.enriched_count, 0);

        let faq = std::fs::read_to_string(out.join("faq").join("index.html")).unwrap();
        assert!(faq.contains("<title>FAQ | Specialklinik Taastrup</title>"));
        assert!(faq.contains(r#"<link rel="canonical" href="https://example.dk/faq">"#));

        assert!(out.join("index.html").exists());
        assert!(out.join("404.html").exists());
        assert!(out.join("robots.txt").exists());

        let sitemap = std::fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert_eq!(sitemap.matches("<url>").count(), ROUTES.len());

        // No temp files left behind.
        assert!(!out.join(".index.html.tmp").exists());

        let _ = std::fs::remove_dir_all(&out);
    }

    #[tokio::test]
    async fn test_build_with_partial_cms_outage() {
        let server = wiremock::MockServer::start().await;

        // Site info works, the front page endpoint is down.
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/wp-json"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string(r#"{"name":"CMS Klinik","description":"Fra CMS"}"#),
            )
            .mount(&server)
            .await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/wp-json/wp/v2/pages"))
            .respond_with(wiremock::ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let out = temp_dir();
        let source = WordPressSource::new(&server.uri(), "forside", Duration::from_secs(2)).unwrap();
        let resolver = Resolver::new(source, Duration::from_secs(2));

        let result = build_site(&resolver, &site(), &out, &SilentProgress)
            .await
            .unwrap();
        assert_eq!(result.enriched_count, result.page_count);

        let home = std::fs::read_to_string(out.join("index.html")).unwrap();
        assert!(home.contains("<title>CMS Klinik</title>"));
        assert!(home.contains(r#"<meta name="description" content="Fra CMS">"#));
        assert!(home.contains(r#""@type":"WebSite""#));

        let _ = std::fs::remove_dir_all(&out);
    }

    #[tokio::test]
    async fn test_front_page_modified_becomes_lastmod() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/wp-json/wp/v2/pages"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(
                r#"[{"title":{"rendered":"Forside"},"excerpt":{"rendered":""},"content":{"rendered":""},"modified":"2024-05-10T14:00:00"}]"#,
            ))
            .mount(&server)
            .await;

        let out = temp_dir();
        let source = WordPressSource::new(&server.uri(), "forside", Duration::from_secs(2)).unwrap();
        let resolver = Resolver::new(source, Duration::from_secs(2));

        build_site(&resolver, &site(), &out, &SilentProgress)
            .await
            .unwrap();

        let sitemap = std::fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains(
            "<loc>https://example.dk/</loc>\n    <lastmod>2024-05-10</lastmod>"
        ));
        assert_eq!(sitemap.matches("<lastmod>").count(), 1);

        let _ = std::fs::remove_dir_all(&out);
    }
}
