//! Page rendering: resolved content + route config → head tags, JSON-LD, HTML.

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use clinicsite_content::{ContentSource, ResolvedContent, Resolver};
use clinicsite_seo::{
    JsonLdDocument, MetaOptions, MetaTag, WebPageNode, WebSiteNode, build_json_ld, build_meta,
    canonical_url, coalesce, coalesce_opt, escape_html, present, render_head, strip_html,
};
use clinicsite_shared::{AppConfig, PageOverride, Result};

use crate::routes::{RouteContent, RouteMetaConfig, expand, route_for};

// ---------------------------------------------------------------------------
// SiteContext
// ---------------------------------------------------------------------------

/// Static site identity, validated once at startup and shared read-only by
/// every render.
#[derive(Debug, Clone)]
pub struct SiteContext {
    pub name: String,
    pub description: String,
    /// Absolute origin without a trailing slash.
    pub origin: String,
    pub locale: String,
    pub title_separator: String,
    overrides: BTreeMap<String, PageOverride>,
}

impl SiteContext {
    /// Validate `config` and capture what rendering needs.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            name: config.site.name.trim().to_string(),
            description: config.site.description.trim().to_string(),
            origin: config.site.origin()?,
            locale: config.site.locale.clone(),
            title_separator: config.site.title_separator.clone(),
            overrides: config.pages.clone(),
        })
    }

    /// Explicit overrides configured for `path`.
    pub fn page_override(&self, path: &str) -> Option<&PageOverride> {
        self.overrides.get(path)
    }
}

// ---------------------------------------------------------------------------
// PageHead
// ---------------------------------------------------------------------------

/// Everything that goes into a page's `<head>` plus its structured data.
#[derive(Debug, Clone)]
pub struct PageHead {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub site_name: String,
    pub site_description: String,
    pub tags: Vec<MetaTag>,
    pub json_ld: JsonLdDocument,
}

/// Resolve every metadata field for `route` and build the head.
///
/// Each field walks its own chain (explicit override, CMS content, static
/// copy), so one field can come from the CMS while another falls back.
pub fn build_head(route: &RouteMetaConfig, content: &ResolvedContent, site: &SiteContext) -> PageHead {
    let explicit = site.page_override(route.path);
    let remote_site = content.site_info.as_ref();
    let remote_page = content.page.as_ref();

    let site_name = coalesce(None, remote_site.map(|s| s.name.as_str()), &site.name);

    let remote_tagline = remote_site
        .map(|s| strip_html(&s.description))
        .filter(|d| !d.is_empty());
    let site_description = coalesce(None, remote_tagline.as_deref(), &site.description);

    let remote_title = remote_site
        .and_then(|s| present(Some(s.name.as_str())))
        .map(|name| expand(route.title_template, name, &site.title_separator));
    let static_title = expand(route.title_template, &site.name, &site.title_separator);
    let title = coalesce(
        explicit.and_then(|o| o.title.as_deref()),
        remote_title.as_deref(),
        &static_title,
    );

    let remote_description = remote_description(route, content);
    let static_description = expand(route.fallback_description, &site_name, &site.title_separator);
    let description = coalesce(
        explicit.and_then(|o| o.description.as_deref()),
        remote_description.as_deref(),
        &static_description,
    );

    let image = coalesce_opt(
        explicit.and_then(|o| o.image.as_deref()),
        remote_page.and_then(|p| p.featured_image_url.as_deref()),
    );

    let canonical = canonical_url(&site.origin, route.path);
    let locale = route.locale.unwrap_or(site.locale.as_str()).to_string();

    let tags = build_meta(&MetaOptions {
        title: title.clone(),
        description: Some(description.clone()),
        url: canonical.clone(),
        site_name: site_name.clone(),
        site_url: site.origin.clone(),
        og_type: route.content_type,
        image: image.clone(),
        locale: Some(locale.clone()),
    });

    let site_node = WebSiteNode {
        name: site_name.clone(),
        url: site.origin.clone(),
        description: Some(site_description.clone()),
        locale: Some(locale),
    };
    let page_node = remote_page.map(|page| {
        let page_title = strip_html(&page.title);
        WebPageNode {
            url: canonical.clone(),
            name: coalesce(None, Some(page_title.as_str()), &title),
            description: Some(description.clone()),
            image: image.clone(),
            date_published: page.published.map(|d| d.to_iso8601()),
            date_modified: page.modified.map(|d| d.to_iso8601()),
        }
    });
    let json_ld = build_json_ld(&site_node, page_node.as_ref());

    PageHead {
        title,
        description,
        canonical,
        site_name,
        site_description,
        tags,
        json_ld,
    }
}

/// Description offered by the CMS: the page excerpt, or on the home route
/// the site tagline.
fn remote_description(route: &RouteMetaConfig, content: &ResolvedContent) -> Option<String> {
    let excerpt = content
        .page
        .as_ref()
        .map(|p| strip_html(&p.excerpt_html))
        .filter(|d| !d.is_empty());

    excerpt.or_else(|| match route.content {
        RouteContent::FrontPage => content
            .site_info
            .as_ref()
            .map(|s| strip_html(&s.description))
            .filter(|d| !d.is_empty()),
        RouteContent::SiteInfo => None,
    })
}

// ---------------------------------------------------------------------------
// RenderedPage
// ---------------------------------------------------------------------------

/// A fully rendered HTML document.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub route: &'static RouteMetaConfig,
    pub head: PageHead,
    pub html: String,
    /// Whether any CMS content made it into this render.
    pub enriched: bool,
}

impl RenderedPage {
    /// HTTP status this page should be served with.
    pub fn status(&self) -> u16 {
        if self.route.indexable { 200 } else { 404 }
    }

    /// Head tags and structured data as one JSON object, for inspection.
    pub fn meta_json(&self) -> serde_json::Value {
        serde_json::json!({
            "route": self.route.path,
            "status": self.status(),
            "enriched": self.enriched,
            "title": self.head.title,
            "description": self.head.description,
            "canonical": self.head.canonical,
            "tags": self.head.tags,
            "jsonLd": self.head.json_ld.as_value(),
        })
    }
}

/// Render `route` with whatever content was resolved.
pub fn render_page(
    route: &'static RouteMetaConfig,
    content: &ResolvedContent,
    site: &SiteContext,
) -> RenderedPage {
    let head = build_head(route, content, site);
    let lang = head_language(route.locale.unwrap_or(site.locale.as_str()));

    let cms_section = content
        .page
        .as_ref()
        .filter(|p| !p.body_html.trim().is_empty())
        .map(|p| format!("<section class=\"cms-content\">\n{}\n</section>\n", p.body_html))
        .unwrap_or_default();

    let html = format!(
        "<!DOCTYPE html>\n\
         <html lang=\"{lang}\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         {head_tags}\n\
         </head>\n\
         <body>\n\
         <header><a href=\"/\">{site_name}</a></header>\n\
         <main>\n\
         <h1>{heading}</h1>\n\
         <p>{intro}</p>\n\
         {cms_section}\
         </main>\n\
         <footer>\n<p>{site_name}</p>\n<p>{site_description}</p>\n</footer>\n\
         {json_ld}\n\
         </body>\n\
         </html>\n",
        head_tags = render_head(&head.tags),
        site_name = escape_html(&head.site_name),
        heading = escape_html(route.heading),
        intro = escape_html(route.intro),
        site_description = escape_html(&head.site_description),
        json_ld = head.json_ld.to_script_tag(),
    );

    RenderedPage {
        route,
        head,
        html,
        enriched: content.site_info.is_some() || content.page.is_some(),
    }
}

/// Resolve content for `path` and render it. Never fails: unknown paths get
/// the not-found page and CMS failures get static copy.
#[instrument(skip(resolver, site))]
pub async fn render_route<S: ContentSource>(
    resolver: &Resolver<S>,
    site: &SiteContext,
    path: &str,
) -> RenderedPage {
    let route = route_for(path);
    let content = resolver.resolve(&route.needs()).await;
    let page = render_page(route, &content, site);

    debug!(
        route = route.path,
        enriched = page.enriched,
        title = %page.head.title,
        "page rendered"
    );

    page
}

/// `da_DK` → `da`.
fn head_language(locale: &str) -> &str {
    locale.split(['_', '-']).next().unwrap_or(locale)
}
