//! `robots.txt` and `sitemap.xml`.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.dk/faq</loc>
//!   </url>
//! </urlset>
//! ```

use clinicsite_seo::canonical_url;

use crate::render::SiteContext;
use crate::routes::RouteMetaConfig;

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Single URL entry in the sitemap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    /// Full URL location
    pub loc: String,
    /// Last modification date (`YYYY-MM-DD`)
    pub lastmod: Option<String>,
}

/// Sitemap entries for every indexable route.
pub fn sitemap_entries(site: &SiteContext, routes: &[RouteMetaConfig]) -> Vec<SitemapEntry> {
    routes
        .iter()
        .filter(|r| r.indexable)
        .map(|r| SitemapEntry {
            loc: canonical_url(&site.origin, r.path),
            lastmod: None,
        })
        .collect()
}

/// Generate sitemap XML.
pub fn sitemap_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::with_capacity(4096);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
    xml.push('\n');

    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
        if let Some(lastmod) = &entry.lastmod {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", escape_xml(lastmod)));
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Generate `robots.txt` pointing crawlers at the sitemap.
pub fn robots_txt(site: &SiteContext) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}\n",
        canonical_url(&site.origin, "/sitemap.xml")
    )
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::ROUTES;
    use clinicsite_shared::AppConfig;

    fn site() -> SiteContext {
        let mut config = AppConfig::default();
        config.site.url = "https://example.dk/".into();
        SiteContext::from_config(&config).unwrap()
    }

    #[test]
    fn robots_points_at_absolute_sitemap() {
        assert_eq!(
            robots_txt(&site()),
            "User-agent: *\nAllow: /\n\nSitemap: https://example.dk/sitemap.xml\n"
        );
    }

    #[test]
    fn sitemap_lists_every_public_route() {
        let entries = sitemap_entries(&site(), ROUTES);
        assert_eq!(entries.len(), ROUTES.len());
        assert_eq!(entries[0].loc, "https://example.dk/");
        assert!(entries.iter().any(|e| e.loc == "https://example.dk/faq"));
        assert!(!entries.iter().any(|e| e.loc.ends_with("/404")));
    }

    #[test]
    fn sitemap_xml_shape() {
        let entries = [
            SitemapEntry {
                loc: "https://example.dk/".into(),
                lastmod: Some("2024-05-10".into()),
            },
            SitemapEntry {
                loc: "https://example.dk/faq?a=1&b=2".into(),
                lastmod: None,
            },
        ];
        let xml = sitemap_xml(&entries);
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(SITEMAP_NS));
        assert!(xml.contains("<lastmod>2024-05-10</lastmod>"));
        assert!(xml.contains("faq?a=1&amp;b=2"));
        assert_eq!(xml.matches("<url>").count(), 2);
    }
}
