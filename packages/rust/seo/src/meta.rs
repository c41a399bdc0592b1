//! Head tag descriptors: title, description, Open Graph, canonical link.

use serde::Serialize;
use tracing::trace;

use crate::text::{escape_html, present};

/// The only `og:type` this site publishes.
pub const OG_TYPE_WEBSITE: &str = "website";

// ---------------------------------------------------------------------------
// MetaTag
// ---------------------------------------------------------------------------

/// One element destined for `<head>`. Serializes to the familiar
/// `{ "name": ..., "content": ... }` descriptor shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetaTag {
    Title {
        title: String,
    },
    Name {
        name: &'static str,
        content: String,
    },
    Property {
        property: &'static str,
        content: String,
    },
    Link {
        rel: &'static str,
        href: String,
    },
}

impl MetaTag {
    /// Render as an HTML element.
    pub fn to_html(&self) -> String {
        match self {
            Self::Title { title } => format!("<title>{}</title>", escape_html(title)),
            Self::Name { name, content } => {
                format!(r#"<meta name="{name}" content="{}">"#, escape_html(content))
            }
            Self::Property { property, content } => format!(
                r#"<meta property="{property}" content="{}">"#,
                escape_html(content)
            ),
            Self::Link { rel, href } => {
                format!(r#"<link rel="{rel}" href="{}">"#, escape_html(href))
            }
        }
    }

    /// The `content`/`href` payload, or the title text.
    pub fn value(&self) -> &str {
        match self {
            Self::Title { title } => title.as_str(),
            Self::Name { content, .. } | Self::Property { content, .. } => content.as_str(),
            Self::Link { href, .. } => href.as_str(),
        }
    }
}

// ---------------------------------------------------------------------------
// MetaOptions
// ---------------------------------------------------------------------------

/// Already-resolved values for one page's head.
#[derive(Debug, Clone)]
pub struct MetaOptions {
    pub title: String,
    pub description: Option<String>,
    /// Canonical URL of this page. A bare path is joined to `site_url`.
    pub url: String,
    pub site_name: String,
    /// Absolute site origin.
    pub site_url: String,
    pub og_type: &'static str,
    pub image: Option<String>,
    pub locale: Option<String>,
}

/// Build the head tags for a page.
///
/// Never fails. A field that is missing or blank drops its tag instead of
/// emitting an empty `content`. The canonical link is emitted exactly once.
pub fn build_meta(opts: &MetaOptions) -> Vec<MetaTag> {
    let mut tags = Vec::with_capacity(10);
    let url = absolute_url(&opts.site_url, &opts.url);

    if let Some(title) = present(Some(opts.title.as_str())) {
        tags.push(MetaTag::Title {
            title: title.to_string(),
        });
    }

    push_name(&mut tags, "description", opts.description.as_deref());
    push_property(&mut tags, "og:title", Some(opts.title.as_str()));
    push_property(&mut tags, "og:description", opts.description.as_deref());
    push_property(&mut tags, "og:url", Some(url.as_str()));
    push_property(&mut tags, "og:site_name", Some(opts.site_name.as_str()));
    push_property(&mut tags, "og:type", Some(opts.og_type));
    push_property(&mut tags, "og:locale", opts.locale.as_deref());
    push_property(&mut tags, "og:image", opts.image.as_deref());

    if let Some(url) = present(Some(url.as_str())) {
        tags.push(MetaTag::Link {
            rel: "canonical",
            href: url.to_string(),
        });
    }

    tags
}

fn push_name(tags: &mut Vec<MetaTag>, name: &'static str, value: Option<&str>) {
    match present(value) {
        Some(content) => tags.push(MetaTag::Name {
            name,
            content: content.to_string(),
        }),
        None => trace!(name, "omitting empty meta tag"),
    }
}

fn push_property(tags: &mut Vec<MetaTag>, property: &'static str, value: Option<&str>) {
    match present(value) {
        Some(content) => tags.push(MetaTag::Property {
            property,
            content: content.to_string(),
        }),
        None => trace!(property, "omitting empty meta tag"),
    }
}

/// `url` as-is when it already has a scheme, otherwise joined to `site_url`.
fn absolute_url(site_url: &str, url: &str) -> String {
    let url = url.trim();
    if url.is_empty() || url.contains("://") {
        url.to_string()
    } else {
        canonical_url(site_url, url)
    }
}

/// Render tags one per line, in order.
pub fn render_head(tags: &[MetaTag]) -> String {
    tags.iter()
        .map(MetaTag::to_html)
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// URLs
// ---------------------------------------------------------------------------

/// Absolute URL for `path` under `site_url`.
///
/// Tolerates a trailing slash on the origin and a missing leading slash on
/// the path: `("https://example.dk/", "faq")` and
/// `("https://example.dk", "/faq")` both give `https://example.dk/faq`.
pub fn canonical_url(site_url: &str, path: &str) -> String {
    let origin = site_url.trim().trim_end_matches('/');
    let path = path.trim().trim_start_matches('/');
    format!("{origin}/{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> MetaOptions {
        MetaOptions {
            title: "FAQ | Specialklinik Taastrup".into(),
            description: Some("Ofte stillede spørgsmål.".into()),
            url: canonical_url("https://example.dk", "/faq"),
            site_name: "Specialklinik Taastrup".into(),
            site_url: "https://example.dk".into(),
            og_type: OG_TYPE_WEBSITE,
            image: None,
            locale: Some("da_DK".into()),
        }
    }

    fn property<'a>(tags: &'a [MetaTag], key: &str) -> Option<&'a str> {
        tags.iter().find_map(|t| match t {
            MetaTag::Property { property, content } if *property == key => Some(content.as_str()),
            _ => None,
        })
    }

    #[test]
    fn test_canonical_url_joins_cleanly() {
        assert_eq!(canonical_url("https://example.dk", "/faq"), "https://example.dk/faq");
        assert_eq!(canonical_url("https://example.dk/", "/faq"), "https://example.dk/faq");
        assert_eq!(canonical_url("https://example.dk", "faq"), "https://example.dk/faq");
        assert_eq!(canonical_url("https://example.dk", "/"), "https://example.dk/");
    }

    #[test]
    fn test_full_tag_order() {
        let mut opts = options();
        opts.image = Some("https://cms.example.dk/hero.jpg".into());
        let tags = build_meta(&opts);

        let keys: Vec<String> = tags
            .iter()
            .map(|t| match t {
                MetaTag::Title { .. } => "title".to_string(),
                MetaTag::Name { name, .. } => format!("name={name}"),
                MetaTag::Property { property, .. } => format!("property={property}"),
                MetaTag::Link { rel, .. } => format!("rel={rel}"),
            })
            .collect();

        assert_eq!(
            keys,
            [
                "title",
                "name=description",
                "property=og:title",
                "property=og:description",
                "property=og:url",
                "property=og:site_name",
                "property=og:type",
                "property=og:locale",
                "property=og:image",
                "rel=canonical",
            ]
        );
    }

    #[test]
    fn test_canonical_emitted_once_and_absolute() {
        let tags = build_meta(&options());
        let canonicals: Vec<&MetaTag> = tags
            .iter()
            .filter(|t| matches!(t, MetaTag::Link { rel: "canonical", .. }))
            .collect();
        assert_eq!(canonicals.len(), 1);
        assert_eq!(canonicals[0].value(), "https://example.dk/faq");
        assert_eq!(property(&tags, "og:url"), Some("https://example.dk/faq"));
    }

    #[test]
    fn test_relative_url_is_made_absolute() {
        let mut opts = options();
        opts.url = "/faq".into();
        let tags = build_meta(&opts);
        assert_eq!(tags.last().unwrap().value(), "https://example.dk/faq");
        assert_eq!(property(&tags, "og:url"), Some("https://example.dk/faq"));
    }

    #[test]
    fn test_missing_optionals_are_omitted() {
        let mut opts = options();
        opts.description = Some("   ".into());
        opts.image = Some(String::new());
        opts.locale = None;
        let tags = build_meta(&opts);

        assert!(tags.iter().all(|t| !t.value().trim().is_empty()));
        assert!(property(&tags, "og:description").is_none());
        assert!(property(&tags, "og:image").is_none());
        assert!(property(&tags, "og:locale").is_none());
        assert!(!tags.iter().any(|t| matches!(t, MetaTag::Name { .. })));
        assert_eq!(property(&tags, "og:type"), Some("website"));
    }

    #[test]
    fn test_html_rendering_escapes_values() {
        let mut opts = options();
        opts.title = r#"Priser & "Forløb""#.into();
        let head = render_head(&build_meta(&opts));
        assert!(head.starts_with("<title>Priser &amp; &quot;Forløb&quot;</title>"));
        assert!(head.contains(r#"<link rel="canonical" href="https://example.dk/faq">"#));
    }

    #[test]
    fn test_tag_json_shape() {
        let tags = build_meta(&options());
        let json = serde_json::to_value(&tags).unwrap();
        assert_eq!(json[0]["title"], "FAQ | Specialklinik Taastrup");
        assert_eq!(json[1]["name"], "description");
        assert_eq!(json[2]["property"], "og:title");
        assert_eq!(json.as_array().unwrap().last().unwrap()["rel"], "canonical");
    }
}
