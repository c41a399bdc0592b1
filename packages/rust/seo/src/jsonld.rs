//! schema.org structured data (`WebSite` / `WebPage`).

use serde_json::{Map, Value, json};

use crate::meta::canonical_url;
use crate::text::present;

const SCHEMA_CONTEXT: &str = "https://schema.org";

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The site-level node every document refers to.
#[derive(Debug, Clone)]
pub struct WebSiteNode {
    pub name: String,
    /// Absolute site origin.
    pub url: String,
    pub description: Option<String>,
    /// Open Graph style locale (`da_DK`); emitted as a BCP 47 tag.
    pub locale: Option<String>,
}

impl WebSiteNode {
    fn root_url(&self) -> String {
        canonical_url(&self.url, "/")
    }

    fn id(&self) -> String {
        format!("{}#website", self.root_url())
    }

    fn language(&self) -> Option<String> {
        present(self.locale.as_deref()).map(|l| l.replace('_', "-"))
    }
}

/// A page backed by resolved CMS content.
#[derive(Debug, Clone)]
pub struct WebPageNode {
    /// Absolute canonical URL.
    pub url: String,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub date_published: Option<String>,
    pub date_modified: Option<String>,
}

// ---------------------------------------------------------------------------
// JsonLdDocument
// ---------------------------------------------------------------------------

/// A JSON-LD document. Always carries `@context`, `@type`, `url`, and `name`.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonLdDocument(Value);

impl JsonLdDocument {
    /// `WebSite` or `WebPage`.
    pub fn schema_type(&self) -> &str {
        self.0["@type"].as_str().unwrap_or_default()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Render as an embeddable script block. `</` is escaped so CMS text
    /// can never close the element early.
    pub fn to_script_tag(&self) -> String {
        let json = self.0.to_string().replace("</", "<\\/");
        format!(r#"<script type="application/ld+json">{json}</script>"#)
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Pick the schema for a page: `WebPage` when CMS content backs it,
/// `WebSite` otherwise.
pub fn build_json_ld(site: &WebSiteNode, page: Option<&WebPageNode>) -> JsonLdDocument {
    match page {
        Some(page) => build_page_json_ld(site, page),
        None => build_website_json_ld(site),
    }
}

/// `WebSite` document for a page without structured CMS content.
pub fn build_website_json_ld(site: &WebSiteNode) -> JsonLdDocument {
    let mut doc = Map::new();
    doc.insert("@context".into(), json!(SCHEMA_CONTEXT));
    doc.insert("@type".into(), json!("WebSite"));
    doc.insert("@id".into(), json!(site.id()));
    doc.insert("url".into(), json!(site.root_url()));
    doc.insert("name".into(), json!(site.name));
    insert_present(&mut doc, "description", site.description.as_deref());
    insert_present(&mut doc, "inLanguage", site.language().as_deref());

    JsonLdDocument(Value::Object(doc))
}

/// `WebPage` document that points at its `WebSite` via `isPartOf`.
pub fn build_page_json_ld(site: &WebSiteNode, page: &WebPageNode) -> JsonLdDocument {
    let mut doc = Map::new();
    doc.insert("@context".into(), json!(SCHEMA_CONTEXT));
    doc.insert("@type".into(), json!("WebPage"));
    doc.insert("@id".into(), json!(format!("{}#webpage", page.url)));
    doc.insert("url".into(), json!(page.url));
    doc.insert("name".into(), json!(page.name));
    insert_present(&mut doc, "description", page.description.as_deref());
    insert_present(&mut doc, "inLanguage", site.language().as_deref());
    doc.insert(
        "isPartOf".into(),
        json!({
            "@type": "WebSite",
            "@id": site.id(),
            "url": site.root_url(),
            "name": site.name,
        }),
    );
    insert_present(&mut doc, "datePublished", page.date_published.as_deref());
    insert_present(&mut doc, "dateModified", page.date_modified.as_deref());
    insert_present(&mut doc, "image", page.image.as_deref());

    JsonLdDocument(Value::Object(doc))
}

fn insert_present(doc: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = present(value) {
        doc.insert(key.to_string(), json!(value));
    }
}
