//! SEO head tags and JSON-LD structured data.
//!
//! Everything here is pure and synchronous: values come in already resolved
//! (explicit override, CMS content, or static copy) and nothing can fail.
//! Search engines and link previews read this output literally, so the tag
//! set, order, and URL shapes are stable.

mod jsonld;
mod meta;
mod text;

pub use jsonld::{
    JsonLdDocument, WebPageNode, WebSiteNode, build_json_ld, build_page_json_ld,
    build_website_json_ld,
};
pub use meta::{MetaOptions, MetaTag, OG_TYPE_WEBSITE, build_meta, canonical_url, render_head};
pub use text::{coalesce, coalesce_opt, collapse_whitespace, escape_html, present, strip_html};
