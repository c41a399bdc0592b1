//! HTTP serving of rendered pages.
//!
//! Every request renders on the fly, so CMS edits show up without a rebuild
//! and a CMS outage degrades to static copy instead of an error page.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, Uri, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tracing::{debug, info};

use clinicsite_content::{ContentSource, PageRef, Resolver};
use clinicsite_seo::canonical_url;

use crate::render::{SiteContext, render_route};
use crate::routes::ROUTES;
use crate::site_files::{robots_txt, sitemap_entries, sitemap_xml};

/// Shared request state.
pub struct ServerState<S> {
    pub resolver: Resolver<S>,
    pub site: SiteContext,
}

/// Build the site router.
pub fn router<S: ContentSource + 'static>(resolver: Resolver<S>, site: SiteContext) -> Router {
    info!(source = resolver.source().name(), origin = %site.origin, "site router ready");

    Router::new()
        .route("/healthz", get(health_check))
        .route("/robots.txt", get(robots::<S>))
        .route("/sitemap.xml", get(sitemap::<S>))
        .fallback(page::<S>)
        .with_state(Arc::new(ServerState { resolver, site }))
}

async fn health_check() -> &'static str {
    "ok"
}

async fn robots<S: ContentSource + 'static>(State(state): State<Arc<ServerState<S>>>) -> String {
    robots_txt(&state.site)
}

async fn sitemap<S: ContentSource + 'static>(
    State(state): State<Arc<ServerState<S>>>,
) -> impl IntoResponse {
    let mut entries = sitemap_entries(&state.site, ROUTES);

    let home = canonical_url(&state.site.origin, "/");
    if let Some(modified) = state
        .resolver
        .page(&PageRef::Front)
        .await
        .and_then(|p| p.modified)
    {
        if let Some(entry) = entries.iter_mut().find(|e| e.loc == home) {
            entry.lastmod = Some(modified.to_ymd());
        }
    }

    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        sitemap_xml(&entries),
    )
}

async fn page<S: ContentSource + 'static>(
    State(state): State<Arc<ServerState<S>>>,
    uri: Uri,
) -> Response {
    let page = render_route(&state.resolver, &state.site, uri.path()).await;
    let status = StatusCode::from_u16(page.status()).unwrap_or(StatusCode::OK);

    debug!(path = uri.path(), status = status.as_u16(), "served page");
    (status, Html(page.html)).into_response()
}
