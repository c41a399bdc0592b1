//! Core rendering and site assembly for the clinic website.
//!
//! This crate ties together the route table, CMS content resolution, and
//! SEO metadata into end-to-end workflows (e.g., `build_site`, `router`).

pub mod build;
pub mod render;
pub mod routes;
pub mod server;
pub mod site_files;

pub use build::{BuildResult, ProgressReporter, SilentProgress, build_site, output_path};
pub use render::{PageHead, RenderedPage, SiteContext, build_head, render_page, render_route};
pub use routes::{
    NOT_FOUND, ROUTES, RouteContent, RouteMetaConfig, expand, find_route, route_for,
    validate_routes,
};
pub use server::{ServerState, router};
pub use site_files::{SitemapEntry, robots_txt, sitemap_entries, sitemap_xml};
