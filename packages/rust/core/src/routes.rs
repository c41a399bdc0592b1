//! Static route table: one [`RouteMetaConfig`] per public path.
//!
//! Titles and descriptions here are the last tier of every fallback chain,
//! so they must exist and be non-empty for every route. `{site}` expands to
//! the resolved site name and `{sep}` to the configured title separator.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use clinicsite_content::{ContentNeeds, PageRef};
use clinicsite_seo::OG_TYPE_WEBSITE;
use clinicsite_shared::{Result, SiteError};

/// What CMS content a route is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteContent {
    /// Site name and tagline only.
    SiteInfo,
    /// Site info plus the CMS front page (excerpt, body, featured image).
    FrontPage,
}

/// Build-time metadata for one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMetaConfig {
    /// Absolute path, e.g. `/faq`.
    pub path: &'static str,
    pub title_template: &'static str,
    pub fallback_description: &'static str,
    /// Route-specific locale. `None` uses the site locale.
    pub locale: Option<&'static str>,
    pub content_type: &'static str,
    pub content: RouteContent,
    /// Static `<h1>`.
    pub heading: &'static str,
    /// Static lead paragraph.
    pub intro: &'static str,
    /// Listed in the sitemap.
    pub indexable: bool,
}

impl RouteMetaConfig {
    /// Content to resolve before rendering.
    pub fn needs(&self) -> ContentNeeds {
        match self.content {
            RouteContent::SiteInfo => ContentNeeds::site_only(),
            RouteContent::FrontPage => ContentNeeds::with_page(PageRef::Front),
        }
    }
}

/// Expand `{site}` and `{sep}`.
pub fn expand(template: &str, site_name: &str, separator: &str) -> String {
    template
        .replace("{sep}", separator)
        .replace("{site}", site_name)
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

const fn route(
    path: &'static str,
    title_template: &'static str,
    fallback_description: &'static str,
    heading: &'static str,
    intro: &'static str,
) -> RouteMetaConfig {
    RouteMetaConfig {
        path,
        title_template,
        fallback_description,
        locale: None,
        content_type: OG_TYPE_WEBSITE,
        content: RouteContent::SiteInfo,
        heading,
        intro,
        indexable: true,
    }
}

/// Every public route, in sitemap order.
pub static ROUTES: &[RouteMetaConfig] = &[
    RouteMetaConfig {
        content: RouteContent::FrontPage,
        ..route(
            "/",
            "{site}",
            "Professionel omskæring i trygge rammer for drengebørn. Tryghed - hele vejen.",
            "Tryghed - hele vejen",
            "Erfarne læger, rolige rammer og grundig vejledning før, under og efter indgrebet.",
        )
    },
    route(
        "/omskaering",
        "Omskæring{sep}{site}",
        "Information om rituel drengeomskæring, sikkerhed, regler og metoder hos {site}.",
        "Omskæring",
        "Her kan I læse om indgrebet, de gældende regler og de metoder, vi tilbyder.",
    ),
    route(
        "/forberedelse-inden-omskaering",
        "Forberedelse inden omskæring{sep}{site}",
        "Sådan forbereder I jer før omskæringsproceduren: tryllecreme, sukkervand, dokumenter og praktiske forhold.",
        "Forberedelse inden omskæring",
        "En god forberedelse gør dagen lettere for både barn og forældre.",
    ),
    route(
        "/omskaering-med-klassisk-metode",
        "Omskæring med klassisk metode{sep}{site}",
        "Information om omskæring med den klassiske metode: bedøvelse, procedure, efterforløb, inflammation og komplikationer.",
        "Omskæring med klassisk metode",
        "Den klassiske metode udføres i lokalbedøvelse og afsluttes med opløselige sting.",
    ),
    route(
        "/omskaering-med-ringmetoden",
        "Omskæring med ringmetoden{sep}{site}",
        "Information om Circumplast® ringmetoden: procedure, efterforløb, inflammation og komplikationer.",
        "Omskæring med ringmetoden",
        "Med ringmetoden sidder en lille plastring på, indtil den falder af af sig selv.",
    ),
    route(
        "/omskaering-med-fuld-bedoevelse",
        "Omskæring med fuld bedøvelse{sep}{site}",
        "Information om omskæring under narkose eller sedation, booking og praktiske kriterier.",
        "Omskæring med fuld bedøvelse",
        "For ældre børn kan indgrebet udføres i fuld bedøvelse efter aftale.",
    ),
    route(
        "/om-os",
        "Om os{sep}{site}",
        "{site} har mange års erfaring i rituel drengeomskæring.",
        "Om os",
        "Vi er et lille, erfarent team med fokus på tryghed og grundig information.",
    ),
    route(
        "/faq",
        "FAQ{sep}{site}",
        "Ofte stillede spørgsmål om omskæring, forberedelse, smertelindring, efterforløb og sikkerhed.",
        "Ofte stillede spørgsmål",
        "Svar på de spørgsmål, forældre oftest stiller os før og efter indgrebet.",
    ),
    route(
        "/kontakt-os",
        "Kontakt os{sep}{site}",
        "Kontakt {site} ved spørgsmål om omskæring, booking og forberedelse.",
        "Kontakt os",
        "Ring eller skriv til os, hvis I har spørgsmål. Vi svarer hurtigst muligt.",
    ),
    route(
        "/booking",
        "Booking{sep}{site}",
        "Book tid online til omskæring. Læs forberedelse og praktisk information før tidsbestilling.",
        "Booking",
        "Læs siden om forberedelse, før I bestiller tid.",
    ),
    route(
        "/priser",
        "Priser{sep}{site}",
        "Se priser for konsultationer og behandlingsforløb hos {site}.",
        "Priser",
        "Prisen afhænger af metode og bedøvelse. Betaling sker ved fremmøde i klinikken.",
    ),
];

/// Rendered for any path not in [`ROUTES`].
pub static NOT_FOUND: RouteMetaConfig = RouteMetaConfig {
    indexable: false,
    ..route(
        "/404",
        "Siden blev ikke fundet{sep}{site}",
        "Siden findes ikke. Gå til forsiden af {site} for at finde information om omskæring.",
        "Siden blev ikke fundet",
        "Den side, du leder efter, er flyttet eller findes ikke længere.",
    )
};

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Look up a public route. A trailing slash is ignored.
pub fn find_route(path: &str) -> Option<&'static RouteMetaConfig> {
    let trimmed = path.trim_end_matches('/');
    let normalized = if trimmed.is_empty() { "/" } else { trimmed };
    ROUTES.iter().find(|r| r.path == normalized)
}

/// The route for `path`, or [`NOT_FOUND`].
pub fn route_for(path: &str) -> &'static RouteMetaConfig {
    find_route(path).unwrap_or(&NOT_FOUND)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check the static table. Any failure here is a programming error.
pub fn validate_routes(routes: &[RouteMetaConfig]) -> Result<()> {
    static PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^/(?:[a-z0-9]+(?:-[a-z0-9]+)*(?:/[a-z0-9]+(?:-[a-z0-9]+)*)*)?$")
            .expect("valid regex")
    });

    let mut seen = HashSet::new();

    for route in routes {
        if !PATH_RE.is_match(route.path) {
            return Err(SiteError::validation(format!(
                "route path '{}' must be an absolute lowercase slug path",
                route.path
            )));
        }
        if !seen.insert(route.path) {
            return Err(SiteError::validation(format!(
                "route path '{}' is defined twice",
                route.path
            )));
        }
        if route.title_template.trim().is_empty() {
            return Err(SiteError::validation(format!(
                "route '{}' has no title template",
                route.path
            )));
        }
        if route.fallback_description.trim().is_empty() {
            return Err(SiteError::validation(format!(
                "route '{}' has no fallback description",
                route.path
            )));
        }
        if route.content_type != OG_TYPE_WEBSITE {
            return Err(SiteError::validation(format!(
                "route '{}' has unsupported content type '{}'",
                route.path, route.content_type
            )));
        }
    }

    Ok(())
}
