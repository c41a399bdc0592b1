//! Domain types for content pulled from the CMS.
//!
//! Both types are request-scoped: fetched once per render, never mutated,
//! dropped when the render finishes.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SiteInfo
// ---------------------------------------------------------------------------

/// Site identity as published by the content backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteInfo {
    /// Site name (e.g. "Specialklinik Taastrup").
    pub name: String,
    /// Tagline / short description.
    pub description: String,
}

// ---------------------------------------------------------------------------
// PageContent
// ---------------------------------------------------------------------------

/// A single CMS page. The HTML fields are exactly as the backend rendered them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    /// Page title. May contain entities or inline markup.
    pub title: String,
    /// Rendered excerpt HTML.
    pub excerpt_html: String,
    /// Rendered body HTML.
    pub body_html: String,
    /// Absolute URL of the featured image, if one is attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image_url: Option<String>,
    /// First publication time, if the backend supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<ContentDate>,
    /// Last modification time, if the backend supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<ContentDate>,
}

// ---------------------------------------------------------------------------
// ContentDate
// ---------------------------------------------------------------------------

/// A CMS timestamp, with or without an explicit UTC offset.
///
/// WordPress sends `date` as a naive local time (`2024-03-01T09:30:00`) and
/// `date_gmt` without a suffix either, so both shapes have to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentDate {
    Zoned(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

impl ContentDate {
    /// Parse an RFC 3339 or naive ISO 8601 timestamp. Returns `None` for
    /// anything else, so a malformed field is simply treated as absent.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self::Zoned(dt));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
            .ok()
            .map(Self::Naive)
    }

    /// ISO 8601 form used in structured data.
    pub fn to_iso8601(&self) -> String {
        match self {
            Self::Zoned(dt) => dt.to_rfc3339(),
            Self::Naive(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }

    /// `YYYY-MM-DD` form used in sitemaps.
    pub fn to_ymd(&self) -> String {
        match self {
            Self::Zoned(dt) => dt.format("%Y-%m-%d").to_string(),
            Self::Naive(dt) => dt.format("%Y-%m-%d").to_string(),
        }
    }
}
