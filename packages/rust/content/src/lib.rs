//! Optional CMS content for page renders.
//!
//! The CMS is an enhancement, not a dependency: the site must be fully
//! navigable and complete for search engines from static copy alone.
//! This crate provides:
//! - [`ContentSource`]: the read-only capability (WordPress, disabled)
//! - [`Resolver`]: turns every fetch into an `Option`, one guard per fetch

mod resolver;
mod source;
mod wordpress;

pub use resolver::{ContentNeeds, ResolvedContent, Resolver};
pub use source::{ConfiguredSource, ContentKind, ContentSource, DisabledSource, PageRef};
pub use wordpress::WordPressSource;
