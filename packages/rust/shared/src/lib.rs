//! Shared types, error model, and configuration for the clinic site.
//!
//! This crate is the foundation depended on by all other clinicsite crates.
//! It provides:
//! - [`SiteError`]: the unified error type
//! - Content types ([`SiteInfo`], [`PageContent`], [`ContentDate`])
//! - Configuration ([`AppConfig`], [`SiteConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONTENT_API_URL_ENV, ContentConfig, PageOverride, SiteConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{Result, SiteError};
pub use types::{ContentDate, PageContent, SiteInfo};
