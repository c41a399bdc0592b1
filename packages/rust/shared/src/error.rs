//! Error types for the clinic site.
//!
//! Library crates use [`SiteError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all clinic site operations.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Transport-level failure talking to the content source.
    #[error("network error: {0}")]
    Network(String),

    /// The content source answered with a non-2xx status.
    #[error("{url}: HTTP {status}")]
    Http { url: String, status: u16 },

    /// The content source answered, but the body could not be decoded.
    #[error("malformed payload: {0}")]
    Payload(String),

    /// The requested content does not exist upstream.
    #[error("content not found: {0}")]
    NotFound(String),

    /// The fetch did not settle within the configured timeout.
    #[error("timed out after {0} ms")]
    Timeout(u64),

    /// No content source is configured for this deployment.
    #[error("content source disabled")]
    ContentDisabled,

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Static route data is broken (missing title, relative path, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SiteError>;

impl SiteError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error comes from an optional content fetch.
    ///
    /// Soft errors degrade to static fallback copy; everything else is a
    /// defect in static configuration and must stop the render.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            Self::Network(_)
                | Self::Http { .. }
                | Self::Payload(_)
                | Self::NotFound(_)
                | Self::Timeout(_)
                | Self::ContentDisabled
        )
    }
}
