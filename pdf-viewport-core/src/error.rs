//! Error types for the viewport core
//!
//! None of these are fatal to the hosting application. Load and render
//! failures are surfaced through a [`NotificationSink`](crate::notify::NotificationSink),
//! page input errors stay local to the page text box.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by controller operations
#[derive(Error, Debug)]
pub enum ViewerError {
    /// Zoom value outside the configured set
    #[error("unsupported zoom level: {percent}%")]
    UnsupportedScale { percent: u16 },

    /// Page jump text rejected
    #[error(transparent)]
    PageInput(#[from] PageInputError),
}

/// Result type alias for viewport operations
pub type ViewerResult<T> = Result<T, ViewerError>;

/// Reasons a typed page number is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageInputError {
    #[error("page number is empty")]
    Empty,

    #[error("'{0}' is not a page number")]
    NotANumber(String),

    #[error("page {page} is out of range (1-{total_pages})")]
    OutOfRange { page: u32, total_pages: u32 },

    #[error("page numbers start at 1")]
    Zero,

    #[error("'{0}' is too large to be a page number")]
    TooLarge(String),
}

/// Failures reported by a [`PageRenderer`](crate::render::PageRenderer)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("failed to open document: {0}")]
    Load(String),

    #[error("page {page} does not exist")]
    PageOutOfBounds { page: u32 },

    #[error("failed to render page {page}: {reason}")]
    Page { page: u32, reason: String },
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("zoom level list is empty")]
    NoZoomLevels,

    #[error("zoom level must be positive")]
    ZeroZoomLevel,

    #[error("default zoom {0}% is not one of the zoom levels")]
    DefaultZoomMissing(u16),

    #[error("fallback width must be at least 1px")]
    ZeroFallbackWidth,
}
