//! Viewport state for a paginated document viewer.
//!
//! This crate decides *what* a page viewer should draw and *when*: current
//! page, zoom, rotation, container width, and which render output is on
//! screen while a newer one is still being produced. Rasterizing pages is
//! left to a [`PageRenderer`] supplied by the host, and user-facing errors
//! go to a [`NotificationSink`].
//!
//! ```
//! use pdf_viewport_core::{Notification, StepDirection, ViewerConfig, ViewportController};
//!
//! let mut viewport = ViewportController::new(&ViewerConfig::default(), Vec::<Notification>::new());
//! viewport.on_document_loaded(5);
//! viewport.set_page(3);
//! viewport.step_page(StepDirection::Next);
//! assert_eq!(viewport.current_page(), 4);
//! ```

pub mod config;
pub mod error;
pub mod fullscreen;
pub mod notify;
pub mod page_input;
pub mod render;
pub mod viewport;

pub use config::ViewerConfig;
pub use error::{ConfigError, PageInputError, RenderError, ViewerError, ViewerResult};
pub use fullscreen::FullscreenViewport;
pub use notify::{Notification, NotificationKind, NotificationSink};
pub use page_input::PageInput;
pub use render::{
    DocumentInfo, DocumentSource, PageRenderer, RenderRequest, RenderToken, Rotation, Scale,
};
pub use viewport::{
    RenderPhase, StepDirection, ViewportController, ViewportEvent, ViewportState, VisibleLayers,
};
