//! Fullscreen overlay viewport
//!
//! Shows every page, top to bottom, at the overlay width. There is no zoom
//! or rotation here, so nothing ever re-renders and no swap logic is needed.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::config::ViewerConfig;
use crate::notify::{Notification, NotificationSink};
use crate::render::{RenderRequest, RenderToken, Rotation, Scale};

pub struct FullscreenViewport<S> {
    is_open: bool,
    total_pages: Option<u32>,
    width: Option<u32>,
    fallback_width: u32,
    rendered: BTreeSet<u32>,
    sink: S,
}

impl<S: NotificationSink> FullscreenViewport<S> {
    pub fn new(config: &ViewerConfig, sink: S) -> Self {
        Self {
            is_open: false,
            total_pages: None,
            width: None,
            fallback_width: config.fallback_width.max(1),
            rendered: BTreeSet::new(),
            sink,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn open(&mut self) {
        if !self.is_open {
            debug!("fullscreen opened");
            self.is_open = true;
        }
    }

    /// Closing unmounts the overlay content, so rendered pages are forgotten
    pub fn close(&mut self) {
        if self.is_open {
            debug!("fullscreen closed");
            self.is_open = false;
            self.rendered.clear();
        }
    }

    /// The overlay's open-change callback
    pub fn toggle(&mut self) {
        if self.is_open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn on_document_loaded(&mut self, total_pages: u32) {
        if self.total_pages != Some(total_pages) {
            debug!(total_pages, "fullscreen document loaded");
            self.total_pages = Some(total_pages);
            self.rendered.retain(|page| *page <= total_pages);
        }
    }

    pub fn on_document_load_failed(&mut self) {
        warn!("fullscreen document failed to load");
        self.sink.notify(Notification::load_failed());
    }

    pub fn on_container_width_changed(&mut self, width: Option<u32>) {
        self.width = width;
    }

    pub fn render_width(&self) -> u32 {
        self.width
            .filter(|w| *w > 0)
            .unwrap_or(self.fallback_width)
    }

    /// One request per page, in page order. Empty while closed or before
    /// the page count is known.
    pub fn render_requests(&self) -> Vec<RenderRequest> {
        if !self.is_open {
            return Vec::new();
        }
        let width = self.render_width();
        (1..=self.total_pages.unwrap_or(0))
            .map(|page| RenderRequest {
                token: RenderToken {
                    page,
                    scale: Scale::ACTUAL_SIZE,
                    rotation: Rotation::NONE,
                },
                width,
            })
            .collect()
    }

    /// Mark a page as drawn. Ignored while closed or for pages past the end.
    pub fn on_page_rendered(&mut self, page: u32) -> bool {
        let in_range = self.total_pages.is_some_and(|total| (1..=total).contains(&page));
        self.is_open && in_range && self.rendered.insert(page)
    }

    pub fn is_page_rendered(&self, page: u32) -> bool {
        self.rendered.contains(&page)
    }

    /// First page still waiting to be drawn
    pub fn next_unrendered(&self) -> Option<u32> {
        if !self.is_open {
            return None;
        }
        (1..=self.total_pages?).find(|page| !self.rendered.contains(page))
    }
}
