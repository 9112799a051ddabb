//! Viewport controller
//!
//! Owns page, zoom, rotation and render-settlement state for the inline
//! viewer. A new render request replaces the visible page only once it
//! succeeds, so changing zoom or rotation never flashes an empty frame.

use tracing::{debug, warn};

use crate::config::ViewerConfig;
use crate::error::{PageInputError, RenderError, ViewerError, ViewerResult};
use crate::notify::{Notification, NotificationSink};
use crate::page_input::PageInput;
use crate::render::{RenderRequest, RenderToken, Rotation, Scale};

/// Snapshot of the navigation and zoom state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportState {
    /// 1-based, never above `total_pages` once that is known
    pub current_page: u32,
    /// `None` until the document has loaded
    pub total_pages: Option<u32>,
    pub scale: Scale,
    pub rotation: Rotation,
    /// Zoom of the most recently settled render
    pub rendered_scale: Option<Scale>,
}

/// Where the current render cycle stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    /// Nothing to draw yet
    Idle,
    /// A request is in flight. `stale` is the last settled output, which
    /// stays on screen meanwhile.
    Revalidating { stale: Option<RenderToken> },
    /// The requested render is the one on screen
    Settled(RenderToken),
    /// The request for `token` failed; `stale` stays on screen until the
    /// next parameter change issues a fresh request
    Failed {
        token: RenderToken,
        stale: Option<RenderToken>,
    },
}

/// What the host should paint right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleLayers {
    /// Drawn and visible
    pub shown: Option<RenderToken>,
    /// Drawn but hidden until it settles
    pub pending: Option<RenderToken>,
}

/// Previous/next navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Previous,
    Next,
}

/// Inputs the host routes into the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewportEvent {
    SetPage(u32),
    Step(StepDirection),
    SetScale(Scale),
    Rotate,
    EditPageInput(String),
    SubmitPageInput,
    DocumentLoaded { total_pages: u32 },
    DocumentLoadFailed,
    RenderSucceeded(RenderToken),
    RenderFailed(RenderToken, RenderError),
    ContainerWidthChanged(Option<u32>),
}

pub struct ViewportController<S> {
    state: ViewportState,
    zoom_levels: Vec<Scale>,
    width: Option<u32>,
    fallback_width: u32,
    requested: Option<RenderToken>,
    phase: RenderPhase,
    page_input: PageInput,
    sink: S,
}

impl<S: NotificationSink> ViewportController<S> {
    pub fn new(config: &ViewerConfig, sink: S) -> Self {
        let mut zoom_levels = config.scales();
        if zoom_levels.is_empty() {
            zoom_levels.push(Scale::ACTUAL_SIZE);
        }
        let default_scale = config.default_scale();
        let scale = if zoom_levels.contains(&default_scale) {
            default_scale
        } else {
            warn!(default = %default_scale, "default zoom not in zoom levels, using first level");
            zoom_levels[0]
        };
        Self {
            state: ViewportState {
                current_page: 1,
                total_pages: None,
                scale,
                rotation: Rotation::NONE,
                rendered_scale: None,
            },
            zoom_levels,
            width: None,
            fallback_width: config.fallback_width.max(1),
            requested: None,
            phase: RenderPhase::Idle,
            page_input: PageInput::new(),
            sink,
        }
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn current_page(&self) -> u32 {
        self.state.current_page
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.state.total_pages
    }

    pub fn scale(&self) -> Scale {
        self.state.scale
    }

    pub fn rotation(&self) -> Rotation {
        self.state.rotation
    }

    pub fn rendered_scale(&self) -> Option<Scale> {
        self.state.rendered_scale
    }

    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    pub fn zoom_levels(&self) -> &[Scale] {
        &self.zoom_levels
    }

    pub fn page_input(&self) -> &PageInput {
        &self.page_input
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Route a host event to its transition
    pub fn apply(&mut self, event: ViewportEvent) -> ViewerResult<()> {
        match event {
            ViewportEvent::SetPage(page) => self.set_page(page),
            ViewportEvent::Step(direction) => {
                self.step_page(direction);
            }
            ViewportEvent::SetScale(scale) => self.set_scale(scale)?,
            ViewportEvent::Rotate => self.rotate(),
            ViewportEvent::EditPageInput(text) => self.edit_page_input(text),
            ViewportEvent::SubmitPageInput => {
                self.submit_page_input()?;
            }
            ViewportEvent::DocumentLoaded { total_pages } => self.on_document_loaded(total_pages),
            ViewportEvent::DocumentLoadFailed => self.on_document_load_failed(),
            ViewportEvent::RenderSucceeded(token) => {
                self.on_page_render_succeeded(token);
            }
            ViewportEvent::RenderFailed(token, err) => {
                self.on_page_render_failed(token, &err);
            }
            ViewportEvent::ContainerWidthChanged(width) => self.on_container_width_changed(width),
        }
        Ok(())
    }

    /// Jump to `page`, clamped into `[1, total_pages]` (or `>= 1` while the
    /// page count is unknown)
    pub fn set_page(&mut self, page: u32) {
        let clamped = self.clamp_page(page);
        if clamped != self.state.current_page {
            debug!(from = self.state.current_page, to = clamped, "page changed");
            self.state.current_page = clamped;
        }
        self.page_input.sync(clamped);
        self.revalidate();
    }

    /// Whether the previous/next control is enabled
    pub fn can_step(&self, direction: StepDirection) -> bool {
        match direction {
            StepDirection::Previous => self.state.current_page > 1,
            StepDirection::Next => self
                .state
                .total_pages
                .is_some_and(|total| self.state.current_page < total),
        }
    }

    /// Move one page. Returns `false` and changes nothing at a boundary.
    pub fn step_page(&mut self, direction: StepDirection) -> bool {
        if !self.can_step(direction) {
            return false;
        }
        let target = match direction {
            StepDirection::Previous => self.state.current_page - 1,
            StepDirection::Next => self.state.current_page + 1,
        };
        self.set_page(target);
        true
    }

    /// Change zoom. The page at the previous zoom stays visible until the
    /// new one settles.
    pub fn set_scale(&mut self, scale: Scale) -> ViewerResult<()> {
        if !self.zoom_levels.contains(&scale) {
            return Err(ViewerError::UnsupportedScale {
                percent: scale.percent(),
            });
        }
        if scale != self.state.scale {
            debug!(from = %self.state.scale, to = %scale, "zoom changed");
            self.state.scale = scale;
            self.revalidate();
        }
        Ok(())
    }

    /// Quarter turn clockwise, same swap rule as zoom changes
    pub fn rotate(&mut self) {
        self.state.rotation = self.state.rotation.rotated();
        debug!(rotation = %self.state.rotation, "rotated");
        self.revalidate();
    }

    pub fn edit_page_input(&mut self, text: impl Into<String>) {
        self.page_input.edit(text);
    }

    /// Validate the page text box and jump there. An invalid entry leaves
    /// the viewport untouched and the text box in its error state.
    pub fn submit_page_input(&mut self) -> Result<u32, PageInputError> {
        let page = self.page_input.submit(self.state.total_pages)?;
        self.set_page(page);
        Ok(self.state.current_page)
    }

    pub fn on_document_loaded(&mut self, total_pages: u32) {
        if self.state.total_pages != Some(total_pages) {
            debug!(total_pages, "document loaded");
            self.state.total_pages = Some(total_pages);
        }
        if total_pages > 0 && self.state.current_page > total_pages {
            self.state.current_page = total_pages;
            self.page_input.sync(total_pages);
        }
        self.revalidate();
    }

    /// Report the failure; navigation state is left as it was
    pub fn on_document_load_failed(&mut self) {
        warn!("document failed to load");
        self.sink.notify(Notification::load_failed());
    }

    /// Settle a finished render. Returns `false` for events that no longer
    /// match the current request, or that were already applied.
    pub fn on_page_render_succeeded(&mut self, token: RenderToken) -> bool {
        if self.requested != Some(token) {
            debug!(?token, "ignoring stale render");
            return false;
        }
        if self.phase == RenderPhase::Settled(token) {
            return false;
        }
        debug!(page = token.page, scale = %token.scale, rotation = %token.rotation, "render settled");
        self.phase = RenderPhase::Settled(token);
        self.state.rendered_scale = Some(token.scale);
        true
    }

    /// Record a failed render and notify once. The last settled page, if
    /// any, remains on screen.
    pub fn on_page_render_failed(&mut self, token: RenderToken, err: &RenderError) -> bool {
        if self.requested != Some(token) {
            debug!(?token, "ignoring stale render failure");
            return false;
        }
        let stale = match self.phase {
            RenderPhase::Revalidating { stale } => stale,
            RenderPhase::Failed { token: failed, .. } if failed == token => return false,
            RenderPhase::Failed { stale, .. } => stale,
            // Redrawing the settled page (e.g. at a new width) failed; the
            // earlier output stays up
            RenderPhase::Settled(settled) => Some(settled),
            RenderPhase::Idle => return false,
        };
        warn!(page = token.page, %err, "page render failed");
        self.phase = RenderPhase::Failed { token, stale };
        self.sink.notify(Notification::render_failed(token.page));
        true
    }

    /// Record the measured container width. `None` means not measured yet.
    pub fn on_container_width_changed(&mut self, width: Option<u32>) {
        self.width = width;
    }

    /// Width the next render should use
    pub fn render_width(&self) -> u32 {
        self.width
            .filter(|w| *w > 0)
            .unwrap_or(self.fallback_width)
    }

    /// The render the viewer wants right now, if a document is loaded
    pub fn current_request(&self) -> Option<RenderRequest> {
        self.requested.map(|token| RenderRequest {
            token,
            width: self.render_width(),
        })
    }

    pub fn visible_layers(&self) -> VisibleLayers {
        match self.phase {
            RenderPhase::Idle => VisibleLayers::default(),
            RenderPhase::Settled(token) => VisibleLayers {
                shown: Some(token),
                pending: None,
            },
            RenderPhase::Revalidating { stale } | RenderPhase::Failed { stale, .. } => {
                VisibleLayers {
                    shown: stale,
                    pending: self.requested,
                }
            }
        }
    }

    /// True once the current request has failed. The host should not
    /// redraw it again until a page, zoom or rotation change.
    pub fn render_blocked(&self) -> bool {
        matches!(self.phase, RenderPhase::Failed { token, .. } if Some(token) == self.requested)
    }

    /// True while a request waits to settle
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, RenderPhase::Revalidating { .. })
    }

    /// The `/ N` label next to the page box
    pub fn page_count_label(&self) -> String {
        match self.state.total_pages {
            Some(total) => total.to_string(),
            None => "x".to_string(),
        }
    }

    fn clamp_page(&self, page: u32) -> u32 {
        let page = page.max(1);
        match self.state.total_pages {
            Some(total) if total > 0 => page.min(total),
            _ => page,
        }
    }

    /// Start a new render cycle if the wanted token changed
    fn revalidate(&mut self) {
        let wanted = match self.state.total_pages {
            Some(total) if total > 0 => Some(RenderToken {
                page: self.state.current_page,
                scale: self.state.scale,
                rotation: self.state.rotation,
            }),
            _ => None,
        };
        if wanted == self.requested {
            return;
        }
        self.requested = wanted;

        let stale = match self.phase {
            RenderPhase::Idle => None,
            RenderPhase::Settled(token) => Some(token),
            RenderPhase::Revalidating { stale } | RenderPhase::Failed { stale, .. } => stale,
        };
        self.phase = match wanted {
            Some(_) => RenderPhase::Revalidating { stale },
            None => RenderPhase::Idle,
        };
    }
}
