//! Render parameters and the renderer capability
//!
//! The core never rasterizes anything. It decides which page to draw, at
//! which zoom and rotation, and into how wide a box. The host owns a
//! [`PageRenderer`] and feeds the outcome of each request back into the
//! controller as an event.

use std::fmt;

use crate::error::RenderError;

/// Zoom multiplier, stored as a whole percentage so it can be compared
/// and hashed exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Scale(u16);

impl Scale {
    pub const ACTUAL_SIZE: Scale = Scale(100);

    /// Returns `None` for 0%, the only value that is never a valid zoom
    pub fn from_percent(percent: u16) -> Option<Self> {
        (percent > 0).then_some(Self(percent))
    }

    pub fn percent(self) -> u16 {
        self.0
    }

    pub fn factor(self) -> f32 {
        f32::from(self.0) / 100.0
    }

    /// Zoom picker text, e.g. `150%`
    pub fn label(self) -> String {
        format!("{}%", self.0)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::ACTUAL_SIZE
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Clockwise page rotation, always a multiple of 90 below 360
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rotation(u16);

impl Rotation {
    pub const NONE: Rotation = Rotation(0);

    pub fn degrees(self) -> u16 {
        self.0
    }

    /// The next quarter turn, wrapping 270 back to 0
    pub fn rotated(self) -> Self {
        Self((self.0 + 90) % 360)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

/// Identity of a render request.
///
/// Completion events carry the token they were issued with; the controller
/// only settles a render whose token matches what it currently wants.
/// Width is deliberately absent: resizing redraws in place and never starts
/// a new swap cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderToken {
    /// 1-based page number
    pub page: u32,
    pub scale: Scale,
    pub rotation: Rotation,
}

/// Everything a renderer needs to draw one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderRequest {
    pub token: RenderToken,
    /// Target width in pixels before zoom is applied
    pub width: u32,
}

impl RenderRequest {
    /// 0-based page index, as most rendering engines count
    pub fn page_index(&self) -> u32 {
        self.token.page - 1
    }

    /// Pixel width the page should be drawn at once zoom is applied
    pub fn scaled_width(&self) -> u32 {
        let scaled = (self.width as f32 * self.token.scale.factor()).round();
        (scaled as u32).max(1)
    }
}

/// Opaque reference to the document bytes, handed unchanged to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentSource(String);

impl DocumentSource {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata available once a document has been opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentInfo {
    pub total_pages: u32,
}

/// Document rendering engine, injected by the host.
///
/// Implementations may complete synchronously; the host is responsible for
/// delivering the outcome back to the controller as a separate event on its
/// event loop (`on_document_loaded`, `on_page_render_succeeded`, ...).
pub trait PageRenderer {
    /// Whatever the engine produces for one page (a bitmap, a texture handle)
    type Output;

    fn load_document(&mut self, source: &DocumentSource) -> Result<DocumentInfo, RenderError>;

    fn render(&mut self, request: &RenderRequest) -> Result<Self::Output, RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_percent_is_not_a_scale() {
        assert_eq!(Scale::from_percent(0), None);
        assert_eq!(Scale::from_percent(150).map(Scale::factor), Some(1.5));
    }

    #[test]
    fn scale_label_matches_zoom_picker() {
        assert_eq!(Scale::from_percent(250).unwrap().label(), "250%");
        assert_eq!(Scale::default().label(), "100%");
    }

    #[test]
    fn rotation_wraps_after_four_quarter_turns() {
        let start = Rotation::NONE;
        let turned = start.rotated().rotated().rotated();
        assert_eq!(turned.degrees(), 270);
        assert_eq!(turned.rotated(), start);
    }

    #[test]
    fn scaled_width_applies_zoom_and_never_hits_zero() {
        let token = RenderToken {
            page: 3,
            scale: Scale::from_percent(150).unwrap(),
            rotation: Rotation::NONE,
        };
        let request = RenderRequest { token, width: 400 };
        assert_eq!(request.scaled_width(), 600);
        assert_eq!(request.page_index(), 2);

        let tiny = RenderRequest { token, width: 0 };
        assert_eq!(tiny.scaled_width(), 1);
    }
}
