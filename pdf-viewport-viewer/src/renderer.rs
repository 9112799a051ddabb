use anyhow::{Context, Result};
use pdf_viewport_core::{
    DocumentInfo, DocumentSource, PageRenderer, RenderError, RenderRequest, Rotation,
};
use pdfium_render::prelude::*;
use std::path::Path;

/// PDF renderer using pdfium-render
pub struct PdfRenderer {
    pdfium: &'static Pdfium,
    document: Option<PdfDocument<'static>>,
}

impl PdfRenderer {
    /// Bind PDFium once for the whole process
    pub fn new() -> Result<Self> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .context("Failed to bind to PDFium library. Please install PDFium or download the library from https://github.com/bblanchon/pdfium-binaries")?;
        // Documents borrow the bindings, which live as long as the process
        let pdfium: &'static Pdfium = Box::leak(Box::new(Pdfium::new(bindings)));
        Ok(Self {
            pdfium,
            document: None,
        })
    }
}

impl PageRenderer for PdfRenderer {
    type Output = image::RgbaImage;

    fn load_document(&mut self, source: &DocumentSource) -> Result<DocumentInfo, RenderError> {
        let locator = source.as_str();
        let path = Path::new(locator.strip_prefix("file://").unwrap_or(locator));

        // The previous document stays usable if the refreshed one fails to open
        let pdfium = self.pdfium;
        let document = pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| RenderError::Load(format!("{}: {:?}", path.display(), e)))?;

        let total_pages = u32::from(document.pages().len());
        self.document = Some(document);
        Ok(DocumentInfo { total_pages })
    }

    fn render(&mut self, request: &RenderRequest) -> Result<image::RgbaImage, RenderError> {
        let page_number = request.token.page;
        let document = self
            .document
            .as_ref()
            .ok_or_else(|| RenderError::Load("no document open".to_string()))?;

        let index = u16::try_from(request.page_index())
            .map_err(|_| RenderError::PageOutOfBounds { page: page_number })?;
        let page = document
            .pages()
            .get(index)
            .map_err(|_| RenderError::PageOutOfBounds { page: page_number })?;

        let render_config = PdfRenderConfig::new()
            .set_target_width(request.scaled_width() as i32)
            .rotate(pdfium_rotation(request.token.rotation), true);

        let page_error = |reason: String| RenderError::Page {
            page: page_number,
            reason,
        };

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| page_error(format!("{:?}", e)))?;

        image::RgbaImage::from_raw(
            bitmap.width() as u32,
            bitmap.height() as u32,
            bitmap.as_rgba_bytes(),
        )
        .ok_or_else(|| page_error("bitmap size does not match its pixel data".to_string()))
    }
}

fn pdfium_rotation(rotation: Rotation) -> PdfPageRenderRotation {
    match rotation.degrees() {
        90 => PdfPageRenderRotation::Degrees90,
        180 => PdfPageRenderRotation::Degrees180,
        270 => PdfPageRenderRotation::Degrees270,
        _ => PdfPageRenderRotation::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_turns_map_to_pdfium_rotations() {
        let mut rotation = Rotation::NONE;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(pdfium_rotation(rotation));
            rotation = rotation.rotated();
        }
        assert_eq!(
            seen,
            vec![
                PdfPageRenderRotation::None,
                PdfPageRenderRotation::Degrees90,
                PdfPageRenderRotation::Degrees180,
                PdfPageRenderRotation::Degrees270,
            ]
        );
    }
}
