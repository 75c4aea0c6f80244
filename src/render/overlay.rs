//! Interactive preview layer
//!
//! Draws the committed annotations plus the in-progress tool preview into a
//! transparent, display-sized layer that the UI blends over the displayed
//! screenshot. Uses the same [`Painter`] as the compositor, so shapes match
//! the exported image.

use image::RgbaImage;

use super::canvas::{Canvas, Orientation};
use super::painter::Painter;
use super::text::FontBook;
use crate::domain::Annotation;
use crate::error::RenderError;
use crate::transform::DisplayTransform;

/// Render annotations and an optional preview at display scale
pub fn render_overlay(
    base: &RgbaImage,
    annotations: &[Annotation],
    preview: Option<&Annotation>,
    transform: &DisplayTransform,
    fonts: &FontBook,
) -> Result<RgbaImage, RenderError> {
    let (width, height) = base.dimensions();
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyImage { width, height });
    }
    let display_width = ((width as f32 * transform.scale).ceil() as u32).max(1);
    let display_height = ((height as f32 * transform.scale).ceil() as u32).max(1);

    let mut canvas = Canvas::transparent(display_width, display_height, Orientation::TopDown)?;
    Painter::new(&mut canvas, transform, base, fonts)
        .draw_all(annotations.iter().chain(preview))?;
    Ok(canvas.into_image())
}
