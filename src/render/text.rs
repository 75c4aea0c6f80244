//! Text rasterization with ab_glyph
//!
//! Fonts are looked up by family name in a [`FontBook`]. Layout uses the
//! font's real metrics: the annotation position is the top-left of the line
//! box and the baseline sits one ascent below it.

use std::collections::HashMap;
use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use anyhow::Context;
use tiny_skia::Pixmap;

use super::canvas::{Canvas, covered_pixel};
use crate::domain::{Rect, TextAnnotation};
use crate::error::RenderError;
use crate::transform::SurfaceTransform;

/// Fonts tried when no font was registered explicitly
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Font family name -> loaded font, plus a fallback for unknown families
#[derive(Clone, Default)]
pub struct FontBook {
    families: HashMap<String, FontArc>,
    fallback: Option<FontArc>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("families", &self.families.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Font book whose fallback is the first system font that loads
    pub fn with_system_fallback() -> Self {
        let mut book = Self::new();
        for candidate in SYSTEM_FONT_CANDIDATES {
            let path = Path::new(candidate);
            if !path.exists() {
                continue;
            }
            match load_font(path) {
                Ok(font) => {
                    log::debug!("Using fallback font {}", path.display());
                    book.fallback = Some(font);
                    break;
                }
                Err(err) => log::warn!("Skipping font {}: {:?}", path.display(), err),
            }
        }
        if book.fallback.is_none() {
            log::warn!("No system font found, text annotations will not be drawn");
        }
        book
    }

    /// Register a font under a family name (case-insensitive)
    pub fn insert(&mut self, family: &str, font: FontArc) {
        self.families.insert(family.to_lowercase(), font);
    }

    /// Load a font file and register it under `family`
    pub fn load_file(&mut self, family: &str, path: &Path) -> anyhow::Result<()> {
        let font = load_font(path)?;
        self.insert(family, font);
        Ok(())
    }

    pub fn set_fallback(&mut self, font: FontArc) {
        self.fallback = Some(font);
    }

    /// Font for `family`, or the fallback
    pub fn resolve(&self, family: &str) -> Option<&FontArc> {
        self.families
            .get(&family.to_lowercase())
            .or(self.fallback.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty() && self.fallback.is_none()
    }
}

fn load_font(path: &Path) -> anyhow::Result<FontArc> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read font {}", path.display()))?;
    FontArc::try_from_vec(data).with_context(|| format!("Invalid font file {}", path.display()))
}

/// Width of `content` laid out with `font` at `font_size`, including kerning
pub fn measure_text(font: &FontArc, content: &str, font_size: f32) -> (f32, f32) {
    let scaled = font.as_scaled(PxScale::from(font_size));
    let mut width = 0.0f32;
    let mut prev = None;
    for ch in content.chars().filter(|c| !c.is_control()) {
        let id = font.glyph_id(ch);
        if let Some(prev_id) = prev {
            width += scaled.kern(prev_id, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }
    (width, scaled.height())
}

/// Rasterize a text annotation onto the canvas
pub fn draw_text<T: SurfaceTransform>(
    canvas: &mut Canvas,
    transform: &T,
    text: &TextAnnotation,
    fonts: &FontBook,
) -> Result<(), RenderError> {
    let Some(font) = fonts.resolve(&text.style.font_family) else {
        log::warn!(
            "No font for family '{}', skipping text annotation",
            text.style.font_family
        );
        return Ok(());
    };

    // Lay out in surface scale but top-down; the layer is placed through the transform
    let s = transform.scale();
    let px_scale = PxScale::from(text.style.font_size * s);
    let scaled = font.as_scaled(px_scale);
    let origin_x = text.position.x * s;
    let baseline = text.position.y * s + scaled.ascent();

    // Only glyphs that reach the surface are rasterized
    let (clip_w, clip_h) = (canvas.width() as f32, canvas.height() as f32);
    let mut glyphs = Vec::new();
    let mut caret = origin_x;
    let mut prev = None;
    for ch in text.content.chars().filter(|c| !c.is_control()) {
        let id = font.glyph_id(ch);
        if let Some(prev_id) = prev {
            caret += scaled.kern(prev_id, id);
        }
        let glyph = id.with_scale_and_position(px_scale, point(caret, baseline));
        caret += scaled.h_advance(id);
        prev = Some(id);
        if let Some(outlined) = font.outline_glyph(glyph) {
            let b = outlined.px_bounds();
            if b.max.x > 0.0 && b.min.x < clip_w && b.max.y > 0.0 && b.min.y < clip_h {
                glyphs.push(outlined);
            }
        }
    }

    let Some(ink) = glyphs
        .iter()
        .map(|g| {
            let b = g.px_bounds();
            (b.min.x, b.min.y, b.max.x, b.max.y)
        })
        .reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)))
    else {
        return Ok(());
    };
    let Some((left, top, width, height)) = visible_box(ink, clip_w, clip_h) else {
        return Ok(());
    };
    let mut layer =
        Pixmap::new(width, height).ok_or(RenderError::SurfaceAllocation { width, height })?;

    let rgba = text.style.color.to_rgba_u8();
    let mut coverage = vec![0.0f32; width as usize * height as usize];
    for glyph in &glyphs {
        let b = glyph.px_bounds();
        let (gx, gy) = ((b.min.x - left) as i64, (b.min.y - top) as i64);
        glyph.draw(|x, y, c| {
            let px = gx + x as i64;
            let py = gy + y as i64;
            if px >= 0 && py >= 0 && (px as u32) < width && (py as u32) < height {
                let idx = py as usize * width as usize + px as usize;
                coverage[idx] = coverage[idx].max(c);
            }
        });
    }
    for (pixel, c) in layer.pixels_mut().iter_mut().zip(&coverage) {
        if *c > 0.0 {
            *pixel = covered_pixel(rgba, *c);
        }
    }

    // Back to image space, then through the surface transform
    let image_rect = Rect {
        x: left / s,
        y: top / s,
        width: width as f32 / s,
        height: height as f32 / s,
    };
    canvas.draw_layer(&layer, transform.rect(image_rect))
}

/// Pixel-aligned part of an ink box `(min_x, min_y, max_x, max_y)` inside a
/// `clip_w` x `clip_h` surface, as `(left, top, width, height)`
fn visible_box(
    ink: (f32, f32, f32, f32),
    clip_w: f32,
    clip_h: f32,
) -> Option<(f32, f32, u32, u32)> {
    let left = ink.0.floor().max(0.0);
    let top = ink.1.floor().max(0.0);
    let right = ink.2.ceil().min(clip_w);
    let bottom = ink.3.ceil().min(clip_h);
    if right <= left || bottom <= top {
        return None;
    }
    Some((left, top, (right - left) as u32, (bottom - top) as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Color;
    use crate::domain::{AnnotationId, Point, TextStyle};
    use crate::render::canvas::Orientation;
    use crate::transform::RasterTransform;

    #[test]
    fn test_resolve_without_fonts() {
        let book = FontBook::new();
        assert!(book.is_empty());
        assert!(book.resolve("sans-serif").is_none());
    }

    #[test]
    fn test_load_missing_font_is_error() {
        let mut book = FontBook::new();
        assert!(book.load_file("x", Path::new("/nonexistent/font.ttf")).is_err());
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();
        assert!(book.load_file("x", &bogus).is_err());
        assert!(book.is_empty());
    }

    #[test]
    fn test_missing_font_skips_text_without_error() {
        let base = image::RgbaImage::from_pixel(20, 20, image::Rgba([255, 255, 255, 255]));
        let mut canvas = Canvas::from_image(&base, Orientation::BottomUp).unwrap();
        let text = TextAnnotation {
            id: AnnotationId::next(),
            position: Point::new(2.0, 2.0),
            content: "hi".to_string(),
            style: TextStyle {
                color: Color::BLACK,
                ..TextStyle::default()
            },
        };
        draw_text(&mut canvas, &RasterTransform::new(20), &text, &FontBook::new()).unwrap();
        assert_eq!(canvas.into_image(), base);
    }

    #[test]
    fn test_system_font_draws_inside_estimated_box() {
        let book = FontBook::with_system_fallback();
        let Some(font) = book.resolve("anything").cloned() else {
            // No system font installed; nothing to check
            return;
        };
        let (w, h) = measure_text(&font, "Hello", 20.0);
        assert!(w > 0.0 && h > 0.0);

        let base = image::RgbaImage::from_pixel(120, 60, image::Rgba([255, 255, 255, 255]));
        let mut canvas = Canvas::from_image(&base, Orientation::BottomUp).unwrap();
        let text = TextAnnotation {
            id: AnnotationId::next(),
            position: Point::new(10.0, 10.0),
            content: "Hello".to_string(),
            style: TextStyle {
                color: Color::BLACK,
                font_size: 20.0,
                font_family: "anything".to_string(),
            },
        };
        draw_text(&mut canvas, &RasterTransform::new(60), &text, &book).unwrap();
        let out = canvas.into_image();

        let mut inked = 0;
        for (x, y, px) in out.enumerate_pixels() {
            if px.0 != [255, 255, 255, 255] {
                inked += 1;
                // Ink stays below the anchor, not flipped to the bottom of the image
                assert!(y >= 10 && y < 40, "ink at ({x}, {y})");
            }
        }
        assert!(inked > 0);
    }

    #[test]
    fn test_visible_box_clips_to_surface() {
        assert_eq!(
            visible_box((-30.5, 10.2, 80000.0, 4700.0), 50.0, 50.0),
            Some((0.0, 10.0, 50, 40))
        );
        assert_eq!(visible_box((60.0, 0.0, 90.0, 10.0), 50.0, 50.0), None);
        assert_eq!(visible_box((2.3, 3.7, 5.1, 6.0), 50.0, 50.0), Some((2.0, 3.0, 4, 3)));
    }

    #[test]
    fn test_oversized_text_stays_within_small_image() {
        let book = FontBook::with_system_fallback();
        if book.is_empty() {
            return;
        }
        let base = image::RgbaImage::from_pixel(50, 50, image::Rgba([255, 255, 255, 255]));
        let mut canvas = Canvas::from_image(&base, Orientation::BottomUp).unwrap();
        let text = TextAnnotation {
            id: AnnotationId::next(),
            position: Point::new(0.0, 0.0),
            content: "W".repeat(20),
            style: TextStyle {
                color: Color::BLACK,
                font_size: 4000.0,
                font_family: "anything".to_string(),
            },
        };
        draw_text(&mut canvas, &RasterTransform::new(50), &text, &book).unwrap();
        assert_eq!(canvas.into_image().dimensions(), (50, 50));
    }
}
