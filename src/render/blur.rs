//! Blur brush rendering
//!
//! A blur stroke blurs a crop of the base image and paints it back through
//! a clip shaped like the brush gesture: a dab at every recorded point plus
//! a brush-wide round stroke joining them.

use image::RgbaImage;
use image::imageops;
use tiny_skia::{
    BlendMode, Color as SkiaColor, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap,
    PixmapPaint, Stroke, Transform,
};

use super::canvas::{Canvas, image_to_pixmap};
use super::geometry::blur;
use crate::domain::{BlurAnnotation, PixelRect, Rect};
use crate::error::RenderError;
use crate::transform::SurfaceTransform;

/// Paint a blur stroke onto the canvas, reading pixels from `base`.
///
/// `base` is the unannotated image, so a blur over an earlier filled
/// rectangle shows blurred original pixels on top of it.
pub fn draw_blur<T: SurfaceTransform>(
    canvas: &mut Canvas,
    transform: &T,
    base: &RgbaImage,
    stroke: &BlurAnnotation,
) -> Result<(), RenderError> {
    let sigma = blur::effective_sigma(stroke.blur_radius);
    if sigma <= 0.0 {
        log::debug!("Blur radius {} gives no blur, skipping", stroke.blur_radius);
        return Ok(());
    }

    // Stroke bounds grown by half the brush, clamped to the image
    let Some(bounds) = Rect::bounding(&stroke.points) else {
        return Ok(());
    };
    let Some(region) = PixelRect::clamped(
        &bounds.inflate(stroke.brush_size / 2.0),
        base.width(),
        base.height(),
    ) else {
        return Ok(());
    };

    let crop = imageops::crop_imm(base, region.x, region.y, region.width, region.height).to_image();
    let mut blurred = imageops::blur(&crop, sigma);
    if blurred.dimensions() != (region.width, region.height) {
        blurred = imageops::crop_imm(&blurred, 0, 0, region.width, region.height).to_image();
    }

    // Keep the blurred pixels only where the brush went
    let mut layer = image_to_pixmap(&blurred, false)?;
    let coverage = brush_coverage(region, stroke)?;
    let clip = PixmapPaint {
        blend_mode: BlendMode::DestinationIn,
        ..PixmapPaint::default()
    };
    layer.draw_pixmap(0, 0, coverage.as_ref(), &clip, Transform::identity(), None);

    canvas.draw_layer(&layer, transform.rect(region.to_rect()))
}

/// Coverage of the brush gesture over `region`, in region-local image pixels
fn brush_coverage(region: PixelRect, stroke: &BlurAnnotation) -> Result<Pixmap, RenderError> {
    let (width, height) = (region.width, region.height);
    let mut coverage =
        Pixmap::new(width, height).ok_or(RenderError::SurfaceAllocation { width, height })?;
    let (ox, oy) = (region.x as f32, region.y as f32);
    let brush = stroke.brush_size;

    let mut paint = Paint::default();
    paint.set_color(SkiaColor::BLACK);
    paint.anti_alias = true;

    for p in &stroke.points {
        if let Some(dab) = PathBuilder::from_circle(p.x - ox, p.y - oy, brush / 2.0) {
            coverage.fill_path(&dab, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    if let [first, rest @ ..] = stroke.points.as_slice()
        && !rest.is_empty()
    {
        let mut pb = PathBuilder::new();
        pb.move_to(first.x - ox, first.y - oy);
        for p in rest {
            pb.line_to(p.x - ox, p.y - oy);
        }
        if let Some(path) = pb.finish() {
            let line = Stroke {
                width: brush,
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                ..Default::default()
            };
            coverage.stroke_path(&path, &paint, &line, Transform::identity(), None);
        }
    }

    Ok(coverage)
}
