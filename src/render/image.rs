//! Final compositing: bake annotations into a copy of the base image
//!
//! This is the single renderer behind save, clipboard and share. It draws on
//! a bottom-left-origin raster canvas through [`RasterTransform`] and hands
//! back a top-down image of the same size as the input.

use std::time::Instant;

use image::RgbaImage;

use super::canvas::{Canvas, Orientation};
use super::painter::Painter;
use super::text::FontBook;
use crate::domain::{Annotation, Screenshot};
use crate::error::RenderError;
use crate::transform::RasterTransform;

/// Draw `annotations` in list order on top of `base`.
///
/// Pure: `base` and `annotations` are only read, and the same inputs always
/// produce the same bytes.
pub fn composite(
    base: &RgbaImage,
    annotations: &[Annotation],
    fonts: &FontBook,
) -> Result<RgbaImage, RenderError> {
    let (width, height) = base.dimensions();
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyImage { width, height });
    }

    let started = Instant::now();
    let mut canvas = Canvas::from_image(base, Orientation::BottomUp)?;
    let transform = RasterTransform::new(height);
    Painter::new(&mut canvas, &transform, base, fonts).draw_all(annotations)?;
    let output = canvas.into_image();

    log::debug!(
        "Composited {} annotations onto {}x{} in {:?}",
        annotations.len(),
        width,
        height,
        started.elapsed()
    );
    Ok(output)
}

/// Composite a screenshot's own annotations onto its image
pub fn composite_screenshot(shot: &Screenshot, fonts: &FontBook) -> Result<RgbaImage, RenderError> {
    composite(&shot.image, &shot.annotations, fonts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Color;
    use crate::domain::{
        AnnotationId, ArrowAnnotation, BlurAnnotation, FreehandAnnotation, Point, Rect,
        RectangleAnnotation, StrokeStyle,
    };

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const RED: [u8; 4] = [255, 0, 0, 255];

    fn white(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba(WHITE))
    }

    fn red(width: f32) -> StrokeStyle {
        StrokeStyle {
            color: Color::RED,
            line_width: width,
        }
    }

    fn rect(x: f32, y: f32, w: f32, h: f32, filled: bool) -> Annotation {
        Annotation::Rectangle(RectangleAnnotation {
            id: AnnotationId::next(),
            rect: Rect::new(x, y, w, h),
            style: red(2.0),
            is_filled: filled,
        })
    }

    fn arrow(start: Point, end: Point) -> Annotation {
        Annotation::Arrow(ArrowAnnotation {
            id: AnnotationId::next(),
            start,
            end,
            style: red(2.0),
        })
    }

    fn is_reddish(px: [u8; 4]) -> bool {
        px[0] > 200 && px[1] < 120 && px[2] < 120
    }

    #[test]
    fn test_end_to_end_rectangle_and_arrow() {
        let annotations = vec![
            rect(10.0, 10.0, 50.0, 30.0, false),
            arrow(Point::new(0.0, 0.0), Point::new(100.0, 0.0)),
        ];
        let base = white(200, 200);
        let out = composite(&base, &annotations, &FontBook::new()).unwrap();
        assert_eq!(out.dimensions(), (200, 200));

        // Outline edges at the authored, top-left based location
        assert!(is_reddish(out.get_pixel(30, 10).0));
        assert!(is_reddish(out.get_pixel(30, 40).0));
        assert!(is_reddish(out.get_pixel(10, 25).0));
        assert!(is_reddish(out.get_pixel(60, 25).0));
        // Hollow inside, untouched outside
        assert_eq!(out.get_pixel(35, 25).0, WHITE);
        assert_eq!(out.get_pixel(30, 150).0, WHITE);
        // The mirrored position in a flipped image stays clean
        assert_eq!(out.get_pixel(30, 189).0, WHITE);

        // Shaft along the top edge
        assert!(is_reddish(out.get_pixel(50, 0).0));
        // Head: wider than the 2px shaft near the tip, pointing right
        assert!(is_reddish(out.get_pixel(92, 2).0));
        assert_eq!(out.get_pixel(50, 3).0, WHITE);
        assert_eq!(out.get_pixel(110, 0).0, WHITE);
    }

    #[test]
    fn test_filled_rectangle_covers_content() {
        let mut base = white(50, 50);
        base.put_pixel(20, 20, image::Rgba([0, 200, 0, 255]));
        let out = composite(&base, &[rect(10.0, 10.0, 20.0, 20.0, true)], &FontBook::new()).unwrap();
        assert_eq!(out.get_pixel(20, 20).0, RED);
        assert_eq!(out.get_pixel(10, 10).0, RED);
        assert_eq!(out.get_pixel(29, 29).0, RED);
        assert_eq!(out.get_pixel(30, 30).0, WHITE);
        assert_eq!(out.get_pixel(9, 20).0, WHITE);
    }

    #[test]
    fn test_later_annotations_draw_on_top() {
        let blue = Annotation::Rectangle(RectangleAnnotation {
            id: AnnotationId::next(),
            rect: Rect::new(0.0, 0.0, 20.0, 20.0),
            style: StrokeStyle {
                color: Color::rgb(0.0, 0.0, 1.0),
                line_width: 1.0,
            },
            is_filled: true,
        });
        let covering = rect(5.0, 5.0, 10.0, 10.0, true);
        let base = white(20, 20);

        let out = composite(&base, &[blue.clone(), covering.clone()], &FontBook::new()).unwrap();
        assert_eq!(out.get_pixel(8, 8).0, RED);
        let out = composite(&base, &[covering, blue], &FontBook::new()).unwrap();
        assert_eq!(out.get_pixel(8, 8).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_freehand_stroke_is_drawn() {
        let stroke = Annotation::Freehand(FreehandAnnotation {
            id: AnnotationId::next(),
            points: vec![Point::new(5.0, 20.5), Point::new(25.0, 20.5), Point::new(25.0, 35.0)],
            style: red(3.0),
        });
        let out = composite(&white(40, 40), &[stroke], &FontBook::new()).unwrap();
        assert!(is_reddish(out.get_pixel(15, 20).0));
        assert!(is_reddish(out.get_pixel(25, 30).0));
        assert_eq!(out.get_pixel(15, 30).0, WHITE);
    }

    #[test]
    fn test_blur_over_filled_rectangle_shows_blurred_original() {
        let cover = rect(0.0, 0.0, 40.0, 40.0, true);
        let blur = Annotation::Blur(BlurAnnotation {
            id: AnnotationId::next(),
            points: vec![Point::new(10.0, 20.0), Point::new(30.0, 20.0)],
            blur_radius: 20.0,
            brush_size: 8.0,
        });
        let out = composite(&white(40, 40), &[cover, blur], &FontBook::new()).unwrap();
        // Under the brush the white base comes back through the red cover
        let [_, g, b, a] = out.get_pixel(20, 20).0;
        assert!(g > 240 && b > 240 && a == 255);
        assert_eq!(out.get_pixel(20, 35).0, RED);
    }

    #[test]
    fn test_composite_is_deterministic() {
        let base = RgbaImage::from_fn(64, 48, |x, y| image::Rgba([(x * 4) as u8, (y * 5) as u8, 90, 255]));
        let annotations = vec![
            rect(4.0, 4.0, 30.0, 20.0, false),
            Annotation::Blur(BlurAnnotation {
                id: AnnotationId::next(),
                points: vec![Point::new(10.0, 10.0), Point::new(40.0, 30.0)],
                blur_radius: 25.0,
                brush_size: 12.0,
            }),
            arrow(Point::new(60.0, 40.0), Point::new(20.0, 5.0)),
        ];
        let fonts = FontBook::new();
        let a = composite(&base, &annotations, &fonts).unwrap();
        let b = composite(&base, &annotations, &fonts).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
        assert_ne!(a.as_raw(), base.as_raw());
    }

    #[test]
    fn test_no_annotations_returns_identical_image() {
        let base = RgbaImage::from_fn(9, 7, |x, y| image::Rgba([x as u8, y as u8, 3, 255]));
        assert_eq!(composite(&base, &[], &FontBook::new()).unwrap(), base);
    }

    #[test]
    fn test_empty_image_is_error() {
        let err = composite(&RgbaImage::new(0, 0), &[], &FontBook::new()).unwrap_err();
        assert_eq!(err, RenderError::EmptyImage { width: 0, height: 0 });
    }
}
