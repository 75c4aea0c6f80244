//! Per-annotation drawing through a surface transform
//!
//! The compositor and the interactive overlay both draw with a [`Painter`];
//! only the transform and the canvas orientation differ between them.

use image::RgbaImage;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Stroke, Transform};

use super::canvas::Canvas;
use super::geometry::arrow;
use super::{blur, text};
use crate::config::Color;
use crate::domain::{
    Annotation, ArrowAnnotation, FreehandAnnotation, Point, RectangleAnnotation,
};
use crate::error::RenderError;
use crate::render::text::FontBook;
use crate::transform::SurfaceTransform;

fn paint_for(color: Color) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn round_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

pub struct Painter<'a, T: SurfaceTransform> {
    canvas: &'a mut Canvas,
    transform: &'a T,
    base: &'a RgbaImage,
    fonts: &'a FontBook,
}

impl<'a, T: SurfaceTransform> Painter<'a, T> {
    /// `base` is the unannotated image blur strokes sample from
    pub fn new(
        canvas: &'a mut Canvas,
        transform: &'a T,
        base: &'a RgbaImage,
        fonts: &'a FontBook,
    ) -> Self {
        Self {
            canvas,
            transform,
            base,
            fonts,
        }
    }

    pub fn draw(&mut self, annotation: &Annotation) -> Result<(), RenderError> {
        match annotation {
            Annotation::Rectangle(r) => self.draw_rectangle(r),
            Annotation::Freehand(f) => self.draw_freehand(f),
            Annotation::Arrow(a) => self.draw_arrow(a),
            Annotation::Text(t) => text::draw_text(self.canvas, self.transform, t, self.fonts)?,
            Annotation::Blur(b) => blur::draw_blur(self.canvas, self.transform, self.base, b)?,
        }
        Ok(())
    }

    /// Draw every annotation in list order
    pub fn draw_all<'b>(
        &mut self,
        annotations: impl IntoIterator<Item = &'b Annotation>,
    ) -> Result<(), RenderError> {
        for annotation in annotations {
            self.draw(annotation)?;
        }
        Ok(())
    }

    fn draw_rectangle(&mut self, rect: &RectangleAnnotation) {
        let r = self.transform.rect(rect.rect);
        let Some(sk_rect) = tiny_skia::Rect::from_xywh(r.x, r.y, r.width, r.height) else {
            return;
        };
        let paint = paint_for(rect.style.color);
        let pixmap = self.canvas.pixmap_mut();

        if rect.is_filled {
            pixmap.fill_rect(sk_rect, &paint, Transform::identity(), None);
        } else {
            let path = PathBuilder::from_rect(sk_rect);
            let stroke = Stroke {
                width: rect.style.line_width * self.transform.scale(),
                ..Default::default()
            };
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    fn draw_freehand(&mut self, stroke: &FreehandAnnotation) {
        let width = stroke.style.line_width * self.transform.scale();
        let paint = paint_for(stroke.style.color);

        match stroke.points.as_slice() {
            [] => {}
            // A lone point (live preview only) shows as a dot
            [only] => {
                let c = self.transform.point(*only);
                if let Some(dot) = PathBuilder::from_circle(c.x, c.y, width / 2.0) {
                    self.canvas.pixmap_mut().fill_path(
                        &dot,
                        &paint,
                        FillRule::Winding,
                        Transform::identity(),
                        None,
                    );
                }
            }
            [first, rest @ ..] => {
                let mut pb = PathBuilder::new();
                let start = self.transform.point(*first);
                pb.move_to(start.x, start.y);
                for p in rest {
                    let p = self.transform.point(*p);
                    pb.line_to(p.x, p.y);
                }
                if let Some(path) = pb.finish() {
                    self.canvas.pixmap_mut().stroke_path(
                        &path,
                        &paint,
                        &round_stroke(width),
                        Transform::identity(),
                        None,
                    );
                }
            }
        }
    }

    fn draw_arrow(&mut self, arrow_ann: &ArrowAnnotation) {
        let paint = paint_for(arrow_ann.style.color);
        let start = self.transform.point(arrow_ann.start);
        let end = self.transform.point(arrow_ann.end);

        // Shaft
        let mut pb = PathBuilder::new();
        pb.move_to(start.x, start.y);
        pb.line_to(end.x, end.y);
        if let Some(path) = pb.finish() {
            let width = arrow_ann.style.line_width * self.transform.scale();
            self.canvas.pixmap_mut().stroke_path(
                &path,
                &paint,
                &round_stroke(width),
                Transform::identity(),
                None,
            );
        }

        // Head, computed in image space then mapped like everything else
        let Some([left, right]) =
            arrow::head_points(arrow_ann.start, arrow_ann.end, arrow_ann.style.line_width)
        else {
            return;
        };
        let [left, right]: [Point; 2] = [self.transform.point(left), self.transform.point(right)];
        let mut pb = PathBuilder::new();
        pb.move_to(end.x, end.y);
        pb.line_to(left.x, left.y);
        pb.line_to(right.x, right.y);
        pb.close();
        if let Some(head) = pb.finish() {
            self.canvas.pixmap_mut().fill_path(
                &head,
                &paint,
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }
}
