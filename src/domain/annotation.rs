//! Annotation types for drawing on screenshots
//!
//! All annotation types store coordinates in image space (pixels, origin top-left).

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::geometry::{Point, Rect};
use crate::config::Color;

/// Arrows shorter than this are discarded when the gesture ends
pub const MIN_ARROW_LENGTH: f32 = 5.0;
/// Freehand and blur strokes need at least this many points
pub const MIN_STROKE_POINTS: usize = 2;
/// Estimated glyph advance as a fraction of the font size
pub const TEXT_CHAR_WIDTH_RATIO: f32 = 0.6;
/// Estimated line height as a fraction of the font size
pub const TEXT_LINE_HEIGHT_RATIO: f32 = 1.3;

static NEXT_ANNOTATION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier, stable for the lifetime of an annotation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AnnotationId(u64);

impl AnnotationId {
    /// Allocate a fresh process-unique id
    pub fn next() -> Self {
        Self(NEXT_ANNOTATION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Adopt an id from outside (e.g. a loaded file); later `next()` ids stay above it
    pub fn reserve(raw: u64) -> Self {
        NEXT_ANNOTATION_ID.fetch_max(raw.saturating_add(1), Ordering::Relaxed);
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for AnnotationId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(Self::reserve)
    }
}

/// Stroke style attached to shape annotations at creation time
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color,
    pub line_width: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::RED,
            line_width: 3.0,
        }
    }
}

/// Text style attached to text annotations at creation time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub color: Color,
    pub font_size: f32,
    pub font_family: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::RED,
            font_size: 24.0,
            font_family: String::from("sans-serif"),
        }
    }
}

/// Blur brush parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlurSettings {
    /// User-facing intensity control; the effective sigma is `35 - blur_radius`
    pub blur_radius: f32,
    /// Brush diameter in image pixels
    pub brush_size: f32,
}

impl Default for BlurSettings {
    fn default() -> Self {
        Self {
            blur_radius: 20.0,
            brush_size: 30.0,
        }
    }
}

/// Rectangle annotation, hollow or filled with the stroke color
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectangleAnnotation {
    #[serde(default = "AnnotationId::next")]
    pub id: AnnotationId,
    pub rect: Rect,
    pub style: StrokeStyle,
    #[serde(default)]
    pub is_filled: bool,
}

/// Freehand pencil stroke
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FreehandAnnotation {
    #[serde(default = "AnnotationId::next")]
    pub id: AnnotationId,
    pub points: Vec<Point>,
    pub style: StrokeStyle,
}

/// Arrow from `start` to `end`, head at `end`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArrowAnnotation {
    #[serde(default = "AnnotationId::next")]
    pub id: AnnotationId,
    pub start: Point,
    pub end: Point,
    pub style: StrokeStyle,
}

/// Text label anchored at the top-left of its text box
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextAnnotation {
    #[serde(default = "AnnotationId::next")]
    pub id: AnnotationId,
    pub position: Point,
    pub content: String,
    pub style: TextStyle,
}

/// Brush stroke that blurs the underlying image
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlurAnnotation {
    #[serde(default = "AnnotationId::next")]
    pub id: AnnotationId,
    pub points: Vec<Point>,
    pub blur_radius: f32,
    pub brush_size: f32,
}

/// A single style edit applied to the selected annotation
#[derive(Clone, Debug, PartialEq)]
pub enum StyleChange {
    Color(Color),
    LineWidth(f32),
    FontSize(f32),
    Filled(bool),
}

/// Unified annotation type; list order is z-order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    Rectangle(RectangleAnnotation),
    Freehand(FreehandAnnotation),
    Arrow(ArrowAnnotation),
    Text(TextAnnotation),
    Blur(BlurAnnotation),
}

/// Estimated text box size `(width, height)` when no layout engine is consulted
pub fn estimate_text_size(content: &str, font_size: f32) -> (f32, f32) {
    let chars = content.chars().count() as f32;
    let width = (TEXT_CHAR_WIDTH_RATIO * font_size * chars).max(2.0 * font_size);
    (width, TEXT_LINE_HEIGHT_RATIO * font_size)
}

impl ArrowAnnotation {
    pub fn length(&self) -> f32 {
        self.start.distance_to(self.end)
    }
}

impl Annotation {
    pub fn id(&self) -> AnnotationId {
        match self {
            Annotation::Rectangle(a) => a.id,
            Annotation::Freehand(a) => a.id,
            Annotation::Arrow(a) => a.id,
            Annotation::Text(a) => a.id,
            Annotation::Blur(a) => a.id,
        }
    }

    /// Replace the id, keeping everything else
    pub fn set_id(&mut self, id: AnnotationId) {
        match self {
            Annotation::Rectangle(a) => a.id = id,
            Annotation::Freehand(a) => a.id = id,
            Annotation::Arrow(a) => a.id = id,
            Annotation::Text(a) => a.id = id,
            Annotation::Blur(a) => a.id = id,
        }
    }

    /// Bounding rectangle in image space, derived only from the annotation's own fields
    pub fn bounds(&self) -> Rect {
        match self {
            Annotation::Rectangle(a) => a.rect,
            Annotation::Freehand(a) => Rect::bounding(&a.points).unwrap_or_default(),
            Annotation::Arrow(a) => Rect::from_points(a.start, a.end),
            Annotation::Text(a) => {
                let (width, height) = estimate_text_size(&a.content, a.style.font_size);
                Rect {
                    x: a.position.x,
                    y: a.position.y,
                    width,
                    height,
                }
            }
            Annotation::Blur(a) => Rect::bounding(&a.points)
                .map(|r| r.inflate(a.brush_size / 2.0))
                .unwrap_or_default(),
        }
    }

    /// Whether the annotation meets its kind's minimum size or content requirement
    pub fn is_valid(&self) -> bool {
        match self {
            Annotation::Rectangle(a) => a.rect.width > 0.0 && a.rect.height > 0.0,
            Annotation::Freehand(a) => a.points.len() >= MIN_STROKE_POINTS,
            Annotation::Arrow(a) => a.length() >= MIN_ARROW_LENGTH,
            Annotation::Text(a) => !a.content.trim().is_empty(),
            Annotation::Blur(a) => a.points.len() >= MIN_STROKE_POINTS,
        }
    }

    /// Copy of this annotation moved by `(dx, dy)`; the id is preserved
    pub fn translated(&self, dx: f32, dy: f32) -> Annotation {
        let shift = |pts: &[Point]| -> Vec<Point> { pts.iter().map(|p| p.translate(dx, dy)).collect() };
        match self {
            Annotation::Rectangle(a) => Annotation::Rectangle(RectangleAnnotation {
                rect: a.rect.translate(dx, dy),
                ..a.clone()
            }),
            Annotation::Freehand(a) => Annotation::Freehand(FreehandAnnotation {
                points: shift(&a.points),
                ..a.clone()
            }),
            Annotation::Arrow(a) => Annotation::Arrow(ArrowAnnotation {
                start: a.start.translate(dx, dy),
                end: a.end.translate(dx, dy),
                ..a.clone()
            }),
            Annotation::Text(a) => Annotation::Text(TextAnnotation {
                position: a.position.translate(dx, dy),
                ..a.clone()
            }),
            Annotation::Blur(a) => Annotation::Blur(BlurAnnotation {
                points: shift(&a.points),
                ..a.clone()
            }),
        }
    }

    /// Copy with a style edit applied, or `None` if the edit does not apply to this kind
    pub fn with_style_change(&self, change: &StyleChange) -> Option<Annotation> {
        let mut updated = self.clone();
        match (&mut updated, change) {
            (Annotation::Rectangle(a), StyleChange::Color(c)) => a.style.color = *c,
            (Annotation::Freehand(a), StyleChange::Color(c)) => a.style.color = *c,
            (Annotation::Arrow(a), StyleChange::Color(c)) => a.style.color = *c,
            (Annotation::Text(a), StyleChange::Color(c)) => a.style.color = *c,
            (Annotation::Rectangle(a), StyleChange::LineWidth(w)) => a.style.line_width = *w,
            (Annotation::Freehand(a), StyleChange::LineWidth(w)) => a.style.line_width = *w,
            (Annotation::Arrow(a), StyleChange::LineWidth(w)) => a.style.line_width = *w,
            (Annotation::Text(a), StyleChange::FontSize(s)) => a.style.font_size = *s,
            (Annotation::Rectangle(a), StyleChange::Filled(f)) => a.is_filled = *f,
            _ => return None,
        }
        Some(updated)
    }

    /// Stroke style for shape annotations
    pub fn stroke_style(&self) -> Option<&StrokeStyle> {
        match self {
            Annotation::Rectangle(a) => Some(&a.style),
            Annotation::Freehand(a) => Some(&a.style),
            Annotation::Arrow(a) => Some(&a.style),
            Annotation::Text(_) | Annotation::Blur(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrow(start: Point, end: Point) -> Annotation {
        Annotation::Arrow(ArrowAnnotation {
            id: AnnotationId::next(),
            start,
            end,
            style: StrokeStyle::default(),
        })
    }

    #[test]
    fn test_ids_are_unique() {
        let a = AnnotationId::next();
        let b = AnnotationId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_arrow_validity_boundary() {
        assert!(arrow(Point::new(0.0, 0.0), Point::new(5.0, 0.0)).is_valid());
        assert!(arrow(Point::new(0.0, 0.0), Point::new(3.0, 4.0)).is_valid());
        assert!(!arrow(Point::new(0.0, 0.0), Point::new(4.9, 0.0)).is_valid());
        assert!(!arrow(Point::new(1.0, 1.0), Point::new(1.0, 1.0)).is_valid());
    }

    #[test]
    fn test_stroke_validity_needs_two_points() {
        let mut stroke = FreehandAnnotation {
            id: AnnotationId::next(),
            points: vec![],
            style: StrokeStyle::default(),
        };
        assert!(!Annotation::Freehand(stroke.clone()).is_valid());
        stroke.points.push(Point::new(1.0, 1.0));
        assert!(!Annotation::Freehand(stroke.clone()).is_valid());
        stroke.points.push(Point::new(9.0, 1.0));
        assert!(Annotation::Freehand(stroke).is_valid());

        let blur = BlurAnnotation {
            id: AnnotationId::next(),
            points: vec![Point::new(1.0, 1.0)],
            blur_radius: 20.0,
            brush_size: 10.0,
        };
        assert!(!Annotation::Blur(blur).is_valid());
    }

    #[test]
    fn test_text_validity_trims_whitespace() {
        let text = |content: &str| {
            Annotation::Text(TextAnnotation {
                id: AnnotationId::next(),
                position: Point::default(),
                content: content.to_string(),
                style: TextStyle::default(),
            })
        };
        assert!(!text("   \n\t").is_valid());
        assert!(text(" hi ").is_valid());
    }

    #[test]
    fn test_text_bounds_use_estimate() {
        let ann = Annotation::Text(TextAnnotation {
            id: AnnotationId::next(),
            position: Point::new(10.0, 20.0),
            content: "abcdef".to_string(),
            style: TextStyle {
                font_size: 10.0,
                ..TextStyle::default()
            },
        });
        let b = ann.bounds();
        assert_eq!((b.x, b.y), (10.0, 20.0));
        assert!((b.width - 36.0).abs() < 1e-4);
        assert!((b.height - 13.0).abs() < 1e-4);

        // Short strings clamp to twice the font size
        assert_eq!(estimate_text_size("a", 10.0).0, 20.0);
    }

    #[test]
    fn test_blur_bounds_include_brush() {
        let ann = Annotation::Blur(BlurAnnotation {
            id: AnnotationId::next(),
            points: vec![Point::new(10.0, 10.0), Point::new(30.0, 20.0)],
            blur_radius: 20.0,
            brush_size: 8.0,
        });
        assert_eq!(ann.bounds(), Rect::new(6.0, 6.0, 28.0, 18.0));
    }

    #[test]
    fn test_bounds_are_stable() {
        let ann = arrow(Point::new(40.0, 5.0), Point::new(10.0, 25.0));
        assert_eq!(ann.bounds(), ann.bounds());
        assert_eq!(ann.bounds(), Rect::new(10.0, 5.0, 30.0, 20.0));
    }

    #[test]
    fn test_translated_keeps_id() {
        let ann = arrow(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let moved = ann.translated(5.0, -2.0);
        assert_eq!(moved.id(), ann.id());
        assert_eq!(moved.bounds(), Rect::new(5.0, -2.0, 10.0, 0.0));
    }

    #[test]
    fn test_style_change_applicability() {
        let ann = arrow(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let wide = ann.with_style_change(&StyleChange::LineWidth(9.0)).unwrap();
        assert_eq!(wide.stroke_style().unwrap().line_width, 9.0);
        assert!(ann.with_style_change(&StyleChange::Filled(true)).is_none());
        assert!(ann.with_style_change(&StyleChange::FontSize(30.0)).is_none());
    }

    #[test]
    fn test_annotation_json_roundtrip_without_id() {
        let json = r#"{"kind":"arrow","start":{"x":0,"y":0},"end":{"x":100,"y":0},
            "style":{"color":{"r":1,"g":0,"b":0,"a":1},"line_width":2}}"#;
        let ann: Annotation = serde_json::from_str(json).unwrap();
        assert!(matches!(ann, Annotation::Arrow(_)));
        assert!(ann.is_valid());
    }

    #[test]
    fn test_loaded_ids_push_counter_past_them() {
        let loaded = AnnotationId::next().get() + 1000;
        let json = format!(
            r#"{{"kind":"arrow","id":{loaded},"start":{{"x":0,"y":0}},"end":{{"x":50,"y":0}},
            "style":{{"color":{{"r":1,"g":0,"b":0}},"line_width":2}}}}"#
        );
        let ann: Annotation = serde_json::from_str(&json).unwrap();
        assert_eq!(ann.id().get(), loaded);
        assert!(AnnotationId::next().get() > loaded);
    }

    #[test]
    fn test_set_id() {
        let mut a = arrow(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let id = AnnotationId::next();
        a.set_id(id);
        assert_eq!(a.id(), id);
    }
}
