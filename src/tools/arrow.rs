//! Arrow tool: drag from tail to head

use super::{DrawingTool, ToolKind};
use crate::domain::{Annotation, AnnotationId, ArrowAnnotation, Point, StrokeStyle};

#[derive(Debug, Clone)]
pub struct ArrowTool {
    pub style: StrokeStyle,
    drawing: Option<ArrowAnnotation>,
}

impl ArrowTool {
    pub fn new(style: StrokeStyle) -> Self {
        Self {
            style,
            drawing: None,
        }
    }
}

impl DrawingTool for ArrowTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Arrow
    }

    fn begin_drawing(&mut self, point: Point) {
        self.drawing = Some(ArrowAnnotation {
            id: AnnotationId::next(),
            start: point,
            end: point,
            style: self.style,
        });
    }

    fn continue_drawing(&mut self, point: Point) {
        if let Some(arrow) = self.drawing.as_mut() {
            arrow.end = point;
        }
    }

    fn end_drawing(&mut self, point: Point) -> Option<Annotation> {
        let mut arrow = self.drawing.take()?;
        arrow.end = point;
        Some(Annotation::Arrow(arrow)).filter(Annotation::is_valid)
    }

    fn cancel_drawing(&mut self) {
        self.drawing = None;
    }

    fn current_annotation(&self) -> Option<Annotation> {
        self.drawing.clone().map(Annotation::Arrow)
    }

    fn is_drawing(&self) -> bool {
        self.drawing.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_arrow_is_discarded() {
        let mut tool = ArrowTool::new(StrokeStyle::default());
        tool.begin_drawing(Point::new(10.0, 10.0));
        tool.continue_drawing(Point::new(30.0, 10.0));
        assert!(tool.end_drawing(Point::new(13.0, 10.0)).is_none());
        assert!(!tool.is_drawing());
    }

    #[test]
    fn test_arrow_of_exactly_min_length_commits() {
        let mut tool = ArrowTool::new(StrokeStyle::default());
        tool.begin_drawing(Point::new(0.0, 0.0));
        let Some(Annotation::Arrow(arrow)) = tool.end_drawing(Point::new(3.0, 4.0)) else {
            panic!("expected arrow");
        };
        assert_eq!(arrow.start, Point::new(0.0, 0.0));
        assert_eq!(arrow.end, Point::new(3.0, 4.0));
    }

    #[test]
    fn test_preview_follows_pointer() {
        let mut tool = ArrowTool::new(StrokeStyle::default());
        assert!(tool.current_annotation().is_none());
        tool.begin_drawing(Point::new(0.0, 0.0));
        tool.continue_drawing(Point::new(40.0, 2.0));
        let Some(Annotation::Arrow(preview)) = tool.current_annotation() else {
            panic!("expected preview");
        };
        assert_eq!(preview.end, Point::new(40.0, 2.0));
    }
}
