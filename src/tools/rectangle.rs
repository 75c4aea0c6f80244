//! Rectangle tool: drag from one corner to the opposite corner

use super::{DrawingTool, ToolKind};
use crate::domain::{Annotation, AnnotationId, Point, Rect, RectangleAnnotation, StrokeStyle};

#[derive(Debug, Clone)]
struct RectDrag {
    id: AnnotationId,
    anchor: Point,
    current: Point,
    style: StrokeStyle,
    filled: bool,
}

impl RectDrag {
    fn annotation(&self) -> Annotation {
        Annotation::Rectangle(RectangleAnnotation {
            id: self.id,
            rect: Rect::from_points(self.anchor, self.current),
            style: self.style,
            is_filled: self.filled,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RectangleTool {
    pub style: StrokeStyle,
    pub filled: bool,
    drag: Option<RectDrag>,
}

impl RectangleTool {
    pub fn new(style: StrokeStyle, filled: bool) -> Self {
        Self {
            style,
            filled,
            drag: None,
        }
    }
}

impl DrawingTool for RectangleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Rectangle
    }

    fn begin_drawing(&mut self, point: Point) {
        self.drag = Some(RectDrag {
            id: AnnotationId::next(),
            anchor: point,
            current: point,
            style: self.style,
            filled: self.filled,
        });
    }

    fn continue_drawing(&mut self, point: Point) {
        if let Some(drag) = self.drag.as_mut() {
            drag.current = point;
        }
    }

    fn end_drawing(&mut self, point: Point) -> Option<Annotation> {
        let mut drag = self.drag.take()?;
        drag.current = point;
        Some(drag.annotation()).filter(Annotation::is_valid)
    }

    fn cancel_drawing(&mut self) {
        self.drag = None;
    }

    fn current_annotation(&self) -> Option<Annotation> {
        self.drag.as_ref().map(RectDrag::annotation)
    }

    fn is_drawing(&self) -> bool {
        self.drag.is_some()
    }
}
