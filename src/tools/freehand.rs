//! Freehand pencil tool

use super::{DrawingTool, ToolKind, push_spaced};
use crate::domain::{Annotation, AnnotationId, FreehandAnnotation, Point, StrokeStyle};

#[derive(Debug, Clone)]
pub struct FreehandTool {
    pub style: StrokeStyle,
    stroke: Option<FreehandAnnotation>,
}

impl FreehandTool {
    pub fn new(style: StrokeStyle) -> Self {
        Self {
            style,
            stroke: None,
        }
    }
}

impl DrawingTool for FreehandTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Freehand
    }

    fn begin_drawing(&mut self, point: Point) {
        self.stroke = Some(FreehandAnnotation {
            id: AnnotationId::next(),
            points: vec![point],
            style: self.style,
        });
    }

    fn continue_drawing(&mut self, point: Point) {
        if let Some(stroke) = self.stroke.as_mut() {
            push_spaced(&mut stroke.points, point);
        }
    }

    fn end_drawing(&mut self, point: Point) -> Option<Annotation> {
        let mut stroke = self.stroke.take()?;
        push_spaced(&mut stroke.points, point);
        Some(Annotation::Freehand(stroke)).filter(Annotation::is_valid)
    }

    fn cancel_drawing(&mut self) {
        self.stroke = None;
    }

    fn current_annotation(&self) -> Option<Annotation> {
        self.stroke.clone().map(Annotation::Freehand)
    }

    fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }
}
