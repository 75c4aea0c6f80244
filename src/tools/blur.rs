//! Blur brush tool
//!
//! Brush size and blur radius are captured when the stroke starts, so
//! changing the settings mid-stroke only affects the next stroke.

use super::{DrawingTool, ToolKind, push_spaced};
use crate::domain::{Annotation, AnnotationId, BlurAnnotation, BlurSettings, Point};

#[derive(Debug, Clone)]
pub struct BlurTool {
    pub settings: BlurSettings,
    stroke: Option<BlurAnnotation>,
}

impl BlurTool {
    pub fn new(settings: BlurSettings) -> Self {
        Self {
            settings,
            stroke: None,
        }
    }
}

impl DrawingTool for BlurTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Blur
    }

    fn begin_drawing(&mut self, point: Point) {
        self.stroke = Some(BlurAnnotation {
            id: AnnotationId::next(),
            points: vec![point],
            blur_radius: self.settings.blur_radius,
            brush_size: self.settings.brush_size,
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
        Some(Annotation::Blur(stroke)).filter(Annotation::is_valid)
    }

    fn cancel_drawing(&mut self) {
        self.stroke = None;
    }

    fn current_annotation(&self) -> Option<Annotation> {
        self.stroke.clone().map(Annotation::Blur)
    }

    fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }
}
