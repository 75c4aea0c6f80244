//! Text tool
//!
//! Unlike the shape tools, ending the pointer gesture does not commit:
//! the tool stays open at the clicked position until the text is
//! committed or cancelled.

use super::{DrawingTool, ToolKind};
use crate::domain::{Annotation, AnnotationId, Point, TextAnnotation, TextStyle};

#[derive(Debug, Clone)]
pub struct TextTool {
    pub style: TextStyle,
    draft: Option<TextAnnotation>,
}

impl TextTool {
    pub fn new(style: TextStyle) -> Self {
        Self { style, draft: None }
    }

    /// Replace the text being edited; ignored when no draft is open
    pub fn set_text(&mut self, content: &str) {
        if let Some(draft) = self.draft.as_mut() {
            draft.content = content.to_string();
        }
    }

    /// Close the draft, returning the annotation if its content is not blank
    pub fn commit_text(&mut self, content: &str) -> Option<Annotation> {
        let mut draft = self.draft.take()?;
        draft.content = content.to_string();
        Some(Annotation::Text(draft)).filter(Annotation::is_valid)
    }
}

impl DrawingTool for TextTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Text
    }

    fn begin_drawing(&mut self, point: Point) {
        self.draft = Some(TextAnnotation {
            id: AnnotationId::next(),
            position: point,
            content: String::new(),
            style: self.style.clone(),
        });
    }

    fn continue_drawing(&mut self, _point: Point) {}

    fn end_drawing(&mut self, _point: Point) -> Option<Annotation> {
        None
    }

    fn cancel_drawing(&mut self) {
        self.draft = None;
    }

    fn current_annotation(&self) -> Option<Annotation> {
        self.draft.clone().map(Annotation::Text)
    }

    fn is_drawing(&self) -> bool {
        self.draft.is_some()
    }
}
