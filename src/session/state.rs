//! The edit session: sole owner of a screenshot's annotations while editing
//!
//! All mutation goes through here: tool gestures, selection, dragging,
//! style edits, deletion, crop and undo/redo. The session is single-threaded
//! by construction; renderers receive value snapshots of its state.

use crate::config::AnnotatorConfig;
use crate::domain::{
    Annotation, AnnotationId, BlurSettings, PixelRect, Point, Rect, Screenshot, StrokeStyle,
    StyleChange, TextStyle,
};
use crate::error::CropError;
use crate::tools::{ActiveTool, ToolKind, ToolStyles};

use super::crop::{self, CropState, MIN_CROP_SIZE};
use super::history::History;

/// Hit-test tolerance around annotation bounds, in image pixels
pub const HIT_TEST_PADDING: f32 = 10.0;

/// Notifications for whoever displays the session
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// Annotations or image changed without a size change
    Changed,
    /// The image changed size (crop, or undo/redo across a crop)
    ImageResized { width: u32, height: u32 },
    /// A crop was refused; crop mode has been left without changes
    CropRejected(CropError),
}

/// In-flight annotation drag
#[derive(Clone, Debug)]
struct DragState {
    index: usize,
    start: Point,
    original: Annotation,
    before: Screenshot,
}

#[derive(Debug)]
pub struct EditSession {
    screenshot: Screenshot,
    history: History,
    styles: ToolStyles,
    tool: Option<ActiveTool>,
    selected: Option<usize>,
    drag: Option<DragState>,
    crop: CropState,
}

impl EditSession {
    pub fn new(screenshot: Screenshot, styles: ToolStyles) -> Self {
        Self {
            screenshot,
            history: History::new(),
            styles,
            tool: None,
            selected: None,
            drag: None,
            crop: CropState::default(),
        }
    }

    /// Session whose tool defaults come from the settings file
    pub fn with_config(screenshot: Screenshot, config: &AnnotatorConfig) -> Self {
        Self::new(screenshot, ToolStyles::from(config))
    }

    pub fn screenshot(&self) -> &Screenshot {
        &self.screenshot
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.screenshot.annotations
    }

    /// End the session, handing the screenshot to the export path
    pub fn into_screenshot(self) -> Screenshot {
        self.screenshot
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // ------------------------------------------------------------------
    // Tools
    // ------------------------------------------------------------------

    /// Switch tools. Cancels any in-progress gesture, leaves crop mode and
    /// clears the selection; `None` leaves no tool active.
    pub fn select_tool(&mut self, kind: Option<ToolKind>) {
        self.cancel_drawing();
        self.crop.exit();
        self.selected = None;
        self.drag = None;
        self.tool = kind.map(|kind| ActiveTool::new(kind, &self.styles));
        log::debug!("Active tool: {:?}", kind);
    }

    pub fn active_tool(&self) -> Option<ToolKind> {
        self.tool.as_ref().map(ActiveTool::kind)
    }

    pub fn tool_styles(&self) -> &ToolStyles {
        &self.styles
    }

    pub fn set_stroke_style(&mut self, style: StrokeStyle) {
        self.styles.stroke = style;
        self.refresh_tool_styles();
    }

    pub fn set_fill_rectangles(&mut self, filled: bool) {
        self.styles.fill_rectangles = filled;
        self.refresh_tool_styles();
    }

    pub fn set_text_style(&mut self, style: TextStyle) {
        self.styles.text = style;
        self.refresh_tool_styles();
    }

    pub fn set_blur_settings(&mut self, settings: BlurSettings) {
        self.styles.blur = settings;
        self.refresh_tool_styles();
    }

    fn refresh_tool_styles(&mut self) {
        if let Some(tool) = self.tool.as_mut() {
            tool.apply_styles(&self.styles);
        }
    }

    pub fn begin_drawing(&mut self, point: Point) {
        if let Some(tool) = self.tool.as_mut() {
            tool.as_tool_mut().begin_drawing(point);
        }
    }

    pub fn continue_drawing(&mut self, point: Point) {
        if let Some(tool) = self.tool.as_mut() {
            tool.as_tool_mut().continue_drawing(point);
        }
    }

    /// Finish the gesture; a valid result is added as a new annotation.
    ///
    /// Returns whether an annotation was added.
    pub fn end_drawing(&mut self, point: Point) -> bool {
        let finished = self
            .tool
            .as_mut()
            .and_then(|tool| tool.as_tool_mut().end_drawing(point));
        match finished {
            Some(annotation) => {
                self.add_annotation(annotation);
                true
            }
            None => false,
        }
    }

    /// Commit the open text draft with `content`. Returns whether text was added.
    pub fn commit_text(&mut self, content: &str) -> bool {
        let Some(ActiveTool::Text(tool)) = self.tool.as_mut() else {
            return false;
        };
        match tool.commit_text(content) {
            Some(annotation) => {
                self.add_annotation(annotation);
                true
            }
            None => false,
        }
    }

    /// Update the live text of the open text draft
    pub fn set_draft_text(&mut self, content: &str) {
        if let Some(ActiveTool::Text(tool)) = self.tool.as_mut() {
            tool.set_text(content);
        }
    }

    pub fn cancel_drawing(&mut self) {
        if let Some(tool) = self.tool.as_mut() {
            tool.as_tool_mut().cancel_drawing();
        }
    }

    /// In-progress shape for live rendering
    pub fn current_preview(&self) -> Option<Annotation> {
        self.tool
            .as_ref()
            .and_then(|tool| tool.as_tool().current_annotation())
    }

    // ------------------------------------------------------------------
    // Annotation list
    // ------------------------------------------------------------------

    /// Append an annotation; an id already in the list is replaced with a fresh one
    pub fn add_annotation(&mut self, mut annotation: Annotation) {
        let id = annotation.id();
        if self.screenshot.annotations.iter().any(|a| a.id() == id) {
            annotation.set_id(AnnotationId::next());
        }
        self.history.record(self.screenshot.clone());
        log::debug!("Adding annotation {:?}", annotation.id());
        self.screenshot.annotations.push(annotation);
    }

    /// Topmost annotation whose padded bounds contain `point`
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        self.screenshot
            .annotations
            .iter()
            .rposition(|a| a.bounds().inflate(HIT_TEST_PADDING).contains(point))
    }

    /// Select the annotation at `index`; deactivates the current tool
    pub fn select_annotation(&mut self, index: usize) -> bool {
        if index >= self.screenshot.annotations.len() {
            return false;
        }
        self.cancel_drawing();
        self.tool = None;
        self.selected = Some(index);
        true
    }

    pub fn deselect_annotation(&mut self) {
        self.selected = None;
        self.drag = None;
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_annotation(&self) -> Option<&Annotation> {
        self.selected.and_then(|i| self.screenshot.annotations.get(i))
    }

    /// Start moving the selected annotation. Returns false with nothing selected.
    pub fn begin_dragging_annotation(&mut self, point: Point) -> bool {
        let Some(index) = self.selected else {
            return false;
        };
        let Some(original) = self.screenshot.annotations.get(index).cloned() else {
            return false;
        };
        self.drag = Some(DragState {
            index,
            start: point,
            original,
            before: self.screenshot.clone(),
        });
        true
    }

    /// Move the dragged annotation so it sits `point - start` from where it began
    pub fn continue_dragging_annotation(&mut self, point: Point) {
        let Some(drag) = self.drag.as_ref() else {
            return;
        };
        let moved = drag
            .original
            .translated(point.x - drag.start.x, point.y - drag.start.y);
        if let Some(slot) = self.screenshot.annotations.get_mut(drag.index) {
            *slot = moved;
        }
    }

    /// Finish the drag. A drag that moved the annotation becomes one undo step.
    pub fn end_dragging_annotation(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let moved = self
            .screenshot
            .annotations
            .get(drag.index)
            .is_some_and(|a| *a != drag.original);
        if moved {
            self.history.record(drag.before);
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Apply a style edit to the selected annotation.
    ///
    /// Returns false when nothing is selected or the edit does not apply to
    /// the selected kind; no undo step is recorded in that case.
    pub fn update_selected_annotation_style(&mut self, change: StyleChange) -> bool {
        let Some(index) = self.selected else {
            return false;
        };
        // A drag in progress is settled first so the edit lands on top of it
        self.end_dragging_annotation();
        let Some(updated) = self
            .screenshot
            .annotations
            .get(index)
            .and_then(|a| a.with_style_change(&change))
        else {
            return false;
        };
        self.history.record(self.screenshot.clone());
        self.screenshot.annotations[index] = updated;
        true
    }

    pub fn delete_selected_annotation(&mut self) -> bool {
        let Some(index) = self.selected.take() else {
            return false;
        };
        if index >= self.screenshot.annotations.len() {
            return false;
        }
        self.end_dragging_annotation();
        self.history.record(self.screenshot.clone());
        self.screenshot.annotations.remove(index);
        true
    }

    /// Remove every annotation as a single undo step
    pub fn clear_annotations(&mut self) -> bool {
        if self.screenshot.annotations.is_empty() {
            return false;
        }
        self.history.record(self.screenshot.clone());
        self.screenshot.annotations.clear();
        self.selected = None;
        self.drag = None;
        true
    }

    // ------------------------------------------------------------------
    // Undo / redo
    // ------------------------------------------------------------------

    /// Step back one state. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<SessionEvent> {
        let before = self.screenshot.dimensions();
        if !self.history.undo(&mut self.screenshot) {
            return None;
        }
        Some(self.after_history_step(before))
    }

    /// Step forward one state. `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<SessionEvent> {
        let before = self.screenshot.dimensions();
        if !self.history.redo(&mut self.screenshot) {
            return None;
        }
        Some(self.after_history_step(before))
    }

    fn after_history_step(&mut self, before: (u32, u32)) -> SessionEvent {
        self.selected = None;
        self.drag = None;
        let (width, height) = self.screenshot.dimensions();
        if (width, height) != before {
            log::debug!("History step resized image to {}x{}", width, height);
            SessionEvent::ImageResized { width, height }
        } else {
            SessionEvent::Changed
        }
    }

    // ------------------------------------------------------------------
    // Crop
    // ------------------------------------------------------------------

    /// Enter crop mode; tool and crop are mutually exclusive
    pub fn begin_crop_mode(&mut self) {
        self.cancel_drawing();
        self.tool = None;
        self.selected = None;
        self.drag = None;
        self.crop.enter();
    }

    pub fn cancel_crop_mode(&mut self) {
        self.crop.exit();
    }

    pub fn is_crop_mode(&self) -> bool {
        self.crop.is_active()
    }

    pub fn begin_crop_selection(&mut self, point: Point) {
        self.crop.begin(point);
    }

    pub fn continue_crop_selection(&mut self, point: Point) {
        self.crop.update(point);
    }

    /// Finish the crop drag; returns the selection if it is large enough
    pub fn end_crop_selection(&mut self, point: Point) -> Option<Rect> {
        self.crop.end(point)
    }

    pub fn crop_selection(&self) -> Option<Rect> {
        self.crop.selection()
    }

    /// Replace the screenshot with the selected region.
    ///
    /// The selection is clamped to the image first. Annotations are not
    /// carried over. On error the session is unchanged apart from leaving
    /// crop mode.
    pub fn apply_crop(&mut self) -> Result<SessionEvent, CropError> {
        let Some(selection) = self.crop.selection() else {
            self.crop.exit();
            return Err(CropError::NoSelection);
        };
        let (width, height) = self.screenshot.dimensions();
        let bounds = Rect::new(0.0, 0.0, width as f32, height as f32);
        let clamped = selection.intersect(&bounds).unwrap_or_default();

        let region = Some(clamped)
            .filter(crop::is_large_enough)
            .and_then(|r| PixelRect::clamped(&r, width, height));
        let Some(region) = region else {
            self.crop.exit();
            log::warn!(
                "Crop selection too small after clamping: {}x{}",
                clamped.width,
                clamped.height
            );
            return Err(CropError::SelectionTooSmall {
                width: clamped.width,
                height: clamped.height,
                min: MIN_CROP_SIZE,
            });
        };

        self.history.record(self.screenshot.clone());
        self.screenshot = self.screenshot.cropped(region);
        self.crop.exit();
        self.selected = None;
        self.drag = None;
        self.cancel_drawing();

        log::debug!("Cropped to {:?}", region);
        Ok(SessionEvent::ImageResized {
            width: region.width,
            height: region.height,
        })
    }
}
