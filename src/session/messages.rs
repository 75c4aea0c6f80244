//! Message types for an edit session
//!
//! A front end translates input into [`EditMsg`] values and feeds them to
//! [`handle_edit_msg`], which routes them to the session.

use crate::domain::{Point, StyleChange};
use crate::tools::ToolKind;

use super::state::{EditSession, SessionEvent};

// ============================================================================
// Pointer Action Types
// ============================================================================

/// Pointer phase shared by drawing, dragging and crop selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    Press(Point),
    Move(Point),
    Release(Point),
}

/// All editing messages
#[derive(Debug, Clone, PartialEq)]
pub enum EditMsg {
    /// Activate a tool, or none
    SelectTool(Option<ToolKind>),
    /// Pointer input for the active tool
    Draw(PointerAction),
    /// Update the text of the open text draft
    EditText(String),
    /// Commit the open text draft
    CommitText(String),
    /// Abandon the current gesture
    CancelDrawing,
    /// Select the topmost annotation under the point, or deselect
    Select(Point),
    Deselect,
    /// Pointer input for moving the selected annotation
    Drag(PointerAction),
    /// Restyle the selected annotation
    Style(StyleChange),
    DeleteSelected,
    ClearAll,
    Undo,
    Redo,
    EnterCropMode,
    CancelCropMode,
    /// Pointer input for the crop selection
    CropSelect(PointerAction),
    ApplyCrop,
}

/// Handle an EditMsg, modifying session state
///
/// Returns an event when the displayed image or annotations changed.
pub fn handle_edit_msg(session: &mut EditSession, msg: EditMsg) -> Option<SessionEvent> {
    match msg {
        EditMsg::SelectTool(kind) => {
            session.select_tool(kind);
            None
        }
        EditMsg::Draw(action) => handle_draw(session, action),
        EditMsg::EditText(content) => {
            session.set_draft_text(&content);
            None
        }
        EditMsg::CommitText(content) => changed(session.commit_text(&content)),
        EditMsg::CancelDrawing => {
            session.cancel_drawing();
            None
        }
        EditMsg::Select(point) => {
            match session.hit_test(point) {
                Some(index) => {
                    session.select_annotation(index);
                }
                None => session.deselect_annotation(),
            }
            None
        }
        EditMsg::Deselect => {
            session.deselect_annotation();
            None
        }
        EditMsg::Drag(action) => handle_drag(session, action),
        EditMsg::Style(change) => changed(session.update_selected_annotation_style(change)),
        EditMsg::DeleteSelected => changed(session.delete_selected_annotation()),
        EditMsg::ClearAll => changed(session.clear_annotations()),
        EditMsg::Undo => session.undo(),
        EditMsg::Redo => session.redo(),
        EditMsg::EnterCropMode => {
            session.begin_crop_mode();
            None
        }
        EditMsg::CancelCropMode => {
            session.cancel_crop_mode();
            None
        }
        EditMsg::CropSelect(action) => {
            handle_crop_select(session, action);
            None
        }
        EditMsg::ApplyCrop => Some(
            session
                .apply_crop()
                .unwrap_or_else(SessionEvent::CropRejected),
        ),
    }
}

fn changed(did_change: bool) -> Option<SessionEvent> {
    did_change.then_some(SessionEvent::Changed)
}

// ============================================================================
// Drawing handlers
// ============================================================================

fn handle_draw(session: &mut EditSession, action: PointerAction) -> Option<SessionEvent> {
    match action {
        PointerAction::Press(point) => {
            session.begin_drawing(point);
            None
        }
        PointerAction::Move(point) => {
            session.continue_drawing(point);
            None
        }
        PointerAction::Release(point) => changed(session.end_drawing(point)),
    }
}

// ============================================================================
// Drag handlers
// ============================================================================

fn handle_drag(session: &mut EditSession, action: PointerAction) -> Option<SessionEvent> {
    match action {
        PointerAction::Press(point) => {
            session.begin_dragging_annotation(point);
            None
        }
        PointerAction::Move(point) => {
            session.continue_dragging_annotation(point);
            None
        }
        PointerAction::Release(point) => {
            session.continue_dragging_annotation(point);
            let dragging = session.is_dragging();
            session.end_dragging_annotation();
            changed(dragging)
        }
    }
}

// ============================================================================
// Crop handlers
// ============================================================================

fn handle_crop_select(session: &mut EditSession, action: PointerAction) {
    match action {
        PointerAction::Press(point) => session.begin_crop_selection(point),
        PointerAction::Move(point) => session.continue_crop_selection(point),
        PointerAction::Release(point) => {
            if session.end_crop_selection(point).is_none() {
                log::debug!("Crop selection discarded as too small");
            }
        }
    }
}
