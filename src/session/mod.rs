//! Edit session management
//!
//! This module contains:
//! - The edit session that owns a screenshot's annotations while editing
//! - Snapshot undo/redo history
//! - Crop-selection state
//! - Message types and the message handler

pub mod crop;
pub mod history;
pub mod messages;
pub mod state;

pub use crop::{CropState, MIN_CROP_SIZE};
pub use history::{History, MAX_UNDO_DEPTH};
pub use messages::{EditMsg, PointerAction, handle_edit_msg};
pub use state::{EditSession, HIT_TEST_PADDING, SessionEvent};
