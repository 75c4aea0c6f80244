//! Snapmark: screenshot annotation
//!
//! Annotations live in image pixel space and are rendered twice: onto a
//! scaled overlay while editing, and onto a full-resolution copy of the
//! image by the compositor at export time.

pub mod config;
pub mod domain;
pub mod error;
pub mod render;
pub mod session;
pub mod tools;
pub mod transform;

pub use config::{AnnotatorConfig, Color};
pub use error::{CropError, RenderError};
pub use render::{FontBook, composite, composite_screenshot, render_overlay};
pub use session::{EditMsg, EditSession, SessionEvent, handle_edit_msg};
