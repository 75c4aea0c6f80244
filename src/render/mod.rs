//! Annotation rendering module
//!
//! This module contains:
//! - Geometry calculations shared between preview and export rendering
//! - The tiny-skia canvas and the per-annotation painter
//! - The blur brush and text rasterization
//! - The compositor (save, clipboard, share) and the interactive overlay
//! - A background worker for compositing off the UI thread

pub mod blur;
pub mod canvas;
pub mod geometry;
pub mod image;
pub mod overlay;
pub mod painter;
pub mod text;
pub mod worker;

pub use self::image::{composite, composite_screenshot};
pub use overlay::render_overlay;
pub use text::FontBook;
pub use worker::{RenderOutput, RenderRequest, RenderWorker};
