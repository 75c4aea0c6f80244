//! Error types surfaced by the editing session and the compositor

use thiserror::Error;

/// Hard failures while producing a rendered image
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("cannot render a zero-sized image ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("failed to allocate a {width}x{height} drawing surface")]
    SurfaceAllocation { width: u32, height: u32 },
    #[error("render worker has shut down")]
    WorkerGone,
}

/// Reasons a crop cannot be applied
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CropError {
    #[error("no crop selection")]
    NoSelection,
    #[error("selection too small ({width}x{height}), minimum is {min}x{min}")]
    SelectionTooSmall { width: f32, height: f32, min: f32 },
}
