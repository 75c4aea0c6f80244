//! Pure domain types with minimal dependencies
//!
//! This module contains the annotation model and the screenshot aggregate.
//! Types here should have no rendering or session dependencies.

pub mod annotation;
pub mod geometry;
pub mod screenshot;

pub use annotation::*;
pub use geometry::*;
pub use screenshot::*;
