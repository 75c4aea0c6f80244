//! Coordinate transforms out of image space
//!
//! Annotations live in image space (pixels, origin top-left). Two consumers
//! need other spaces:
//! - the interactive overlay draws in display space (scaled, origin top-left)
//! - the compositor draws in raster space (unscaled, origin bottom-left)
//!
//! Every primitive the painter emits goes through one of these, so preview
//! and export agree on where things land.

use crate::domain::{Point, Rect};

/// Mapping from image space onto a drawing surface
pub trait SurfaceTransform {
    /// Surface units per image pixel
    fn scale(&self) -> f32;

    /// Map an image-space point onto the surface
    fn point(&self, p: Point) -> Point;

    /// Map an image-space rectangle onto the surface; the result is normalized
    fn rect(&self, r: Rect) -> Rect;

    /// Whether surface rows run bottom-up relative to the image
    fn flips_y(&self) -> bool;
}

/// Image space -> on-screen display space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayTransform {
    /// Display units per image pixel
    pub scale: f32,
}

impl DisplayTransform {
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }

    /// Transform that fits an image of `image_width` pixels into `display_width` units
    pub fn fit_width(image_width: u32, display_width: f32) -> Self {
        Self::new(display_width / image_width.max(1) as f32)
    }

    /// Map a pointer position in display space back to image space
    pub fn to_image(&self, p: Point) -> Point {
        Point::new(p.x / self.scale, p.y / self.scale)
    }
}

impl SurfaceTransform for DisplayTransform {
    fn scale(&self) -> f32 {
        self.scale
    }

    fn point(&self, p: Point) -> Point {
        Point::new(p.x * self.scale, p.y * self.scale)
    }

    fn rect(&self, r: Rect) -> Rect {
        Rect {
            x: r.x * self.scale,
            y: r.y * self.scale,
            width: r.width * self.scale,
            height: r.height * self.scale,
        }
    }

    fn flips_y(&self) -> bool {
        false
    }
}

/// Image space -> bottom-left-origin raster space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterTransform {
    pub image_height: f32,
}

impl RasterTransform {
    pub fn new(image_height: u32) -> Self {
        Self {
            image_height: image_height as f32,
        }
    }
}

impl SurfaceTransform for RasterTransform {
    fn scale(&self) -> f32 {
        1.0
    }

    fn point(&self, p: Point) -> Point {
        Point::new(p.x, self.image_height - p.y)
    }

    fn rect(&self, r: Rect) -> Rect {
        Rect {
            x: r.x,
            y: self.image_height - r.y - r.height,
            width: r.width,
            height: r.height,
        }
    }

    fn flips_y(&self) -> bool {
        true
    }
}
