//! Drawing surface backed by a tiny-skia pixmap
//!
//! The pixmap stores premultiplied RGBA; `RgbaImage` stores straight alpha.
//! A bottom-up canvas keeps image row `i` at pixmap row `height - 1 - i`, so
//! pixmap rows line up with raster-space y.

use image::RgbaImage;
use tiny_skia::{
    ColorU8, FilterQuality, IntSize, Pixmap, PixmapPaint, PremultipliedColorU8, Transform,
};

use crate::domain::Rect;
use crate::error::RenderError;

/// Row order of a canvas relative to the image it represents
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    TopDown,
    BottomUp,
}

impl Orientation {
    fn flipped(self) -> bool {
        self == Orientation::BottomUp
    }
}

pub struct Canvas {
    pixmap: Pixmap,
    orientation: Orientation,
}

impl Canvas {
    /// Canvas initialised with the pixels of `image`
    pub fn from_image(image: &RgbaImage, orientation: Orientation) -> Result<Self, RenderError> {
        let pixmap = image_to_pixmap(image, orientation.flipped())?;
        Ok(Self {
            pixmap,
            orientation,
        })
    }

    /// Fully transparent canvas
    pub fn transparent(
        width: u32,
        height: u32,
        orientation: Orientation,
    ) -> Result<Self, RenderError> {
        let pixmap = Pixmap::new(width, height)
            .ok_or(RenderError::SurfaceAllocation { width, height })?;
        Ok(Self {
            pixmap,
            orientation,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Draw a top-down `layer` so that it covers `target` (surface coordinates)
    pub fn draw_layer(&mut self, layer: &Pixmap, target: Rect) -> Result<(), RenderError> {
        let flipped;
        let layer = if self.orientation.flipped() {
            flipped = flip_rows(layer)?;
            &flipped
        } else {
            layer
        };

        let sx = target.width / layer.width() as f32;
        let sy = target.height / layer.height() as f32;
        let quality = if sx == 1.0 && sy == 1.0 {
            FilterQuality::Nearest
        } else {
            FilterQuality::Bilinear
        };
        let paint = PixmapPaint {
            quality,
            ..PixmapPaint::default()
        };
        let transform = Transform::from_row(sx, 0.0, 0.0, sy, target.x, target.y);
        self.pixmap
            .draw_pixmap(0, 0, layer.as_ref(), &paint, transform, None);
        Ok(())
    }

    /// Convert back to a top-down straight-alpha image
    pub fn into_image(self) -> RgbaImage {
        pixmap_to_image(&self.pixmap, self.orientation.flipped())
    }
}

/// Copy an image into a premultiplied pixmap, optionally reversing row order
pub fn image_to_pixmap(image: &RgbaImage, flip: bool) -> Result<Pixmap, RenderError> {
    let (width, height) = image.dimensions();
    let mut pixmap =
        Pixmap::new(width, height).ok_or(RenderError::SurfaceAllocation { width, height })?;
    let pixels = pixmap.pixels_mut();
    for (x, y, px) in image.enumerate_pixels() {
        let row = if flip { height - 1 - y } else { y };
        let [r, g, b, a] = px.0;
        pixels[(row * width + x) as usize] = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

/// Copy a pixmap out to a straight-alpha image, optionally reversing row order
pub fn pixmap_to_image(pixmap: &Pixmap, flip: bool) -> RgbaImage {
    let (width, height) = (pixmap.width(), pixmap.height());
    let pixels = pixmap.pixels();
    RgbaImage::from_fn(width, height, |x, y| {
        let row = if flip { height - 1 - y } else { y };
        let c = pixels[(row * width + x) as usize].demultiply();
        image::Rgba([c.red(), c.green(), c.blue(), c.alpha()])
    })
}

/// Pixmap with the same pixels in reverse row order
fn flip_rows(pixmap: &Pixmap) -> Result<Pixmap, RenderError> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let stride = width as usize * 4;
    let mut data = Vec::with_capacity(pixmap.data().len());
    for row in pixmap.data().chunks_exact(stride).rev() {
        data.extend_from_slice(row);
    }
    IntSize::from_wh(width, height)
        .and_then(|size| Pixmap::from_vec(data, size))
        .ok_or(RenderError::SurfaceAllocation { width, height })
}

/// Premultiplied pixel for `color` at the given coverage
pub(crate) fn covered_pixel(rgba: [u8; 4], coverage: f32) -> PremultipliedColorU8 {
    let alpha = (rgba[3] as f32 * coverage.clamp(0.0, 1.0)).round() as u8;
    ColorU8::from_rgba(rgba[0], rgba[1], rgba[2], alpha).premultiply()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| image::Rgba([x as u8 * 10, y as u8 * 10, 7, 255]))
    }

    #[test]
    fn test_roundtrip_preserves_opaque_pixels() {
        let img = gradient(5, 4);
        for orientation in [Orientation::TopDown, Orientation::BottomUp] {
            let canvas = Canvas::from_image(&img, orientation).unwrap();
            assert_eq!(canvas.into_image(), img);
        }
    }

    #[test]
    fn test_bottom_up_canvas_stores_rows_reversed() {
        let img = gradient(3, 4);
        let pixmap = image_to_pixmap(&img, true).unwrap();
        // Pixmap row 0 is the image's last row
        let first = pixmap.pixels()[0].demultiply();
        assert_eq!(first.green(), 30);
    }

    #[test]
    fn test_zero_sized_surface_is_error() {
        assert_eq!(
            Canvas::transparent(0, 10, Orientation::TopDown).err(),
            Some(RenderError::SurfaceAllocation { width: 0, height: 10 })
        );
    }

    #[test]
    fn test_draw_layer_on_bottom_up_canvas_keeps_image_orientation() {
        let base = RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255]));
        let mut canvas = Canvas::from_image(&base, Orientation::BottomUp).unwrap();

        // 1x2 layer: red on top, blue below
        let mut layer_img = RgbaImage::new(1, 2);
        layer_img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        layer_img.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));
        let layer = image_to_pixmap(&layer_img, false).unwrap();

        // Image rect (1, 0, 1, 2) in raster space of a 4-high image is (1, 2, 1, 2)
        canvas
            .draw_layer(&layer, Rect::new(1.0, 2.0, 1.0, 2.0))
            .unwrap();
        let out = canvas.into_image();
        assert_eq!(out.get_pixel(1, 0).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(1, 1).0, [0, 0, 255, 255]);
        assert_eq!(out.get_pixel(1, 2).0, [0, 0, 0, 255]);
    }
}
