//! Screenshot aggregate: captured raster plus its annotation list

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::annotation::Annotation;
use super::geometry::PixelRect;

/// Metadata about the display the raster was captured from
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayMetadata {
    /// Output name reported by the capture backend
    pub name: String,
    /// Physical pixels per logical point
    pub scale_factor: f32,
}

impl Default for DisplayMetadata {
    fn default() -> Self {
        Self {
            name: String::new(),
            scale_factor: 1.0,
        }
    }
}

/// Encoding the export collaborator should use for this screenshot
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }
}

/// A captured image and the annotations layered on it.
///
/// `annotations` order is z-order: later entries draw on top. The raster is
/// shared behind an `Arc` so history snapshots do not copy pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Screenshot {
    pub image: Arc<RgbaImage>,
    pub captured_at: DateTime<Local>,
    pub annotations: Vec<Annotation>,
    pub display: DisplayMetadata,
    pub saved_path: Option<PathBuf>,
    pub format: ImageFormat,
}

impl Screenshot {
    /// Build a screenshot from what the capture backend hands over
    pub fn new(image: RgbaImage, captured_at: DateTime<Local>, display: DisplayMetadata) -> Self {
        log::debug!(
            "Screenshot created: {}x{} pixels from '{}'",
            image.width(),
            image.height(),
            display.name
        );
        Self {
            image: Arc::new(image),
            captured_at,
            annotations: Vec::new(),
            display,
            saved_path: None,
            format: ImageFormat::default(),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// New screenshot holding only `region` of the image.
    ///
    /// Annotations are dropped: their coordinates are meaningless in the new space.
    pub fn cropped(&self, region: PixelRect) -> Screenshot {
        let image =
            image::imageops::crop_imm(&*self.image, region.x, region.y, region.width, region.height)
                .to_image();
        Screenshot {
            image: Arc::new(image),
            captured_at: self.captured_at,
            annotations: Vec::new(),
            display: self.display.clone(),
            saved_path: None,
            format: self.format,
        }
    }
}
