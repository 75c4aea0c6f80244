//! Tool defaults read from the settings file
//!
//! The core only reads settings, at tool-activation time. Writing them is
//! the job of whatever settings UI embeds this crate.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::domain::{BlurSettings, StrokeStyle, TextStyle};

/// Serializable RGBA color, components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Default for Color {
    fn default() -> Self {
        Self::RED
    }
}

impl Color {
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Convert to 8-bit straight-alpha RGBA
    pub fn to_rgba_u8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// Annotation defaults persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Color for shapes (rectangle, freehand, arrow)
    pub stroke_color: Color,
    /// Stroke width for shapes in image pixels
    pub line_width: f32,
    /// Whether new rectangles are filled (cover redaction)
    pub fill_rectangles: bool,
    /// Color for text labels
    pub text_color: Color,
    pub font_size: f32,
    pub font_family: String,
    /// Font file registered under `font_family`; system fallback otherwise
    pub font_path: Option<PathBuf>,
    /// Blur intensity control (effective sigma is 35 minus this)
    pub blur_radius: f32,
    /// Blur brush diameter in image pixels
    pub brush_size: f32,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        let stroke = StrokeStyle::default();
        let text = TextStyle::default();
        let blur = BlurSettings::default();
        Self {
            stroke_color: stroke.color,
            line_width: stroke.line_width,
            fill_rectangles: false,
            text_color: text.color,
            font_size: text.font_size,
            font_family: text.font_family,
            font_path: None,
            blur_radius: blur.blur_radius,
            brush_size: blur.brush_size,
        }
    }
}

impl AnnotatorConfig {
    /// Directory name under the platform config dir
    pub const APP_DIR: &'static str = "snapmark";
    pub const FILE_NAME: &'static str = "config.json";

    /// Default location of the settings file
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::APP_DIR).join(Self::FILE_NAME))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.stroke_color,
            line_width: self.line_width,
        }
    }

    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            color: self.text_color,
            font_size: self.font_size,
            font_family: self.font_family.clone(),
        }
    }

    pub fn blur_settings(&self) -> BlurSettings {
        BlurSettings {
            blur_radius: self.blur_radius,
            brush_size: self.brush_size,
        }
    }
}
