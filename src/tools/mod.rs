//! Drawing tools: one small state machine per annotation kind
//!
//! Every tool moves through Idle -> Drawing -> (Committed | Cancelled).
//! The session owns exactly one [`ActiveTool`] at a time and forwards
//! pointer gestures to it.

pub mod arrow;
pub mod blur;
pub mod freehand;
pub mod rectangle;
pub mod text;

use serde::{Deserialize, Serialize};

pub use arrow::ArrowTool;
pub use blur::BlurTool;
pub use freehand::FreehandTool;
pub use rectangle::RectangleTool;
pub use text::TextTool;

use crate::config::AnnotatorConfig;
use crate::domain::{Annotation, BlurSettings, Point, StrokeStyle, TextStyle};

/// Freehand and blur strokes only record points farther than this from the last one
pub const MIN_POINT_SPACING: f32 = 3.0;

/// Annotation tool type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolKind {
    Rectangle,
    Freehand,
    Arrow,
    Text,
    Blur,
}

/// Common interface of the per-kind tool state machines
pub trait DrawingTool {
    fn kind(&self) -> ToolKind;

    /// Idle -> Drawing, anchored at `point`
    fn begin_drawing(&mut self, point: Point);

    /// Drawing -> Drawing; ignored while idle
    fn continue_drawing(&mut self, point: Point);

    /// Finish the gesture, returning the annotation if it passes validation
    fn end_drawing(&mut self, point: Point) -> Option<Annotation>;

    /// Any state -> Idle, discarding buffered data
    fn cancel_drawing(&mut self);

    /// Preview of the in-progress shape, `None` while idle
    fn current_annotation(&self) -> Option<Annotation>;

    fn is_drawing(&self) -> bool;
}

/// Styles handed to tools when they are activated
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolStyles {
    pub stroke: StrokeStyle,
    pub fill_rectangles: bool,
    pub text: TextStyle,
    pub blur: BlurSettings,
}

impl From<&AnnotatorConfig> for ToolStyles {
    fn from(config: &AnnotatorConfig) -> Self {
        Self {
            stroke: config.stroke_style(),
            fill_rectangles: config.fill_rectangles,
            text: config.text_style(),
            blur: config.blur_settings(),
        }
    }
}

/// The currently selected tool and its drawing state
#[derive(Debug, Clone)]
pub enum ActiveTool {
    Rectangle(RectangleTool),
    Freehand(FreehandTool),
    Arrow(ArrowTool),
    Text(TextTool),
    Blur(BlurTool),
}

impl ActiveTool {
    pub fn new(kind: ToolKind, styles: &ToolStyles) -> Self {
        match kind {
            ToolKind::Rectangle => {
                ActiveTool::Rectangle(RectangleTool::new(styles.stroke, styles.fill_rectangles))
            }
            ToolKind::Freehand => ActiveTool::Freehand(FreehandTool::new(styles.stroke)),
            ToolKind::Arrow => ActiveTool::Arrow(ArrowTool::new(styles.stroke)),
            ToolKind::Text => ActiveTool::Text(TextTool::new(styles.text.clone())),
            ToolKind::Blur => ActiveTool::Blur(BlurTool::new(styles.blur)),
        }
    }

    /// Update the style used for the next gesture; an in-progress gesture keeps its own
    pub fn apply_styles(&mut self, styles: &ToolStyles) {
        match self {
            ActiveTool::Rectangle(t) => {
                t.style = styles.stroke;
                t.filled = styles.fill_rectangles;
            }
            ActiveTool::Freehand(t) => t.style = styles.stroke,
            ActiveTool::Arrow(t) => t.style = styles.stroke,
            ActiveTool::Text(t) => t.style = styles.text.clone(),
            ActiveTool::Blur(t) => t.settings = styles.blur,
        }
    }

    pub fn as_tool(&self) -> &dyn DrawingTool {
        match self {
            ActiveTool::Rectangle(t) => t,
            ActiveTool::Freehand(t) => t,
            ActiveTool::Arrow(t) => t,
            ActiveTool::Text(t) => t,
            ActiveTool::Blur(t) => t,
        }
    }

    pub fn as_tool_mut(&mut self) -> &mut dyn DrawingTool {
        match self {
            ActiveTool::Rectangle(t) => t,
            ActiveTool::Freehand(t) => t,
            ActiveTool::Arrow(t) => t,
            ActiveTool::Text(t) => t,
            ActiveTool::Blur(t) => t,
        }
    }

    pub fn kind(&self) -> ToolKind {
        self.as_tool().kind()
    }
}

/// Push `point` onto `points` if it is far enough from the last recorded point
pub(crate) fn push_spaced(points: &mut Vec<Point>, point: Point) -> bool {
    match points.last() {
        Some(last) if last.distance_to(point) <= MIN_POINT_SPACING => false,
        _ => {
            points.push(point);
            true
        }
    }
}
