//! Crop-selection state
//!
//! The selection is built from the drag start and the current pointer, in
//! any drag direction, and is always stored normalized.

use crate::domain::{Point, Rect};

/// Crop selections smaller than this on either side are rejected
pub const MIN_CROP_SIZE: f32 = 10.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CropState {
    active: bool,
    start: Option<Point>,
    selection: Option<Rect>,
}

impl CropState {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn enter(&mut self) {
        *self = CropState {
            active: true,
            ..CropState::default()
        };
    }

    /// Leave crop mode, dropping any selection
    pub fn exit(&mut self) {
        *self = CropState::default();
    }

    pub fn begin(&mut self, point: Point) {
        if !self.active {
            return;
        }
        self.start = Some(point);
        self.selection = Some(Rect::from_points(point, point));
    }

    pub fn update(&mut self, point: Point) {
        if let Some(start) = self.start {
            self.selection = Some(Rect::from_points(start, point));
        }
    }

    /// Finish the drag; selections under the minimum size are discarded
    pub fn end(&mut self, point: Point) -> Option<Rect> {
        self.update(point);
        self.start = None;
        self.selection = self.selection.filter(|r| is_large_enough(r));
        self.selection
    }

    pub fn selection(&self) -> Option<Rect> {
        self.selection
    }

    pub fn is_selecting(&self) -> bool {
        self.start.is_some()
    }
}

pub fn is_large_enough(rect: &Rect) -> bool {
    rect.width >= MIN_CROP_SIZE && rect.height >= MIN_CROP_SIZE
}
