//! Shared geometry calculations for annotations
//!
//! Constants and math shared between the interactive overlay and the
//! compositor, so both draw exactly the same shapes.

use crate::domain::Point;

/// Arrow geometry constants
pub mod arrow {
    use super::Point;

    /// Arrowhead angle from shaft in radians (30 degrees)
    pub const HEAD_ANGLE: f32 = std::f32::consts::FRAC_PI_6;
    /// Arrowhead length never drops below this
    pub const MIN_HEAD_LENGTH: f32 = 12.0;
    /// Arrowhead length as a multiple of the line width
    pub const HEAD_LENGTH_FACTOR: f32 = 4.0;

    pub fn head_length(line_width: f32) -> f32 {
        (line_width * HEAD_LENGTH_FACTOR).max(MIN_HEAD_LENGTH)
    }

    /// Back vertices of the filled arrowhead triangle whose tip is `end`.
    ///
    /// Returns `None` for a zero-length arrow, which has no direction.
    pub fn head_points(start: Point, end: Point, line_width: f32) -> Option<[Point; 2]> {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }

        let angle = dy.atan2(dx);
        let length = head_length(line_width);
        let back = |a: f32| Point::new(end.x - length * a.cos(), end.y - length * a.sin());
        Some([back(angle - HEAD_ANGLE), back(angle + HEAD_ANGLE)])
    }
}

/// Blur brush constants
pub mod blur {
    /// Effective sigma is this minus the configured blur radius
    pub const SIGMA_BASE: f32 = 35.0;

    /// Gaussian sigma for a configured blur radius.
    ///
    /// The mapping is inverted: a larger radius yields a lighter blur.
    pub fn effective_sigma(blur_radius: f32) -> f32 {
        SIGMA_BASE - blur_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigma_mapping() {
        assert_eq!(blur::effective_sigma(30.0), 5.0);
        assert_eq!(blur::effective_sigma(5.0), 30.0);
    }

    #[test]
    fn test_head_length_has_floor() {
        assert_eq!(arrow::head_length(2.0), 12.0);
        assert_eq!(arrow::head_length(5.0), 20.0);
    }

    #[test]
    fn test_head_points_for_horizontal_arrow() {
        let [a, b] =
            arrow::head_points(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 2.0).unwrap();
        // Both back vertices sit 12 * cos(30deg) behind the tip, mirrored about the shaft
        let back_x = 100.0 - 12.0 * (std::f32::consts::FRAC_PI_6).cos();
        assert!((a.x - back_x).abs() < 1e-3);
        assert!((b.x - back_x).abs() < 1e-3);
        assert!((a.y - 6.0).abs() < 1e-3);
        assert!((b.y + 6.0).abs() < 1e-3);
    }

    #[test]
    fn test_head_points_zero_length() {
        let p = Point::new(4.0, 4.0);
        assert!(arrow::head_points(p, p, 3.0).is_none());
    }
}
