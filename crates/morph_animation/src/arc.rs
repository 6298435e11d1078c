//! Curved translation paths
//!
//! Translations normally move in a straight line. An [`ArcPath`] routes the
//! motion through a quadratic bezier instead:
//!
//! ```text
//! p(f) = (1-f)² · start + 2(1-f)f · control + f² · end
//! ```
//!
//! evaluated independently on x and y.

use morph_core::Coordinates;

/// Quadratic bezier path between two points
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcPath {
    pub start: Coordinates,
    pub control: Coordinates,
    pub end: Coordinates,
}

impl ArcPath {
    /// Path from `start` to `end` with the control point at their midpoint
    pub fn new(start: Coordinates, end: Coordinates) -> Self {
        Self {
            start,
            control: start.midpoint(&end),
            end,
        }
    }

    /// Override the control point
    pub fn with_control(mut self, control: Coordinates) -> Self {
        self.control = control;
        self
    }

    /// Point on the path at `fraction`
    pub fn point_at(&self, fraction: f32) -> Coordinates {
        Coordinates::new(self.x_at(fraction), self.y_at(fraction))
    }

    pub fn x_at(&self, fraction: f32) -> f32 {
        quadratic(fraction, self.start.x, self.control.x, self.end.x)
    }

    pub fn y_at(&self, fraction: f32) -> f32 {
        quadratic(fraction, self.start.y, self.control.y, self.end.y)
    }
}

/// Quadratic bezier on a single axis
pub fn quadratic(fraction: f32, start: f32, control: f32, end: f32) -> f32 {
    let inverse = 1.0 - fraction;
    inverse * inverse * start + 2.0 * inverse * fraction * control + fraction * fraction * end
}
