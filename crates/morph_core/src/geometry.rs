//! Geometry value types
//!
//! Plain `Copy` values describing points and axis-aligned bounds. Nodes report
//! their geometry as [`Bounds`]; helpers such as arc translation and stagger
//! computation work in [`Coordinates`].

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f32,
    pub y: f32,
}

impl Coordinates {
    pub const ZERO: Coordinates = Coordinates { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point halfway between `self` and `other`
    pub fn midpoint(&self, other: &Coordinates) -> Coordinates {
        Coordinates::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Euclidean distance to `other`
    pub fn distance(&self, other: &Coordinates) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl Add for Coordinates {
    type Output = Coordinates;

    fn add(self, rhs: Coordinates) -> Coordinates {
        Coordinates::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coordinates {
    type Output = Coordinates;

    fn sub(self, rhs: Coordinates) -> Coordinates {
        Coordinates::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f32, f32)> for Coordinates {
    fn from((x, y): (f32, f32)) -> Self {
        Coordinates::new(x, y)
    }
}

/// Axis-aligned bounds: origin plus size
///
/// Edges are derived, never stored, so a `Bounds` is always internally
/// consistent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const ZERO: Bounds = Bounds {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn origin(&self) -> Coordinates {
        Coordinates::new(self.x, self.y)
    }

    pub fn center(&self) -> Coordinates {
        Coordinates::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Length of the diagonal, used to normalize distances inside these bounds
    pub fn diagonal(&self) -> f32 {
        self.width.hypot(self.height)
    }

    /// True when the bounds cover no area
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point lies inside (left/top inclusive, right/bottom exclusive)
    pub fn contains(&self, point: Coordinates) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Check if two bounds intersect. Touching edges count as overlap.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() <= other.bottom()
            && self.bottom() >= other.top()
    }

    /// Check if the vertical spans intersect, ignoring horizontal position.
    ///
    /// Unlike [`Bounds::overlaps`], spans that only touch do not count.
    pub fn overlaps_vertically(&self, other: &Bounds) -> bool {
        self.top() < other.bottom() && self.bottom() > other.top()
    }

    /// Check if the horizontal spans intersect, ignoring vertical position.
    pub fn overlaps_horizontally(&self, other: &Bounds) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }

    /// Copy of these bounds moved by `(dx, dy)`
    pub fn translated(&self, dx: f32, dy: f32) -> Bounds {
        Bounds::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}
