//! Per-corner elliptical radii
//!
//! [`CornerRadii`] stores an x/y radius pair for every corner in a fixed
//! 8-element array, ordered clockwise from the top-left:
//!
//! | index | corner       |
//! |-------|--------------|
//! | 0, 1  | top-left     |
//! | 2, 3  | top-right    |
//! | 4, 5  | bottom-right |
//! | 6, 7  | bottom-left  |
//!
//! Partial updates go through [`CornerSet`] so untouched corners keep their
//! values.

use crate::error::{GeometryError, Result};
use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// Number of components in a [`CornerRadii`]
pub const CORNER_COMPONENTS: usize = 8;

/// A single corner, or all of them
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    #[default]
    All,
}

impl Corner {
    /// Array indices holding this corner's x and y radius
    pub fn indices(self) -> &'static [usize] {
        match self {
            Corner::TopLeft => &[0, 1],
            Corner::TopRight => &[2, 3],
            Corner::BottomRight => &[4, 5],
            Corner::BottomLeft => &[6, 7],
            Corner::All => &[0, 1, 2, 3, 4, 5, 6, 7],
        }
    }

    fn bit(self) -> u8 {
        match self {
            Corner::TopLeft => 0b0001,
            Corner::TopRight => 0b0010,
            Corner::BottomRight => 0b0100,
            Corner::BottomLeft => 0b1000,
            Corner::All => 0b1111,
        }
    }
}

/// A subset of corners
///
/// ```rust
/// use morph_core::Corner;
///
/// let top = Corner::TopLeft | Corner::TopRight;
/// assert!(top.contains(Corner::TopRight));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CornerSet(u8);

impl CornerSet {
    pub const NONE: CornerSet = CornerSet(0);
    pub const ALL: CornerSet = CornerSet(0b1111);

    /// Build a set from any number of corners
    pub fn of(corners: &[Corner]) -> Self {
        corners.iter().fold(CornerSet::NONE, |set, c| set | *c)
    }

    pub fn contains(self, corner: Corner) -> bool {
        self.0 & corner.bit() == corner.bit()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Array indices covered by this set, in ascending order
    pub fn indices(self) -> impl Iterator<Item = usize> {
        (0..CORNER_COMPONENTS).filter(move |index| self.0 & (1 << (index / 2)) != 0)
    }
}

impl From<Corner> for CornerSet {
    fn from(corner: Corner) -> Self {
        CornerSet(corner.bit())
    }
}

impl BitOr<Corner> for CornerSet {
    type Output = CornerSet;

    fn bitor(self, rhs: Corner) -> CornerSet {
        CornerSet(self.0 | rhs.bit())
    }
}

impl BitOr for Corner {
    type Output = CornerSet;

    fn bitor(self, rhs: Corner) -> CornerSet {
        CornerSet(self.bit() | rhs.bit())
    }
}

/// Radii for the four corners of a rectangle, two components per corner
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerRadii {
    corners: [f32; CORNER_COMPONENTS],
}

impl CornerRadii {
    pub const ZERO: CornerRadii = CornerRadii {
        corners: [0.0; CORNER_COMPONENTS],
    };

    /// Circular radii per corner.
    /// Order: top_left, top_right, bottom_right, bottom_left (clockwise from top-left)
    pub fn new(top_left: f32, top_right: f32, bottom_right: f32, bottom_left: f32) -> Self {
        Self {
            corners: [
                top_left,
                top_left,
                top_right,
                top_right,
                bottom_right,
                bottom_right,
                bottom_left,
                bottom_left,
            ],
        }
    }

    pub fn uniform(radius: f32) -> Self {
        Self {
            corners: [radius; CORNER_COMPONENTS],
        }
    }

    pub const fn from_array(corners: [f32; CORNER_COMPONENTS]) -> Self {
        Self { corners }
    }

    pub fn as_array(&self) -> &[f32; CORNER_COMPONENTS] {
        &self.corners
    }

    pub fn top_left(&self) -> f32 {
        self.corners[0]
    }

    pub fn top_right(&self) -> f32 {
        self.corners[2]
    }

    pub fn bottom_right(&self) -> f32 {
        self.corners[4]
    }

    pub fn bottom_left(&self) -> f32 {
        self.corners[6]
    }

    /// Read one component
    pub fn get(&self, index: usize) -> Result<f32> {
        self.corners
            .get(index)
            .copied()
            .ok_or(GeometryError::CornerIndex { index })
    }

    /// Write one component
    pub fn set(&mut self, index: usize, radius: f32) -> Result<()> {
        let slot = self
            .corners
            .get_mut(index)
            .ok_or(GeometryError::CornerIndex { index })?;
        *slot = radius;
        Ok(())
    }

    /// Copy every component from `other`
    pub fn apply(&mut self, other: &CornerRadii) {
        self.corners = other.corners;
    }

    /// Set both components of the corners in `corners`, leaving the rest untouched
    pub fn set_corners(&mut self, corners: impl Into<CornerSet>, radius: f32) {
        for index in corners.into().indices() {
            self.corners[index] = radius;
        }
    }

    /// Builder-style variant of [`CornerRadii::set_corners`]
    pub fn with_corners(mut self, corners: impl Into<CornerSet>, radius: f32) -> Self {
        self.set_corners(corners, radius);
        self
    }

    pub fn set_top_left(&mut self, radius: f32) {
        self.set_corners(Corner::TopLeft, radius);
    }

    pub fn set_top_right(&mut self, radius: f32) {
        self.set_corners(Corner::TopRight, radius);
    }

    pub fn set_bottom_right(&mut self, radius: f32) {
        self.set_corners(Corner::BottomRight, radius);
    }

    pub fn set_bottom_left(&mut self, radius: f32) {
        self.set_corners(Corner::BottomLeft, radius);
    }

    /// Element-wise linear interpolation (unclamped)
    pub fn lerp(&self, other: &CornerRadii, t: f32) -> CornerRadii {
        let mut corners = self.corners;
        for (value, target) in corners.iter_mut().zip(other.corners.iter()) {
            *value += (target - *value) * t;
        }
        CornerRadii { corners }
    }
}

impl From<[f32; CORNER_COMPONENTS]> for CornerRadii {
    fn from(corners: [f32; CORNER_COMPONENTS]) -> Self {
        CornerRadii::from_array(corners)
    }
}
