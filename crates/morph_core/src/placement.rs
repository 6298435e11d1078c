//! Placement vocabulary: anchors, pivots, motion directions and measurements

use crate::geometry::{Bounds, Coordinates};
use serde::{Deserialize, Serialize};

/// Axis of a translation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Direction of motion, derived from the sign of a translation delta
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl Direction {
    /// Direction of a move from `from` to `to` along `axis`
    pub fn of_delta(axis: Axis, from: f32, to: f32) -> Direction {
        match axis {
            Axis::Vertical if to > from => Direction::Down,
            Axis::Vertical if to < from => Direction::Up,
            Axis::Horizontal if to > from => Direction::Right,
            Axis::Horizontal if to < from => Direction::Left,
            _ => Direction::None,
        }
    }

    pub fn axis(self) -> Option<Axis> {
        match self {
            Direction::Up | Direction::Down => Some(Axis::Vertical),
            Direction::Left | Direction::Right => Some(Axis::Horizontal),
            Direction::None => None,
        }
    }
}

/// Which dimensions of a resize apply
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Measurement {
    Width,
    Height,
    #[default]
    Both,
}

impl Measurement {
    pub fn includes_width(self) -> bool {
        matches!(self, Measurement::Width | Measurement::Both)
    }

    pub fn includes_height(self) -> bool {
        matches!(self, Measurement::Height | Measurement::Both)
    }
}

/// A named position inside a reference node's bounds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Anchor {
    Top,
    Left,
    Right,
    Bottom,
    Center,
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Anchor {
    /// Origin that places `node` at this anchor inside `reference`, inset by `margin`.
    ///
    /// Edge anchors only move along their own axis; the other coordinate keeps
    /// the node's current origin. The margin is ignored for [`Anchor::Center`].
    pub fn target(self, node: &Bounds, reference: &Bounds, margin: f32) -> Coordinates {
        let top = reference.top() + margin;
        let bottom = reference.bottom() - node.height - margin;
        let left = reference.left() + margin;
        let right = reference.right() - node.width - margin;

        match self {
            Anchor::Top => Coordinates::new(node.x, top),
            Anchor::Bottom => Coordinates::new(node.x, bottom),
            Anchor::Left => Coordinates::new(left, node.y),
            Anchor::Right => Coordinates::new(right, node.y),
            Anchor::Center => {
                let center = reference.center();
                Coordinates::new(center.x - node.width / 2.0, center.y - node.height / 2.0)
            }
            Anchor::TopLeft => Coordinates::new(left, top),
            Anchor::TopRight => Coordinates::new(right, top),
            Anchor::BottomRight => Coordinates::new(right, bottom),
            Anchor::BottomLeft => Coordinates::new(left, bottom),
        }
    }
}

/// Pivot point for scale and rotation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pivot {
    /// Pivot in the node's local coordinates
    Absolute { x: f32, y: f32 },
    /// Fraction of the node's own size
    RelativeToSelf { x: f32, y: f32 },
    /// Fraction of the parent's size, expressed in the node's local coordinates
    RelativeToParent { x: f32, y: f32 },
}

impl Pivot {
    pub const CENTER: Pivot = Pivot::RelativeToSelf { x: 0.5, y: 0.5 };

    /// Resolve to local coordinates.
    ///
    /// `RelativeToParent` falls back to the node's own bounds when there is no parent.
    pub fn resolve(&self, bounds: &Bounds, parent: Option<&Bounds>) -> Coordinates {
        match *self {
            Pivot::Absolute { x, y } => Coordinates::new(x, y),
            Pivot::RelativeToSelf { x, y } => Coordinates::new(bounds.width * x, bounds.height * y),
            Pivot::RelativeToParent { x, y } => match parent {
                Some(parent) => Coordinates::new(
                    parent.x + parent.width * x - bounds.x,
                    parent.y + parent.height * y - bounds.y,
                ),
                None => Coordinates::new(bounds.width * x, bounds.height * y),
            },
        }
    }
}

impl Default for Pivot {
    fn default() -> Self {
        Pivot::CENTER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_delta() {
        assert_eq!(Direction::of_delta(Axis::Vertical, 0.0, 10.0), Direction::Down);
        assert_eq!(Direction::of_delta(Axis::Vertical, 10.0, 0.0), Direction::Up);
        assert_eq!(Direction::of_delta(Axis::Horizontal, 0.0, -1.0), Direction::Left);
        assert_eq!(Direction::of_delta(Axis::Horizontal, 3.0, 3.0), Direction::None);
        assert_eq!(Direction::None.axis(), None);
    }

    #[test]
    fn test_edge_anchors() {
        let reference = Bounds::new(100.0, 100.0, 200.0, 100.0);
        let node = Bounds::new(0.0, 0.0, 20.0, 10.0);

        assert_eq!(
            Anchor::Top.target(&node, &reference, 5.0),
            Coordinates::new(0.0, 105.0)
        );
        assert_eq!(
            Anchor::Right.target(&node, &reference, 0.0),
            Coordinates::new(280.0, 0.0)
        );
        assert_eq!(
            Anchor::BottomLeft.target(&node, &reference, 0.0),
            Coordinates::new(100.0, 190.0)
        );
    }

    #[test]
    fn test_center_anchor_ignores_margin() {
        let reference = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let node = Bounds::new(300.0, 300.0, 20.0, 20.0);

        assert_eq!(
            Anchor::Center.target(&node, &reference, 12.0),
            Coordinates::new(40.0, 40.0)
        );
    }

    #[test]
    fn test_pivot_resolution() {
        let bounds = Bounds::new(10.0, 10.0, 40.0, 20.0);
        let parent = Bounds::new(0.0, 0.0, 100.0, 100.0);

        assert_eq!(Pivot::CENTER.resolve(&bounds, None), Coordinates::new(20.0, 10.0));
        assert_eq!(
            Pivot::RelativeToParent { x: 0.5, y: 0.5 }.resolve(&bounds, Some(&parent)),
            Coordinates::new(40.0, 40.0)
        );
        assert_eq!(
            Pivot::Absolute { x: 1.0, y: 2.0 }.resolve(&bounds, None),
            Coordinates::new(1.0, 2.0)
        );
    }
}
