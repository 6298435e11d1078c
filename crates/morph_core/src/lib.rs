//! Morph Core
//!
//! Value primitives shared by the Morph animation crates:
//!
//! - **Geometry**: [`Coordinates`] and [`Bounds`] with midpoint, distance and overlap tests
//! - **Corner Radii**: 8-component elliptical radii with partial corner updates
//! - **Colors**: RGBA colors with packed ARGB conversion
//! - **Placement**: anchors, pivots, motion directions and resize measurements
//! - **Math**: range mapping, fuzzy comparison and leader-based grouping
//! - **Bindings**: one-way and two-way value mirroring between endpoints
//!
//! # Example
//!
//! ```rust
//! use morph_core::{Bounds, Corner, CornerRadii};
//!
//! let a = Bounds::new(0.0, 0.0, 30.0, 30.0);
//! let b = Bounds::new(30.0, 10.0, 30.0, 30.0);
//! assert!(a.overlaps(&b));
//!
//! let radii = CornerRadii::uniform(4.0).with_corners(Corner::TopLeft | Corner::TopRight, 12.0);
//! assert_eq!(radii.bottom_left(), 4.0);
//! ```

pub mod binding;
pub mod color;
pub mod corners;
pub mod error;
pub mod geometry;
pub mod math;
pub mod placement;

pub use binding::{Bind, BindableId, BindingGraph, BindingListener};
pub use color::Color;
pub use corners::{Corner, CornerRadii, CornerSet, CORNER_COMPONENTS};
pub use error::{GeometryError, Result};
pub use geometry::{Bounds, Coordinates};
pub use math::{approximate, clamp_between, group_by_leader, map_range, map_range_clamped};
pub use placement::{Anchor, Axis, Direction, Measurement, Pivot};
