//! Morph Animation
//!
//! Time-based building blocks for choreographies.
//!
//! # Features
//!
//! - **Animated Values**: typed `(from, to)` pairs with curve, duration window and
//!   interpolation window
//! - **Keyframe Arrays**: evenly split multi-value traversal
//! - **Curves**: material cubic beziers, spring/elastic, reversed and sub-range curves
//! - **Arc Paths**: quadratic bezier translations
//! - **Stretch**: stretch and squash along the direction of motion
//! - **Stagger**: distance-based per-node start windows
//! - **Frame Cache**: LRU-bounded frame buffering for frame-by-frame playback
//!
//! # Example
//!
//! ```rust
//! use morph_animation::{AnimatedFloatValue, Curve};
//!
//! let rotation = AnimatedFloatValue::new(0.0, 360.0)
//!     .with_curve(Curve::Linear)
//!     .with_duration_offsets(0.5, 1.0)
//!     .unwrap();
//!
//! assert_eq!(rotation.value_at(0.25), 0.0);
//! assert_eq!(rotation.value_at(0.75), 180.0);
//! ```

pub mod arc;
pub mod curve;
pub mod error;
pub mod frame_cache;
pub mod stagger;
pub mod stretch;
pub mod values;

pub use arc::ArcPath;
pub use curve::{Curve, CurveName, DEFAULT_SPRING_FACTOR};
pub use error::{Result, ValueError};
pub use frame_cache::{FrameCache, FrameSequence, DEFAULT_FRAME_CACHE_CAPACITY};
pub use stagger::{
    compute_stagger, stagger_delay, GroupMargin, StaggerConfig, StaggerInfo, StaggerOrder,
};
pub use stretch::{Stretch, StretchFrame};
pub use values::{
    Accumulate, AnimatedColor, AnimatedCornerRadii, AnimatedFloatValue, AnimatedIntValue,
    AnimatedValue, AnimatedValueArray, Delta, Interpolate,
};
