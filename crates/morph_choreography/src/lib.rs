//! Morph Choreography
//!
//! Declarative choreography of property animations across a set of nodes.
//!
//! # Overview
//!
//! - [`Choreographer`] owns the nodes (anything implementing [`Morphable`])
//! - [`StepBuilder`] declares steps fluently, sequential or parallel
//! - [`build`](StepBuilder::build) validates and compiles the steps into a [`Schedule`]
//! - [`Choreography`] plays the schedule back, one externally driven frame at a time
//!
//! # Example
//!
//! ```
//! use morph_choreography::{Choreographer, NodeState, PlaybackState};
//! use morph_core::Bounds;
//!
//! let mut choreographer = Choreographer::new();
//! let card = choreographer.register(NodeState::new(Bounds::new(0.0, 0.0, 100.0, 60.0)));
//!
//! let mut choreography = choreographer
//!     .animate(&[card])
//!     .x_translate_by(50.0)
//!     .with_duration(300)
//!     .then()
//!     .alpha_to(0.0)
//!     .build()
//!     .unwrap();
//!
//! choreography.play().unwrap();
//! while choreography.state() == PlaybackState::Playing {
//!     choreography.tick(16.0).unwrap();
//! }
//!
//! let card = choreography.node(card).unwrap();
//! assert_eq!(card.translation_x(), 50.0);
//! assert_eq!(card.alpha(), 0.0);
//! ```

pub mod builder;
pub mod compile;
pub mod config;
pub mod error;
pub mod node;
pub mod playback;
pub mod property;
pub mod step;

pub use builder::{Choreographer, StepBuilder};
pub use compile::{Schedule, ScheduleEntry, StepWindow};
pub use config::ChoreographerConfig;
pub use error::{BuildError, ConfigError, PlaybackError, Result};
pub use node::{BackgroundKind, Morphable, NodeError, NodeId, NodeRegistry, NodeState};
pub use playback::{Choreography, FrameTick, PlaybackState};
pub use property::{Property, PropertyValues, Snapshot, PROPERTY_COUNT};
pub use step::StepId;
