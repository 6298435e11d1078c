//! Choreography error types

use crate::node::NodeId;
use crate::playback::PlaybackState;
use crate::step::StepId;
use morph_core::GeometryError;
use thiserror::Error;

/// Invalid step configuration, reported by `build()`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    /// A step was declared with no target nodes
    #[error("step {step} targets no nodes")]
    EmptyNodeSet { step: StepId },

    /// A step references a node that was never registered
    #[error("step {step} references unregistered node {node:?}")]
    UnknownNode { step: StepId, node: NodeId },

    /// A reversal references a step that does not precede it
    #[error("step {step} reverses unknown step {reference}")]
    UnknownStep { step: StepId, reference: StepId },

    /// A step with an explicit curve resolved to a zero duration
    #[error("step {step} has a curve but a zero duration")]
    ZeroDuration { step: StepId },

    /// A corner radius index outside `0..8`
    #[error("step {step} uses corner index {index} (expected 0..8)")]
    InvalidCornerSubset { step: StepId, index: usize },

    /// An active window outside `[0, 1]` or with `start > end`
    #[error("step {step} has invalid window {start}..{end}")]
    InvalidWindow { step: StepId, start: f32, end: f32 },

    /// A node involved in placement has no usable geometry
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Failure while driving a compiled choreography
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// The host rejected a frame write; the choreography is halted
    #[error("node {node:?} failed to commit frame: {message}")]
    Node { node: NodeId, message: String },

    /// The choreography is not in a state that accepts frames
    #[error("choreography is not playing (state: {state:?})")]
    NotPlaying { state: PlaybackState },
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Malformed TOML
    #[error("failed to parse choreographer config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config file could not be read
    #[error("failed to read choreographer config: {0}")]
    Io(#[from] std::io::Error),

    /// Parsed but semantically invalid
    #[error("invalid choreographer config: {0}")]
    Invalid(String),
}

/// Result type for building choreographies
pub type Result<T> = std::result::Result<T, BuildError>;
