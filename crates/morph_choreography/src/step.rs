//! Step descriptors
//!
//! A step is declared as plain data: the nodes it targets, how it links to the
//! step before it, its configuration, and a set of property *intents* ("rotate
//! to 360", "add 20 to translation x", "anchor to the top of node 3"). Intents
//! are only resolved into concrete `(from, to)` values when the choreography is
//! compiled, against the state every earlier step leaves behind.

use crate::node::NodeId;
use crate::property::Property;
use indexmap::IndexMap;
use morph_animation::{Curve, Delta, StaggerConfig, Stretch};
use morph_core::{Anchor, Bounds, Color, CornerRadii, CornerSet, Coordinates, Pivot};
use smallvec::SmallVec;
use std::fmt;

/// Sequential index of a step within one choreography
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(pub(crate) usize);

impl StepId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for StepId {
    fn from(index: usize) -> Self {
        StepId(index)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Intents
// ============================================================================

#[derive(Clone, Debug)]
pub(crate) enum FloatIntent {
    To(f32),
    FromTo(f32, f32),
    By(Delta),
    Keyframes(Vec<f32>),
}

#[derive(Clone, Debug)]
pub(crate) struct FloatSpec {
    pub intent: FloatIntent,
    pub curve: Option<Curve>,
}

#[derive(Clone, Debug)]
pub(crate) struct ColorSpec {
    pub from: Option<Color>,
    pub to: Color,
    pub curve: Option<Curve>,
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum CornerUpdate {
    Corners(CornerSet, f32),
    Index(usize, f32),
}

#[derive(Clone, Debug, Default)]
pub(crate) struct CornerSpec {
    pub from: Option<CornerRadii>,
    pub target: Option<CornerRadii>,
    pub updates: Vec<CornerUpdate>,
    pub curve: Option<Curve>,
}

/// Translation targets that need geometry to resolve
#[derive(Clone, Copy, Debug)]
pub(crate) enum Placement {
    Anchor {
        anchor: Anchor,
        reference: NodeId,
        margin: f32,
        arc: bool,
    },
    /// Center the node inside these bounds
    PositionAt(Bounds),
    /// Translate to this translation along an arc
    ArcTo(Coordinates),
}

#[derive(Clone, Debug, Default)]
pub(crate) struct PropertySpecs {
    pub floats: IndexMap<Property, FloatSpec>,
    pub color: Option<ColorSpec>,
    pub corners: Option<CornerSpec>,
    pub placement: Option<Placement>,
}

impl PropertySpecs {
    pub fn set_float(&mut self, property: Property, intent: FloatIntent) {
        match self.floats.get_mut(&property) {
            Some(spec) => spec.intent = intent,
            None => {
                self.floats.insert(property, FloatSpec { intent, curve: None });
            }
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[derive(Clone, Debug)]
pub(crate) struct StepConfig {
    pub duration_ms: Option<f32>,
    pub start_delay_ms: f32,
    pub curve: Option<Curve>,
    pub pivot: Option<Pivot>,
    pub control_point: Option<Coordinates>,
    pub stagger: Option<StaggerConfig>,
    pub stretch: Option<Stretch>,
    pub window: (f32, f32),
    pub allow_inheritance: Option<bool>,
    pub visible_on_start: Option<bool>,
    pub visible_on_end: Option<bool>,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            duration_ms: None,
            start_delay_ms: 0.0,
            curve: None,
            pivot: None,
            control_point: None,
            stagger: None,
            stretch: None,
            window: (0.0, 1.0),
            allow_inheritance: None,
            visible_on_start: None,
            visible_on_end: None,
        }
    }
}

// ============================================================================
// Hooks
// ============================================================================

pub(crate) type Action = Box<dyn FnMut()>;
pub(crate) type ProgressAction = Box<dyn FnMut(f32)>;

pub(crate) struct OffsetTrigger {
    pub fraction: f32,
    pub action: Action,
    pub fired: bool,
}

/// Callbacks attached to a step. Never cloned between steps.
#[derive(Default)]
pub(crate) struct StepHooks {
    pub on_start: Option<Action>,
    pub when_done: Option<Action>,
    pub on_progress: Option<ProgressAction>,
    pub triggers: Vec<OffsetTrigger>,
}

impl StepHooks {
    /// Rearm offset triggers for another run
    pub fn rearm(&mut self) {
        for trigger in &mut self.triggers {
            trigger.fired = false;
        }
    }
}

// ============================================================================
// Descriptor
// ============================================================================

#[derive(Clone, Debug)]
pub(crate) enum StepSource {
    Nodes(SmallVec<[NodeId; 4]>),
    Reversal(StepId),
}

pub(crate) struct StepDescriptor {
    pub id: StepId,
    pub source: StepSource,
    /// Step this one is timed against
    pub parent: Option<StepId>,
    /// Start as a fraction of the parent's duration: 1 after it, 0 alongside it
    pub offset: f32,
    pub config: StepConfig,
    pub properties: PropertySpecs,
    pub hooks: StepHooks,
}

impl StepDescriptor {
    pub fn new(id: StepId, source: StepSource, parent: Option<StepId>, offset: f32) -> Self {
        Self {
            id,
            source,
            parent,
            offset,
            config: StepConfig::default(),
            properties: PropertySpecs::default(),
            hooks: StepHooks::default(),
        }
    }

    /// Target nodes, empty for reversals
    pub fn nodes(&self) -> &[NodeId] {
        match &self.source {
            StepSource::Nodes(nodes) => nodes.as_slice(),
            StepSource::Reversal(_) => &[],
        }
    }
}
