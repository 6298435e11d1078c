//! Fluent choreography builder
//!
//! A [`Choreographer`] owns the nodes taking part in a choreography. Calling
//! [`Choreographer::animate`] opens the first step and returns a
//! [`StepBuilder`]; every further call either configures the current step or
//! opens a new one linked to it:
//!
//! - [`then`](StepBuilder::then) starts when the current step ends
//! - [`and`](StepBuilder::and) starts together with the current step
//! - [`animate_after`](StepBuilder::animate_after) starts at a fraction of the current step
//! - [`then_reversed_with`](StepBuilder::then_reversed_with) replays an earlier step backwards
//!
//! Declaration mistakes (empty node sets, unknown nodes, bad windows) are
//! collected as they happen and reported by [`build`](StepBuilder::build),
//! before anything is written to a node.
//!
//! # Example
//!
//! ```rust
//! use morph_choreography::{Choreographer, NodeState, PlaybackState};
//! use morph_core::{Bounds, Corner, Measurement};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut choreographer = Choreographer::new();
//! let card = choreographer.register(NodeState::new(Bounds::new(0.0, 0.0, 100.0, 60.0)));
//!
//! let mut choreography = choreographer
//!     .animate(&[card])
//!     .rotate_to(360.0)
//!     .with_duration(1000)
//!     .then()
//!     .resize_to(Bounds::new(0.0, 0.0, 200.0, 120.0), Measurement::Both)
//!     .and()
//!     .corner_radius_to(Corner::TopLeft | Corner::TopRight, 16.0)
//!     .build()?;
//!
//! choreography.play()?;
//! while choreography.state() == PlaybackState::Playing {
//!     choreography.tick(16.0)?;
//! }
//!
//! let card = choreography.node(card).unwrap();
//! assert_eq!(card.rotation(), 360.0);
//! assert_eq!(card.width(), 200.0);
//! # Ok(())
//! # }
//! ```

use crate::compile::compile;
use crate::config::ChoreographerConfig;
use crate::error::{BuildError, Result};
use crate::node::{Morphable, NodeId, NodeRegistry};
use crate::playback::Choreography;
use crate::property::Property;
use crate::step::{
    ColorSpec, CornerSpec, CornerUpdate, FloatIntent, OffsetTrigger, Placement, StepDescriptor,
    StepId, StepSource,
};
use morph_animation::{Curve, Delta, FrameCache, StaggerConfig, Stretch};
use morph_core::{
    Anchor, Bounds, Color, CornerRadii, CornerSet, Coordinates, Measurement, Pivot,
    CORNER_COMPONENTS,
};
use smallvec::SmallVec;

/// Owner of the nodes a choreography animates
pub struct Choreographer {
    registry: NodeRegistry,
    config: ChoreographerConfig,
}

impl Choreographer {
    pub fn new() -> Self {
        Self::with_config(ChoreographerConfig::default())
    }

    pub fn with_config(config: ChoreographerConfig) -> Self {
        Self {
            registry: NodeRegistry::new(),
            config,
        }
    }

    pub fn config(&self) -> &ChoreographerConfig {
        &self.config
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn register<M: Morphable + 'static>(&mut self, node: M) -> NodeId {
        self.registry.register(node)
    }

    /// Register `node` as a child of `parent`. Returns `None` if the parent is unknown.
    pub fn register_child<M: Morphable + 'static>(
        &mut self,
        parent: NodeId,
        node: M,
    ) -> Option<NodeId> {
        self.registry.register_child(parent, node)
    }

    pub fn node(&self, id: NodeId) -> Option<&dyn Morphable> {
        self.registry.get(id)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.registry.children(id)
    }

    /// Frame cache sized from the configuration
    pub fn frame_cache<F: Clone>(&self) -> FrameCache<F> {
        FrameCache::new(self.config.frame_cache_capacity)
    }

    /// Open the first step over `nodes`
    pub fn animate(self, nodes: &[NodeId]) -> StepBuilder {
        StepBuilder::start(self, StepSource::Nodes(SmallVec::from_slice(nodes)))
    }

    /// Open the first step over the children of `parent`, as registered with
    /// [`register_child`](Self::register_child)
    pub fn animate_children_of(self, parent: NodeId, stagger: Option<StaggerConfig>) -> StepBuilder {
        let children = SmallVec::from_slice(self.registry.children(parent));
        let parent_known = self.registry.contains(parent);
        let mut builder = StepBuilder::start(self, StepSource::Nodes(children));
        if !parent_known {
            builder.fail_unknown(parent);
        }
        builder.current().config.stagger = stagger;
        builder
    }
}

impl Default for Choreographer {
    fn default() -> Self {
        Self::new()
    }
}

/// Fluent step declarations. See the [module documentation](self).
pub struct StepBuilder {
    choreographer: Choreographer,
    steps: Vec<StepDescriptor>,
    errors: Vec<BuildError>,
}

impl StepBuilder {
    fn start(choreographer: Choreographer, source: StepSource) -> Self {
        let mut builder = Self {
            choreographer,
            steps: Vec::new(),
            errors: Vec::new(),
        };
        builder.open(source, None, 0.0);
        builder
    }

    fn open(&mut self, source: StepSource, parent: Option<StepId>, offset: f32) {
        let id = StepId(self.steps.len());

        match &source {
            StepSource::Nodes(nodes) => {
                if nodes.is_empty() {
                    self.errors.push(BuildError::EmptyNodeSet { step: id });
                }
                for node in nodes {
                    if !self.choreographer.registry.contains(*node) {
                        self.errors.push(BuildError::UnknownNode {
                            step: id,
                            node: *node,
                        });
                    }
                }
            }
            StepSource::Reversal(reference) => {
                if reference.0 >= id.0 {
                    self.errors.push(BuildError::UnknownStep {
                        step: id,
                        reference: *reference,
                    });
                }
            }
        }

        tracing::trace!(step = %id, ?parent, offset, "step declared");
        self.steps.push(StepDescriptor::new(id, source, parent, offset));
    }

    fn current(&mut self) -> &mut StepDescriptor {
        let last = self.steps.len() - 1;
        &mut self.steps[last]
    }

    fn fail_unknown(&mut self, node: NodeId) {
        let step = self.id();
        self.errors.push(BuildError::UnknownNode { step, node });
    }

    /// Nodes a step animates, following reversals back to their source
    fn nodes_of(&self, id: StepId) -> SmallVec<[NodeId; 4]> {
        let mut cursor = id;
        loop {
            match self.steps.get(cursor.0).map(|step| &step.source) {
                Some(StepSource::Nodes(nodes)) => return nodes.clone(),
                Some(StepSource::Reversal(reference)) if reference.0 < cursor.0 => {
                    cursor = *reference;
                }
                _ => return SmallVec::new(),
            }
        }
    }

    /// Id of the step currently being configured
    pub fn id(&self) -> StepId {
        StepId(self.steps.len() - 1)
    }

    // ========================================================================
    // Step linking
    // ========================================================================

    /// New step on the same nodes, starting when the current step ends
    pub fn then(mut self) -> Self {
        let parent = self.id();
        let nodes = self.nodes_of(parent);
        self.open(StepSource::Nodes(nodes), Some(parent), 1.0);
        self
    }

    /// New step on other nodes, starting when the current step ends
    pub fn then_animate(mut self, nodes: &[NodeId]) -> Self {
        let parent = self.id();
        self.open(StepSource::Nodes(SmallVec::from_slice(nodes)), Some(parent), 1.0);
        self
    }

    /// New step on the same nodes, running alongside the current step
    pub fn and(mut self) -> Self {
        let parent = self.id();
        let nodes = self.nodes_of(parent);
        self.open(StepSource::Nodes(nodes), Some(parent), 0.0);
        self
    }

    /// Alias of [`and`](Self::and)
    pub fn also(self) -> Self {
        self.and()
    }

    /// Run the current step's configuration and properties on other nodes, in parallel
    pub fn and_animate(mut self, nodes: &[NodeId]) -> Self {
        let parent = self.id();
        let config = self.current().config.clone();
        let properties = self.current().properties.clone();
        self.open(StepSource::Nodes(SmallVec::from_slice(nodes)), Some(parent), 0.0);
        let step = self.current();
        step.config = config;
        step.properties = properties;
        self
    }

    /// New step on `nodes`, starting at `offset` (a fraction) of the current step
    pub fn animate_after(mut self, offset: f32, nodes: &[NodeId]) -> Self {
        let parent = self.id();
        self.open(
            StepSource::Nodes(SmallVec::from_slice(nodes)),
            Some(parent),
            offset.max(0.0),
        );
        self
    }

    /// Replay `step` backwards once the current step ends
    pub fn then_reversed_with(mut self, step: StepId) -> Self {
        let parent = self.id();
        self.open(StepSource::Reversal(step), Some(parent), 1.0);
        self
    }

    /// Replay `step` backwards alongside the current step
    pub fn and_reversed_with(mut self, step: StepId) -> Self {
        let parent = self.id();
        self.open(StepSource::Reversal(step), Some(parent), 0.0);
        self
    }

    /// New step on the children of `parent`, starting when the current step ends.
    ///
    /// Children are the nodes registered under `parent` with
    /// [`Choreographer::register_child`], read from the registry's parent links
    /// when the step is declared.
    pub fn then_children_of(self, parent: NodeId, stagger: Option<StaggerConfig>) -> Self {
        self.children_step(parent, stagger, 1.0)
    }

    /// New step on the children of `parent`, running alongside the current step
    pub fn and_children_of(self, parent: NodeId, stagger: Option<StaggerConfig>) -> Self {
        self.children_step(parent, stagger, 0.0)
    }

    fn children_step(mut self, node: NodeId, stagger: Option<StaggerConfig>, offset: f32) -> Self {
        let parent = self.id();
        let children = SmallVec::from_slice(self.choreographer.registry.children(node));
        let known = self.choreographer.registry.contains(node);
        self.open(StepSource::Nodes(children), Some(parent), offset);
        if !known {
            self.fail_unknown(node);
        }
        self.current().config.stagger = stagger;
        self
    }

    // ========================================================================
    // Step configuration
    // ========================================================================

    pub fn with_duration(mut self, duration_ms: u32) -> Self {
        self.current().config.duration_ms = Some(duration_ms as f32);
        self
    }

    pub fn with_start_delay(mut self, delay_ms: u32) -> Self {
        self.current().config.start_delay_ms = delay_ms as f32;
        self
    }

    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.current().config.curve = Some(curve);
        self
    }

    /// Curve for one property, overriding the step curve
    pub fn with_property_curve(mut self, property: Property, curve: Curve) -> Self {
        if let Some(spec) = self.current().properties.floats.get_mut(&property) {
            spec.curve = Some(curve);
        }
        self
    }

    pub fn with_pivot(mut self, pivot: Pivot) -> Self {
        self.current().config.pivot = Some(pivot);
        self
    }

    /// Control point for arc translations, in translation coordinates
    pub fn with_control_point(mut self, control: Coordinates) -> Self {
        self.current().config.control_point = Some(control);
        self
    }

    pub fn with_stagger(mut self, stagger: StaggerConfig) -> Self {
        self.current().config.stagger = Some(stagger);
        self
    }

    pub fn with_stretch(mut self, stretch: Stretch) -> Self {
        self.current().config.stretch = Some(stretch);
        self
    }

    /// Restrict every value of the step to `[start, end]` of its duration
    pub fn with_active_window(mut self, start: f32, end: f32) -> Self {
        if (0.0..=1.0).contains(&start) && (0.0..=1.0).contains(&end) && start <= end {
            self.current().config.window = (start, end);
        } else {
            let step = self.id();
            self.errors.push(BuildError::InvalidWindow { step, start, end });
        }
        self
    }

    /// Inherit unset duration, curve and pivot from the parent step
    pub fn allow_inheritance(mut self, allow: bool) -> Self {
        self.current().config.allow_inheritance = Some(allow);
        self
    }

    /// Visibility applied when the step starts on a node
    pub fn with_start_visibility(mut self, visible: bool) -> Self {
        self.current().config.visible_on_start = Some(visible);
        self
    }

    /// Visibility applied when the step ends on a node
    pub fn with_end_visibility(mut self, visible: bool) -> Self {
        self.current().config.visible_on_end = Some(visible);
        self
    }

    // ========================================================================
    // Callbacks
    // ========================================================================

    pub fn on_start<F: FnMut() + 'static>(mut self, action: F) -> Self {
        self.current().hooks.on_start = Some(Box::new(action));
        self
    }

    pub fn when_done<F: FnMut() + 'static>(mut self, action: F) -> Self {
        self.current().hooks.when_done = Some(Box::new(action));
        self
    }

    /// Called every frame the step is active with its fraction
    pub fn on_progress<F: FnMut(f32) + 'static>(mut self, action: F) -> Self {
        self.current().hooks.on_progress = Some(Box::new(action));
        self
    }

    /// Called once when the step reaches `fraction`
    pub fn with_offset_trigger<F: FnMut() + 'static>(mut self, fraction: f32, action: F) -> Self {
        self.current().hooks.triggers.push(OffsetTrigger {
            fraction,
            action: Box::new(action),
            fired: false,
        });
        self
    }

    // ========================================================================
    // Properties
    // ========================================================================

    fn float(mut self, property: Property, intent: FloatIntent) -> Self {
        self.current().properties.set_float(property, intent);
        self
    }

    fn keyframes(self, property: Property, values: &[f32]) -> Self {
        if values.is_empty() {
            return self;
        }
        self.float(property, FloatIntent::Keyframes(values.to_vec()))
    }

    pub fn x_position_to(self, x: f32) -> Self {
        self.float(Property::X, FloatIntent::To(x))
    }

    pub fn y_position_to(self, y: f32) -> Self {
        self.float(Property::Y, FloatIntent::To(y))
    }

    pub fn x_translate_to(self, value: f32) -> Self {
        self.float(Property::TranslationX, FloatIntent::To(value))
    }

    pub fn x_translate_from(self, from: f32, to: f32) -> Self {
        self.float(Property::TranslationX, FloatIntent::FromTo(from, to))
    }

    /// Translate by `delta` relative to the current translation
    pub fn x_translate_by(self, delta: f32) -> Self {
        self.float(Property::TranslationX, FloatIntent::By(Delta::Add(delta)))
    }

    pub fn x_translate_between(self, values: &[f32]) -> Self {
        self.keyframes(Property::TranslationX, values)
    }

    /// Keyframes at `value * percentage` for each percentage (0.5 is 50%)
    pub fn x_translate_between_percentages(self, value: f32, percentages: &[f32]) -> Self {
        let values: Vec<f32> = percentages.iter().map(|p| value * p).collect();
        self.keyframes(Property::TranslationX, &values)
    }

    pub fn y_translate_to(self, value: f32) -> Self {
        self.float(Property::TranslationY, FloatIntent::To(value))
    }

    pub fn y_translate_from(self, from: f32, to: f32) -> Self {
        self.float(Property::TranslationY, FloatIntent::FromTo(from, to))
    }

    pub fn y_translate_by(self, delta: f32) -> Self {
        self.float(Property::TranslationY, FloatIntent::By(Delta::Add(delta)))
    }

    pub fn y_translate_between(self, values: &[f32]) -> Self {
        self.keyframes(Property::TranslationY, values)
    }

    pub fn y_translate_between_percentages(self, value: f32, percentages: &[f32]) -> Self {
        let values: Vec<f32> = percentages.iter().map(|p| value * p).collect();
        self.keyframes(Property::TranslationY, &values)
    }

    pub fn z_translate_to(self, value: f32) -> Self {
        self.float(Property::TranslationZ, FloatIntent::To(value))
    }

    pub fn z_translate_from(self, from: f32, to: f32) -> Self {
        self.float(Property::TranslationZ, FloatIntent::FromTo(from, to))
    }

    pub fn z_translate_by(self, delta: f32) -> Self {
        self.float(Property::TranslationZ, FloatIntent::By(Delta::Add(delta)))
    }

    pub fn z_translate_between(self, values: &[f32]) -> Self {
        self.keyframes(Property::TranslationZ, values)
    }

    /// Translate to `(x, y)` along an arc; see [`with_control_point`](Self::with_control_point)
    pub fn arc_translate_to(mut self, x: f32, y: f32) -> Self {
        self.current().properties.placement = Some(Placement::ArcTo(Coordinates::new(x, y)));
        self
    }

    pub fn alpha_to(self, alpha: f32) -> Self {
        self.float(Property::Alpha, FloatIntent::To(alpha))
    }

    pub fn alpha_from(self, from: f32, to: f32) -> Self {
        self.float(Property::Alpha, FloatIntent::FromTo(from, to))
    }

    pub fn elevation_to(self, elevation: f32) -> Self {
        self.float(Property::Elevation, FloatIntent::To(elevation))
    }

    pub fn rotate_to(self, degrees: f32) -> Self {
        self.float(Property::Rotation, FloatIntent::To(degrees))
    }

    pub fn rotate_from(self, from: f32, to: f32) -> Self {
        self.float(Property::Rotation, FloatIntent::FromTo(from, to))
    }

    /// Rotate to the current rotation multiplied by `multiplier`
    pub fn rotate_by(self, multiplier: f32) -> Self {
        self.float(Property::Rotation, FloatIntent::By(Delta::Multiply(multiplier)))
    }

    /// Rotate to the current rotation plus `delta`
    pub fn rotate_add(self, delta: f32) -> Self {
        self.float(Property::Rotation, FloatIntent::By(Delta::Add(delta)))
    }

    pub fn rotate_between(self, values: &[f32]) -> Self {
        self.keyframes(Property::Rotation, values)
    }

    pub fn x_rotate_to(self, degrees: f32) -> Self {
        self.float(Property::RotationX, FloatIntent::To(degrees))
    }

    pub fn x_rotate_add(self, delta: f32) -> Self {
        self.float(Property::RotationX, FloatIntent::By(Delta::Add(delta)))
    }

    pub fn y_rotate_to(self, degrees: f32) -> Self {
        self.float(Property::RotationY, FloatIntent::To(degrees))
    }

    pub fn y_rotate_add(self, delta: f32) -> Self {
        self.float(Property::RotationY, FloatIntent::By(Delta::Add(delta)))
    }

    pub fn scale_to(self, scale: f32) -> Self {
        self.float(Property::ScaleX, FloatIntent::To(scale))
            .float(Property::ScaleY, FloatIntent::To(scale))
    }

    /// Scale both axes to their current value multiplied by `multiplier`
    pub fn scale_by(self, multiplier: f32) -> Self {
        self.float(Property::ScaleX, FloatIntent::By(Delta::Multiply(multiplier)))
            .float(Property::ScaleY, FloatIntent::By(Delta::Multiply(multiplier)))
    }

    pub fn scale_add(self, delta: f32) -> Self {
        self.float(Property::ScaleX, FloatIntent::By(Delta::Add(delta)))
            .float(Property::ScaleY, FloatIntent::By(Delta::Add(delta)))
    }

    pub fn x_scale_to(self, scale: f32) -> Self {
        self.float(Property::ScaleX, FloatIntent::To(scale))
    }

    pub fn y_scale_to(self, scale: f32) -> Self {
        self.float(Property::ScaleY, FloatIntent::To(scale))
    }

    /// Resize to the dimensions of `bounds` selected by `measurement`
    pub fn resize_to(self, bounds: Bounds, measurement: Measurement) -> Self {
        let mut builder = self;
        if measurement.includes_width() {
            builder = builder.float(Property::Width, FloatIntent::To(bounds.width));
        }
        if measurement.includes_height() {
            builder = builder.float(Property::Height, FloatIntent::To(bounds.height));
        }
        builder
    }

    pub fn width_to(self, width: f32) -> Self {
        self.float(Property::Width, FloatIntent::To(width))
    }

    pub fn height_to(self, height: f32) -> Self {
        self.float(Property::Height, FloatIntent::To(height))
    }

    /// Animate the selected corners to `radius`; other corners keep their value
    pub fn corner_radius_to(mut self, corners: impl Into<CornerSet>, radius: f32) -> Self {
        let corners = corners.into();
        self.corner_spec()
            .updates
            .push(CornerUpdate::Corners(corners, radius));
        self
    }

    /// Animate between two full sets of radii
    pub fn corner_radius_from(mut self, from: CornerRadii, to: CornerRadii) -> Self {
        let spec = self.corner_spec();
        spec.from = Some(from);
        spec.target = Some(to);
        spec.updates.clear();
        self
    }

    pub fn corner_radii_to(mut self, radii: CornerRadii) -> Self {
        let spec = self.corner_spec();
        spec.target = Some(radii);
        spec.updates.clear();
        self
    }

    /// Animate individual radius components (`0..8`) to `radius`
    pub fn corner_radius_at(mut self, indices: &[usize], radius: f32) -> Self {
        let step = self.id();
        for &index in indices {
            if index >= CORNER_COMPONENTS {
                self.errors
                    .push(BuildError::InvalidCornerSubset { step, index });
                continue;
            }
            self.corner_spec()
                .updates
                .push(CornerUpdate::Index(index, radius));
        }
        self
    }

    fn corner_spec(&mut self) -> &mut CornerSpec {
        self.current()
            .properties
            .corners
            .get_or_insert_with(CornerSpec::default)
    }

    pub fn color_to(mut self, color: Color) -> Self {
        self.current().properties.color = Some(ColorSpec {
            from: None,
            to: color,
            curve: None,
        });
        self
    }

    pub fn color_from(mut self, from: Color, to: Color) -> Self {
        self.current().properties.color = Some(ColorSpec {
            from: Some(from),
            to,
            curve: None,
        });
        self
    }

    /// Translate so the node sits at `anchor` inside `reference`, inset by `margin`
    pub fn anchor_to(self, anchor: Anchor, reference: NodeId, margin: f32) -> Self {
        self.anchor(anchor, reference, margin, false)
    }

    /// Like [`anchor_to`](Self::anchor_to), following an arc
    pub fn anchor_arc_to(self, anchor: Anchor, reference: NodeId, margin: f32) -> Self {
        self.anchor(anchor, reference, margin, true)
    }

    fn anchor(mut self, anchor: Anchor, reference: NodeId, margin: f32, arc: bool) -> Self {
        if !self.choreographer.registry.contains(reference) {
            self.fail_unknown(reference);
        }
        self.current().properties.placement = Some(Placement::Anchor {
            anchor,
            reference,
            margin,
            arc,
        });
        self
    }

    /// Translate so the node is centered inside `bounds`
    pub fn position_at(mut self, bounds: Bounds) -> Self {
        self.current().properties.placement = Some(Placement::PositionAt(bounds));
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Validate and compile into a playable [`Choreography`]
    pub fn build(self) -> Result<Choreography> {
        if let Some(error) = self.errors.into_iter().next() {
            tracing::debug!(%error, "choreography rejected");
            return Err(error);
        }

        let Choreographer { registry, config } = self.choreographer;
        let schedule = compile(&registry, &config, &self.steps)?;
        let hooks = self.steps.into_iter().map(|step| step.hooks).collect();
        Ok(Choreography::new(registry, schedule, hooks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeState;
    use morph_core::Corner;

    fn choreographer_with_node() -> (Choreographer, NodeId) {
        let mut choreographer = Choreographer::new();
        let node = choreographer.register(NodeState::new(Bounds::new(0.0, 0.0, 50.0, 50.0)));
        (choreographer, node)
    }

    #[test]
    fn test_frame_cache_uses_config_capacity() {
        let config = ChoreographerConfig {
            frame_cache_capacity: 12,
            ..Default::default()
        };
        let choreographer = Choreographer::with_config(config);
        assert_eq!(choreographer.frame_cache::<u32>().capacity(), 12);
    }

    #[test]
    fn test_step_ids_are_sequential() {
        let (choreographer, node) = choreographer_with_node();
        let builder = choreographer.animate(&[node]).rotate_to(90.0);
        assert_eq!(builder.id(), StepId(0));

        let builder = builder.then().alpha_to(0.0).and().scale_to(2.0);
        assert_eq!(builder.id(), StepId(2));
    }

    #[test]
    fn test_empty_node_set_rejected() {
        let (choreographer, _) = choreographer_with_node();
        let result = choreographer.animate(&[]).rotate_to(90.0).build();

        assert!(matches!(
            result,
            Err(BuildError::EmptyNodeSet { step: StepId(0) })
        ));
    }

    #[test]
    fn test_unknown_node_rejected() {
        let (choreographer, node) = choreographer_with_node();
        let stranger = NodeId::default();
        let result = choreographer
            .animate(&[node])
            .then_animate(&[stranger])
            .build();

        assert!(matches!(
            result,
            Err(BuildError::UnknownNode { step: StepId(1), node: n }) if n == stranger
        ));
    }

    #[test]
    fn test_forward_reversal_rejected() {
        let (choreographer, node) = choreographer_with_node();
        let result = choreographer
            .animate(&[node])
            .then_reversed_with(StepId(5))
            .build();

        assert!(matches!(result, Err(BuildError::UnknownStep { .. })));
    }

    #[test]
    fn test_corner_index_out_of_range() {
        let (choreographer, node) = choreographer_with_node();
        let result = choreographer
            .animate(&[node])
            .corner_radius_at(&[0, 8], 4.0)
            .build();

        assert!(matches!(
            result,
            Err(BuildError::InvalidCornerSubset { index: 8, .. })
        ));
    }

    #[test]
    fn test_invalid_active_window() {
        let (choreographer, node) = choreographer_with_node();
        let result = choreographer
            .animate(&[node])
            .with_active_window(0.7, 0.2)
            .build();

        assert!(matches!(result, Err(BuildError::InvalidWindow { .. })));
    }

    #[test]
    fn test_children_of_unknown_parent() {
        let (choreographer, node) = choreographer_with_node();
        let result = choreographer
            .animate(&[node])
            .then_children_of(NodeId::default(), None)
            .build();

        assert!(matches!(result, Err(BuildError::EmptyNodeSet { .. })));
    }

    #[test]
    fn test_and_animate_copies_properties() {
        let mut choreographer = Choreographer::new();
        let a = choreographer.register(NodeState::new(Bounds::new(0.0, 0.0, 10.0, 10.0)));
        let b = choreographer.register(NodeState::new(Bounds::new(0.0, 0.0, 10.0, 10.0)));

        let choreography = choreographer
            .animate(&[a])
            .corner_radius_to(Corner::TopLeft, 6.0)
            .rotate_to(45.0)
            .with_duration(200)
            .and_animate(&[b])
            .build()
            .unwrap();

        let copied = choreography.schedule().entries_for(StepId(1)).next().unwrap();
        assert_eq!(copied.node, b);
        assert_eq!(copied.end_ms, 200.0);
        assert_eq!(
            copied.values.float(Property::Rotation).map(|v| v.to),
            Some(45.0)
        );
        assert_eq!(
            copied.values.corners().map(|c| c.to.top_left()),
            Some(6.0)
        );
    }
}
