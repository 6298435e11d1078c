//! Step compilation
//!
//! Turns declared steps into a flat [`Schedule`] of per-node entries with
//! absolute timings. Steps are resolved in declaration order against a
//! projected [`Snapshot`] of every node, so a step's `from` values are the
//! values every earlier step leaves behind rather than whatever the node
//! happens to show when the step starts.

use crate::config::ChoreographerConfig;
use crate::error::{BuildError, Result};
use crate::node::{BackgroundKind, NodeId, NodeRegistry};
use crate::property::{Property, PropertyValues, Snapshot};
use crate::step::{CornerUpdate, FloatIntent, Placement, StepDescriptor, StepId, StepSource};
use morph_animation::{
    compute_stagger, AnimatedColor, AnimatedCornerRadii, AnimatedFloatValue, AnimatedValueArray,
    ArcPath, Curve, StaggerConfig,
};
use morph_core::{Bounds, Coordinates, GeometryError, Pivot};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;

/// Absolute timing of one step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepWindow {
    pub id: StepId,
    pub start_ms: f32,
    pub duration_ms: f32,
}

impl StepWindow {
    pub fn end_ms(&self) -> f32 {
        self.start_ms + self.duration_ms
    }
}

/// One node's part in one step
#[derive(Clone, Debug)]
pub struct ScheduleEntry {
    pub step: StepId,
    pub node: NodeId,
    pub start_ms: f32,
    pub end_ms: f32,
    pub values: PropertyValues,
    /// Pivot written before the values on every frame
    pub pivot: Option<Coordinates>,
    pub visible_on_start: Option<bool>,
    pub visible_on_end: Option<bool>,
}

impl ScheduleEntry {
    pub fn duration_ms(&self) -> f32 {
        self.end_ms - self.start_ms
    }
}

/// Compiled timeline of a choreography
#[derive(Clone, Debug, Default)]
pub struct Schedule {
    steps: Vec<StepWindow>,
    entries: Vec<ScheduleEntry>,
    total_duration_ms: f32,
}

impl Schedule {
    pub fn steps(&self) -> &[StepWindow] {
        &self.steps
    }

    pub fn step(&self, id: StepId) -> Option<&StepWindow> {
        self.steps.get(id.0)
    }

    /// Entries in declaration order
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn entries_for(&self, step: StepId) -> impl Iterator<Item = &ScheduleEntry> {
        self.entries.iter().filter(move |entry| entry.step == step)
    }

    pub fn total_duration_ms(&self) -> f32 {
        self.total_duration_ms
    }

    /// Distinct `(start, end)` step windows in milliseconds, sorted
    pub fn windows(&self) -> Vec<(f32, f32)> {
        let mut windows: Vec<(f32, f32)> = self
            .steps
            .iter()
            .map(|step| (step.start_ms, step.end_ms()))
            .collect();
        windows.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        windows.dedup();
        windows
    }
}

/// Resolved timing and defaults of a compiled step
struct Timing {
    start_ms: f32,
    duration_ms: f32,
    curve: Curve,
    pivot: Pivot,
}

/// Compile `steps` against the current state of `registry`
pub(crate) fn compile(
    registry: &NodeRegistry,
    config: &ChoreographerConfig,
    steps: &[StepDescriptor],
) -> Result<Schedule> {
    let mut timings: Vec<Timing> = Vec::with_capacity(steps.len());
    let mut step_entries: Vec<Vec<usize>> = Vec::with_capacity(steps.len());
    let mut projected: FxHashMap<NodeId, Snapshot> = FxHashMap::default();
    let mut entries: Vec<ScheduleEntry> = Vec::new();

    for step in steps {
        let timing = resolve_timing(config, step, &timings)?;
        let first = entries.len();

        match &step.source {
            StepSource::Nodes(nodes) => {
                let mut bounds = Vec::with_capacity(nodes.len());
                for (index, node) in nodes.iter().enumerate() {
                    let before = projection(registry, &mut projected, step.id, *node)?;
                    bounds.push((index, before.visual_bounds()));
                    let entry = compile_entry(registry, &mut projected, step, &timing, *node)?;
                    entries.push(entry);
                }
                if let Some(stagger) = &step.config.stagger {
                    apply_stagger(
                        step.id,
                        stagger,
                        &mut entries[first..],
                        &bounds,
                        timing.duration_ms,
                    )?;
                }
            }
            StepSource::Reversal(reference) => {
                let source = step_entries.get(reference.0).ok_or(BuildError::UnknownStep {
                    step: step.id,
                    reference: *reference,
                })?;
                for &index in source {
                    let original = &entries[index];
                    let mut values = original.values.clone();
                    values.flip();

                    let snapshot = projection(registry, &mut projected, step.id, original.node)?;
                    values.project(snapshot);

                    let entry = ScheduleEntry {
                        step: step.id,
                        node: original.node,
                        start_ms: timing.start_ms,
                        end_ms: timing.start_ms + timing.duration_ms,
                        values,
                        pivot: original.pivot,
                        visible_on_start: step.config.visible_on_start,
                        visible_on_end: step.config.visible_on_end,
                    };
                    entries.push(entry);
                }
            }
        }

        tracing::trace!(
            step = %step.id,
            start_ms = timing.start_ms,
            duration_ms = timing.duration_ms,
            entries = entries.len() - first,
            "step compiled"
        );
        step_entries.push((first..entries.len()).collect());
        timings.push(timing);
    }

    let windows: Vec<StepWindow> = steps
        .iter()
        .zip(&timings)
        .map(|(step, timing)| StepWindow {
            id: step.id,
            start_ms: timing.start_ms,
            duration_ms: timing.duration_ms,
        })
        .collect();
    let total_duration_ms = windows
        .iter()
        .map(StepWindow::end_ms)
        .fold(0.0_f32, f32::max);

    tracing::debug!(
        steps = windows.len(),
        entries = entries.len(),
        total_duration_ms,
        "choreography compiled"
    );

    Ok(Schedule {
        steps: windows,
        entries,
        total_duration_ms,
    })
}

fn resolve_timing(
    config: &ChoreographerConfig,
    step: &StepDescriptor,
    timings: &[Timing],
) -> Result<Timing> {
    let parent = step.parent.and_then(|id| timings.get(id.0));
    let inherited = if step.config.allow_inheritance.unwrap_or(config.allow_inheritance) {
        parent
    } else {
        None
    };
    let reversed = match &step.source {
        StepSource::Reversal(reference) => timings.get(reference.0),
        StepSource::Nodes(_) => None,
    };

    let duration_ms = step
        .config
        .duration_ms
        .or_else(|| reversed.map(|t| t.duration_ms))
        .or_else(|| inherited.map(|t| t.duration_ms))
        .unwrap_or(config.default_duration_ms as f32);

    if step.config.curve.is_some() && duration_ms <= 0.0 {
        return Err(BuildError::ZeroDuration { step: step.id });
    }

    let curve = step
        .config
        .curve
        .clone()
        .or_else(|| inherited.map(|t| t.curve.clone()))
        .unwrap_or_else(|| config.default_curve.into());

    let pivot = step
        .config
        .pivot
        .or_else(|| inherited.map(|t| t.pivot))
        .unwrap_or(config.default_pivot);

    let start_ms = parent
        .map(|t| t.start_ms + t.duration_ms * step.offset)
        .unwrap_or(0.0)
        + step.config.start_delay_ms;

    Ok(Timing {
        start_ms,
        duration_ms,
        curve,
        pivot,
    })
}

/// Projected snapshot of `node`, captured from the registry on first use
fn projection<'a>(
    registry: &NodeRegistry,
    projected: &'a mut FxHashMap<NodeId, Snapshot>,
    step: StepId,
    node: NodeId,
) -> Result<&'a mut Snapshot> {
    match projected.entry(node) {
        Entry::Occupied(entry) => Ok(entry.into_mut()),
        Entry::Vacant(entry) => {
            let morphable = registry
                .get(node)
                .ok_or(BuildError::UnknownNode { step, node })?;
            Ok(entry.insert(Snapshot::capture(morphable)))
        }
    }
}

fn require_laid_out(registry: &NodeRegistry, step: StepId, node: NodeId) -> Result<()> {
    let morphable = registry
        .get(node)
        .ok_or(BuildError::UnknownNode { step, node })?;
    if morphable.is_laid_out() {
        Ok(())
    } else {
        Err(GeometryError::NotMeasured {
            node: format!("{:?}", node),
        }
        .into())
    }
}

fn compile_entry(
    registry: &NodeRegistry,
    projected: &mut FxHashMap<NodeId, Snapshot>,
    step: &StepDescriptor,
    timing: &Timing,
    node: NodeId,
) -> Result<ScheduleEntry> {
    let id = step.id;
    let (window_start, window_end) = step.config.window;
    let before = *projection(registry, projected, id, node)?;
    let mut after = before;
    let mut values = PropertyValues::new();

    let windowed = |value: AnimatedFloatValue, curve: Curve| -> Result<AnimatedFloatValue> {
        value
            .with_curve(curve)
            .with_duration_offsets(window_start, window_end)
            .map_err(|_| BuildError::InvalidWindow {
                step: id,
                start: window_start,
                end: window_end,
            })
    };

    for (property, spec) in &step.properties.floats {
        let property = *property;
        let from = after.get(property);
        let curve = spec.curve.clone().unwrap_or_else(|| timing.curve.clone());

        let value = match &spec.intent {
            FloatIntent::To(to) => AnimatedFloatValue::new(from, *to),
            FloatIntent::FromTo(start, end) => AnimatedFloatValue::new(*start, *end),
            FloatIntent::By(delta) => {
                let mut value = AnimatedFloatValue::new(from, from).with_delta(*delta);
                value.resolve_delta();
                value
            }
            FloatIntent::Keyframes(keyframes) => {
                let mut array = AnimatedValueArray::new(keyframes.clone()).with_curve(curve);
                array
                    .set_duration_offsets(window_start, window_end)
                    .map_err(|_| BuildError::InvalidWindow {
                        step: id,
                        start: window_start,
                        end: window_end,
                    })?;
                after.set(property, array.last().copied().unwrap_or(from));
                values.set_keyframes(property, array);
                continue;
            }
        };

        after.set(property, value.to);
        values.set_float(property, windowed(value, curve)?);
    }

    if let Some(placement) = step.properties.placement {
        require_laid_out(registry, id, node)?;
        let visual = after.visual_bounds();
        let from = Coordinates::new(
            after.get(Property::TranslationX),
            after.get(Property::TranslationY),
        );

        let (to, arc) = match placement {
            Placement::Anchor {
                anchor,
                reference,
                margin,
                arc,
            } => {
                require_laid_out(registry, id, reference)?;
                let reference_bounds =
                    projection(registry, projected, id, reference)?.visual_bounds();
                let target = anchor.target(&visual, &reference_bounds, margin);
                (from + (target - visual.origin()), arc)
            }
            Placement::PositionAt(bounds) => {
                let center = bounds.center();
                let target = Coordinates::new(
                    center.x - visual.width / 2.0,
                    center.y - visual.height / 2.0,
                );
                (from + (target - visual.origin()), false)
            }
            Placement::ArcTo(target) => (target, true),
        };

        values.set_float(
            Property::TranslationX,
            windowed(AnimatedFloatValue::new(from.x, to.x), timing.curve.clone())?,
        );
        values.set_float(
            Property::TranslationY,
            windowed(AnimatedFloatValue::new(from.y, to.y), timing.curve.clone())?,
        );
        if arc {
            let control = step
                .config
                .control_point
                .unwrap_or(Coordinates::new(to.x, from.y));
            values.set_arc(ArcPath::new(from, to).with_control(control));
        }
        after.set(Property::TranslationX, to.x);
        after.set(Property::TranslationY, to.y);
    }

    if let Some(spec) = &step.properties.corners {
        let from = spec.from.unwrap_or(after.corner_radii);
        let mut to = spec.target.unwrap_or(from);
        for update in &spec.updates {
            match *update {
                CornerUpdate::Corners(corners, radius) => to.set_corners(corners, radius),
                CornerUpdate::Index(index, radius) => to
                    .set(index, radius)
                    .map_err(|_| BuildError::InvalidCornerSubset { step: id, index })?,
            }
        }
        let curve = spec.curve.clone().unwrap_or_else(|| timing.curve.clone());
        let value = AnimatedCornerRadii::new(from, to)
            .with_curve(curve)
            .with_duration_offsets(window_start, window_end)
            .map_err(|_| BuildError::InvalidWindow {
                step: id,
                start: window_start,
                end: window_end,
            })?;
        after.corner_radii = to;
        values.set_corners(value);
    }

    if let Some(spec) = &step.properties.color {
        let background = registry
            .get(node)
            .map(|n| n.background_kind())
            .unwrap_or_default();
        if background == BackgroundKind::Bitmap {
            tracing::warn!(step = %id, ?node, "color animation on a bitmap background is ignored");
        }
        let from = spec.from.unwrap_or(after.color);
        let curve = spec.curve.clone().unwrap_or_else(|| timing.curve.clone());
        let value = AnimatedColor::new(from, spec.to)
            .with_curve(curve)
            .with_duration_offsets(window_start, window_end)
            .map_err(|_| BuildError::InvalidWindow {
                step: id,
                start: window_start,
                end: window_end,
            })?;
        after.color = spec.to;
        values.set_color(value);
    }

    if let Some(stretch) = &step.config.stretch {
        if let Some(property) = stretch_axis(&values) {
            let size = match property {
                Property::TranslationY => before.get(Property::Height),
                _ => before.get(Property::Width),
            };
            if size <= 0.0 {
                return Err(GeometryError::Degenerate(format!(
                    "node {:?} has no size along the stretch axis",
                    node
                ))
                .into());
            }
            values.set_stretch(property, *stretch);
        } else {
            tracing::debug!(step = %id, ?node, "stretch configured without a translation");
        }
    }

    let parent_bounds = registry.parent(node).and_then(|parent| {
        projected
            .get(&parent)
            .map(Snapshot::layout_bounds)
            .or_else(|| registry.get(parent).map(|p| p.bounds()))
    });
    let pivot = timing
        .pivot
        .resolve(&before.layout_bounds(), parent_bounds.as_ref());

    if let Some(snapshot) = projected.get_mut(&node) {
        *snapshot = after;
    }

    Ok(ScheduleEntry {
        step: id,
        node,
        start_ms: timing.start_ms,
        end_ms: timing.start_ms + timing.duration_ms,
        values,
        pivot: Some(pivot),
        visible_on_start: step.config.visible_on_start,
        visible_on_end: step.config.visible_on_end,
    })
}

/// Translation driving a stretch: vertical when it moves, else horizontal
fn stretch_axis(values: &PropertyValues) -> Option<Property> {
    let moving = |property: Property| {
        values
            .float(property)
            .map(|value| value.from != value.to)
            .unwrap_or(false)
    };
    if moving(Property::TranslationY) {
        Some(Property::TranslationY)
    } else if values.float(Property::TranslationX).is_some() {
        Some(Property::TranslationX)
    } else if values.float(Property::TranslationY).is_some() {
        Some(Property::TranslationY)
    } else {
        None
    }
}

fn apply_stagger(
    step: StepId,
    stagger: &StaggerConfig,
    entries: &mut [ScheduleEntry],
    bounds: &[(usize, Bounds)],
    duration_ms: f32,
) -> Result<()> {
    for info in compute_stagger(stagger, bounds, duration_ms) {
        if !info.staggered {
            continue;
        }
        let (start, end) = (info.start_offset, info.end_offset);
        let span = end - start;
        entries[info.key]
            .values
            .map_windows(|(s, e)| (start + s * span, start + e * span))
            .map_err(|_| BuildError::InvalidWindow { step, start, end })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Choreographer;
    use crate::node::NodeState;
    use morph_core::Bounds;

    #[test]
    fn test_sequential_and_parallel_timing() {
        let mut choreographer = Choreographer::new();
        let node = choreographer.register(NodeState::new(Bounds::new(0.0, 0.0, 10.0, 10.0)));

        let choreography = choreographer
            .animate(&[node])
            .rotate_to(90.0)
            .with_duration(1000)
            .then()
            .alpha_to(0.0)
            .and()
            .scale_to(2.0)
            .with_start_delay(100)
            .build()
            .unwrap();

        let schedule = choreography.schedule();
        assert_eq!(
            schedule.windows(),
            vec![(0.0, 1000.0), (1000.0, 2000.0), (1100.0, 2100.0)]
        );
        assert_eq!(schedule.total_duration_ms(), 2100.0);
    }

    #[test]
    fn test_inheritance_disabled_uses_defaults() {
        let mut choreographer = Choreographer::new();
        let node = choreographer.register(NodeState::new(Bounds::new(0.0, 0.0, 10.0, 10.0)));

        let choreography = choreographer
            .animate(&[node])
            .rotate_to(90.0)
            .with_duration(1000)
            .then()
            .allow_inheritance(false)
            .alpha_to(0.0)
            .build()
            .unwrap();

        let step = choreography.schedule().step(StepId(1)).copied().unwrap();
        assert_eq!(step.start_ms, 1000.0);
        assert_eq!(step.duration_ms, 350.0);
    }

    #[test]
    fn test_zero_duration_with_curve() {
        let mut choreographer = Choreographer::new();
        let node = choreographer.register(NodeState::new(Bounds::new(0.0, 0.0, 10.0, 10.0)));

        let result = choreographer
            .animate(&[node])
            .rotate_to(90.0)
            .with_duration(0)
            .with_curve(Curve::Linear)
            .build();

        assert!(matches!(
            result,
            Err(BuildError::ZeroDuration { step: StepId(0) })
        ));
    }

    #[test]
    fn test_relative_values_accumulate() {
        let mut choreographer = Choreographer::new();
        let node = choreographer.register(NodeState::new(Bounds::new(0.0, 0.0, 10.0, 10.0)));

        let choreography = choreographer
            .animate(&[node])
            .x_translate_by(20.0)
            .then()
            .x_translate_by(20.0)
            .then()
            .rotate_to(10.0)
            .then()
            .rotate_by(3.0)
            .build()
            .unwrap();

        let schedule = choreography.schedule();
        let second = schedule.entries_for(StepId(1)).next().unwrap();
        let translation = second.values.float(Property::TranslationX).unwrap();
        assert_eq!((translation.from, translation.to), (20.0, 40.0));

        let fourth = schedule.entries_for(StepId(3)).next().unwrap();
        let rotation = fourth.values.float(Property::Rotation).unwrap();
        assert_eq!((rotation.from, rotation.to), (10.0, 30.0));
    }

    #[test]
    fn test_active_window_offsets() {
        let mut choreographer = Choreographer::new();
        let node = choreographer.register(NodeState::new(Bounds::new(0.0, 0.0, 10.0, 10.0)));

        let choreography = choreographer
            .animate(&[node])
            .alpha_to(0.0)
            .with_active_window(0.25, 0.75)
            .build()
            .unwrap();

        let entry = &choreography.schedule().entries()[0];
        let alpha = entry.values.float(Property::Alpha).unwrap();
        assert_eq!(alpha.duration_offsets(), (0.25, 0.75));
        assert_eq!(alpha.value_at(0.2), 1.0);
        assert_eq!(alpha.value_at(0.8), 0.0);
    }

    #[test]
    fn test_position_at_centers_node() {
        let mut choreographer = Choreographer::new();
        let node = choreographer.register(NodeState::new(Bounds::new(10.0, 10.0, 20.0, 20.0)));

        let choreography = choreographer
            .animate(&[node])
            .position_at(Bounds::new(100.0, 100.0, 100.0, 100.0))
            .build()
            .unwrap();

        let values = &choreography.schedule().entries()[0].values;
        assert_eq!(values.float(Property::TranslationX).map(|v| v.to), Some(130.0));
        assert_eq!(values.float(Property::TranslationY).map(|v| v.to), Some(130.0));
    }

    #[test]
    fn test_stretch_requires_size() {
        let mut choreographer = Choreographer::new();
        let node = choreographer.register(NodeState::new(Bounds::new(0.0, 0.0, 0.0, 0.0)));

        let result = choreographer
            .animate(&[node])
            .y_translate_to(100.0)
            .with_stretch(morph_animation::Stretch::new(0.5, 1.0, 0.5).unwrap())
            .build();

        assert!(matches!(
            result,
            Err(BuildError::Geometry(GeometryError::Degenerate(_)))
        ));
    }
}
