use morph_animation::{Curve, StaggerConfig};
use morph_choreography::{
    BuildError, Choreographer, Morphable, NodeError, NodeId, NodeState, PlaybackError,
    PlaybackState, Property, StepId,
};
use morph_core::{
    Anchor, Bounds, Color, Corner, CornerRadii, Coordinates, GeometryError, Measurement,
};
use std::cell::Cell;
use std::rc::Rc;

fn node_at(choreographer: &mut Choreographer, bounds: Bounds) -> NodeId {
    choreographer.register(NodeState::new(bounds))
}

fn run_to_end(choreography: &mut morph_choreography::Choreography) {
    choreography.play().unwrap();
    while choreography.state() == PlaybackState::Playing {
        choreography.tick(16.0).unwrap();
    }
}

#[test]
fn test_sequential_steps_end_to_end() {
    let mut choreographer = Choreographer::new();
    let card = node_at(&mut choreographer, Bounds::new(0.0, 0.0, 100.0, 100.0));

    let mut choreography = choreographer
        .animate(&[card])
        .rotate_to(360.0)
        .with_duration(1000)
        .then()
        .resize_to(Bounds::new(0.0, 0.0, 200.0, 150.0), Measurement::Both)
        .build()
        .unwrap();

    assert_eq!(
        choreography.schedule().windows(),
        vec![(0.0, 1000.0), (1000.0, 2000.0)]
    );
    assert_eq!(choreography.total_duration_ms(), 2000.0);

    choreography.play().unwrap();
    choreography.tick(1000.0).unwrap();
    let node = choreography.node(card).unwrap();
    assert_eq!(node.rotation(), 360.0);
    assert_eq!(node.width(), 100.0);

    run_to_end(&mut choreography);
    let node = choreography.node(card).unwrap();
    assert_eq!(node.width(), 200.0);
    assert_eq!(node.height(), 150.0);
    assert_eq!(choreography.state(), PlaybackState::Completed);
}

#[test]
fn test_reversal_swaps_endpoints() {
    let mut choreographer = Choreographer::new();
    let card = node_at(&mut choreographer, Bounds::new(0.0, 0.0, 10.0, 10.0));

    let builder = choreographer
        .animate(&[card])
        .x_translate_to(100.0)
        .with_curve(Curve::Linear)
        .with_duration(100);
    let forward = builder.id();
    let mut choreography = builder.then_reversed_with(forward).build().unwrap();

    let reversed = choreography.schedule().entries_for(StepId::from(1)).next().unwrap();
    let translation = reversed.values.float(Property::TranslationX).unwrap();
    assert_eq!((translation.from, translation.to), (100.0, 0.0));
    assert_eq!((reversed.start_ms, reversed.end_ms), (100.0, 200.0));

    choreography.play().unwrap();
    choreography.tick(150.0).unwrap();
    assert_eq!(choreography.node(card).unwrap().translation_x(), 50.0);

    run_to_end(&mut choreography);
    assert_eq!(choreography.node(card).unwrap().translation_x(), 0.0);
}

#[test]
fn test_corner_subset_leaves_other_corners() {
    let mut choreographer = Choreographer::new();
    let card = choreographer.register(
        NodeState::new(Bounds::new(0.0, 0.0, 50.0, 50.0))
            .with_corner_radii(CornerRadii::uniform(4.0)),
    );

    let mut choreography = choreographer
        .animate(&[card])
        .corner_radius_to(Corner::TopLeft | Corner::TopRight, 16.0)
        .build()
        .unwrap();
    run_to_end(&mut choreography);

    let radii = choreography.node(card).unwrap().corner_radii();
    assert_eq!(radii.top_left(), 16.0);
    assert_eq!(radii.top_right(), 16.0);
    assert_eq!(radii.bottom_right(), 4.0);
    assert_eq!(radii.bottom_left(), 4.0);
}

#[test]
fn test_build_errors() {
    let result = Choreographer::new().animate(&[]).alpha_to(0.0).build();
    assert!(matches!(result, Err(BuildError::EmptyNodeSet { .. })));

    let result = Choreographer::new()
        .animate(&[NodeId::default()])
        .alpha_to(0.0)
        .build();
    assert!(matches!(result, Err(BuildError::UnknownNode { .. })));

    let mut choreographer = Choreographer::new();
    let card = node_at(&mut choreographer, Bounds::new(0.0, 0.0, 10.0, 10.0));
    let pending = choreographer.register(NodeState::unmeasured());
    let result = choreographer
        .animate(&[card])
        .anchor_to(Anchor::Center, pending, 0.0)
        .build();
    assert!(matches!(
        result,
        Err(BuildError::Geometry(GeometryError::NotMeasured { .. }))
    ));
}

#[test]
fn test_anchor_resolves_translation() {
    let mut choreographer = Choreographer::new();
    let card = node_at(&mut choreographer, Bounds::new(0.0, 0.0, 10.0, 10.0));
    let frame = node_at(&mut choreographer, Bounds::new(100.0, 100.0, 50.0, 50.0));

    let mut choreography = choreographer
        .animate(&[card])
        .anchor_to(Anchor::TopLeft, frame, 5.0)
        .build()
        .unwrap();
    run_to_end(&mut choreography);

    let node = choreography.node(card).unwrap();
    assert_eq!(node.translation_x(), 105.0);
    assert_eq!(node.translation_y(), 105.0);
}

#[test]
fn test_anchor_arc_follows_control_point() {
    let mut choreographer = Choreographer::new();
    let card = node_at(&mut choreographer, Bounds::new(0.0, 0.0, 10.0, 10.0));
    let stage = node_at(&mut choreographer, Bounds::new(0.0, 0.0, 200.0, 100.0));

    let mut choreography = choreographer
        .animate(&[card])
        .anchor_arc_to(Anchor::Center, stage, 0.0)
        .with_curve(Curve::Linear)
        .with_duration(100)
        .build()
        .unwrap();

    // Path runs (0, 0) -> (95, 45) through the default control point (95, 0)
    let entry = choreography.schedule().entries().first().unwrap();
    let path = entry.values.arc().unwrap();
    assert_eq!(path.control, Coordinates::new(95.0, 0.0));

    choreography.play().unwrap();
    choreography.tick(50.0).unwrap();
    let node = choreography.node(card).unwrap();
    assert_eq!(node.translation_x(), 71.25);
    assert_eq!(node.translation_y(), 11.25);
    // Straight-line midpoint would be (47.5, 22.5)
    assert!(node.translation_x() > 47.5);
    assert!(node.translation_y() < 22.5);

    run_to_end(&mut choreography);
    let node = choreography.node(card).unwrap();
    assert_eq!(node.translation_x(), 95.0);
    assert_eq!(node.translation_y(), 45.0);
}

#[test]
fn test_parallel_pair_shares_second_window() {
    let mut choreographer = Choreographer::new();
    let card = choreographer.register(
        NodeState::new(Bounds::new(0.0, 0.0, 100.0, 100.0))
            .with_corner_radii(CornerRadii::uniform(4.0)),
    );

    let mut choreography = choreographer
        .animate(&[card])
        .rotate_to(360.0)
        .with_duration(1000)
        .then()
        .resize_to(Bounds::new(0.0, 0.0, 200.0, 120.0), Measurement::Both)
        .and()
        .corner_radius_to(Corner::TopLeft | Corner::TopRight, 16.0)
        .build()
        .unwrap();

    let schedule = choreography.schedule();
    assert_eq!(schedule.windows(), vec![(0.0, 1000.0), (1000.0, 2000.0)]);

    let resize = schedule.entries_for(StepId::from(1)).next().unwrap();
    let corners = schedule.entries_for(StepId::from(2)).next().unwrap();
    assert_eq!((resize.start_ms, resize.end_ms), (1000.0, 2000.0));
    assert_eq!((corners.start_ms, corners.end_ms), (resize.start_ms, resize.end_ms));

    let radii = corners.values.corners().unwrap();
    assert_eq!(radii.from, CornerRadii::uniform(4.0));
    assert_eq!(radii.to.bottom_right(), 4.0);
    assert_eq!(radii.to.bottom_left(), 4.0);

    choreography.play().unwrap();
    choreography.tick(1500.0).unwrap();
    let node = choreography.node(card).unwrap();
    assert_eq!(node.rotation(), 360.0);
    assert_eq!(node.corner_radii().bottom_left(), 4.0);
    assert!(node.corner_radii().top_left() > 4.0);

    run_to_end(&mut choreography);
    let node = choreography.node(card).unwrap();
    assert_eq!(node.width(), 200.0);
    assert_eq!(node.height(), 120.0);
    let radii = node.corner_radii();
    assert_eq!(radii.top_left(), 16.0);
    assert_eq!(radii.top_right(), 16.0);
    assert_eq!(radii.bottom_right(), 4.0);
    assert_eq!(radii.bottom_left(), 4.0);
}

#[test]
fn test_cancel_keeps_last_values() {
    let mut choreographer = Choreographer::new();
    let card = node_at(&mut choreographer, Bounds::new(0.0, 0.0, 10.0, 10.0));

    let mut choreography = choreographer
        .animate(&[card])
        .alpha_to(0.0)
        .with_curve(Curve::Linear)
        .with_duration(100)
        .build()
        .unwrap();

    choreography.play().unwrap();
    choreography.tick(50.0).unwrap();
    assert!(choreography.cancel());
    assert!(!choreography.cancel());

    assert_eq!(choreography.state(), PlaybackState::Cancelled);
    assert_eq!(choreography.node(card).unwrap().alpha(), 0.5);
    assert!(choreography.tick(16.0).is_err());
}

#[test]
fn test_completion_fires_once() {
    let mut choreographer = Choreographer::new();
    let card = node_at(&mut choreographer, Bounds::new(0.0, 0.0, 10.0, 10.0));

    let mut choreography = choreographer
        .animate(&[card])
        .alpha_to(0.0)
        .with_duration(100)
        .then()
        .alpha_to(1.0)
        .build()
        .unwrap();

    let completions = Rc::new(Cell::new(0));
    let counter = completions.clone();
    choreography.on_complete(move || counter.set(counter.get() + 1));

    run_to_end(&mut choreography);
    assert!(choreography.tick(16.0).is_err());
    assert_eq!(completions.get(), 1);
}

#[test]
fn test_step_callbacks() {
    let mut choreographer = Choreographer::new();
    let card = node_at(&mut choreographer, Bounds::new(0.0, 0.0, 10.0, 10.0));

    let started = Rc::new(Cell::new(0));
    let done = Rc::new(Cell::new(0));
    let halfway = Rc::new(Cell::new(0));
    let last_progress = Rc::new(Cell::new(0.0_f32));
    let (s, d, h, p) = (
        started.clone(),
        done.clone(),
        halfway.clone(),
        last_progress.clone(),
    );

    let mut choreography = choreographer
        .animate(&[card])
        .alpha_to(0.0)
        .with_duration(100)
        .on_start(move || s.set(s.get() + 1))
        .when_done(move || d.set(d.get() + 1))
        .with_offset_trigger(0.5, move || h.set(h.get() + 1))
        .on_progress(move |fraction| p.set(fraction))
        .build()
        .unwrap();

    choreography.play().unwrap();
    assert_eq!(started.get(), 1);
    assert_eq!(halfway.get(), 0);

    choreography.tick(60.0).unwrap();
    assert_eq!(halfway.get(), 1);
    assert_eq!(last_progress.get(), 0.6);

    choreography.tick(60.0).unwrap();
    assert_eq!((started.get(), halfway.get(), done.get()), (1, 1, 1));
    assert_eq!(last_progress.get(), 1.0);
}

#[test]
fn test_stagger_offsets_by_distance() {
    let mut choreographer = Choreographer::new();
    let row = node_at(&mut choreographer, Bounds::new(0.0, 0.0, 300.0, 10.0));
    let children: Vec<NodeId> = [0.0, 100.0, 200.0]
        .iter()
        .filter_map(|x| {
            choreographer.register_child(row, NodeState::new(Bounds::new(*x, 0.0, 10.0, 10.0)))
        })
        .collect();
    assert_eq!(children.len(), 3);

    let stagger = StaggerConfig::new(0.5)
        .unwrap()
        .with_epicenter(Coordinates::new(5.0, 5.0));
    let choreography = choreographer
        .animate_children_of(row, Some(stagger))
        .alpha_to(0.0)
        .with_duration(1000)
        .build()
        .unwrap();

    let offsets: Vec<(f32, f32)> = choreography
        .schedule()
        .entries()
        .iter()
        .map(|entry| entry.values.float(Property::Alpha).unwrap().duration_offsets())
        .collect();
    assert_eq!(offsets, vec![(0.0, 0.5), (0.25, 0.75), (0.5, 1.0)]);
}

#[test]
fn test_inherited_duration_and_cumulative_from() {
    let mut choreographer = Choreographer::new();
    let card = node_at(&mut choreographer, Bounds::new(0.0, 0.0, 10.0, 10.0));

    let choreography = choreographer
        .animate(&[card])
        .y_translate_to(40.0)
        .with_duration(800)
        .with_curve(Curve::Linear)
        .then()
        .y_translate_by(-10.0)
        .and()
        .color_to(Color::RED)
        .build()
        .unwrap();

    let schedule = choreography.schedule();
    assert_eq!(
        schedule.windows(),
        vec![(0.0, 800.0), (800.0, 1600.0)]
    );

    let second = schedule.entries_for(StepId::from(1)).next().unwrap();
    let translation = second.values.float(Property::TranslationY).unwrap();
    assert_eq!((translation.from, translation.to), (40.0, 30.0));
    assert!(translation.curve().is_some_and(Curve::is_linear));

    let third = schedule.entries_for(StepId::from(2)).next().unwrap();
    assert_eq!(third.values.color().map(|c| c.to), Some(Color::RED));
}

#[test]
fn test_visibility_toggles() {
    let mut choreographer = Choreographer::new();
    let mut hidden = NodeState::new(Bounds::new(0.0, 0.0, 10.0, 10.0));
    hidden.visible = false;
    let card = choreographer.register(hidden);

    let mut choreography = choreographer
        .animate(&[card])
        .alpha_from(0.0, 1.0)
        .with_start_visibility(true)
        .with_duration(100)
        .then()
        .alpha_to(0.0)
        .with_end_visibility(false)
        .build()
        .unwrap();

    choreography.play().unwrap();
    assert!(choreography.node(card).unwrap().is_visible());

    run_to_end(&mut choreography);
    assert!(!choreography.node(card).unwrap().is_visible());
}

// ============================================================================
// Failing host
// ============================================================================

struct FlakyNode {
    inner: NodeState,
    commits: usize,
    fail_on: usize,
}

macro_rules! delegate {
    ($($get:ident / $set:ident : $ty:ty),* $(,)?) => {
        $(
            fn $get(&self) -> $ty {
                self.inner.$get()
            }
            fn $set(&mut self, value: $ty) {
                self.inner.$set(value)
            }
        )*
    };
}

impl Morphable for FlakyNode {
    delegate!(
        x / set_x: f32,
        y / set_y: f32,
        width / set_width: f32,
        height / set_height: f32,
        alpha / set_alpha: f32,
        elevation / set_elevation: f32,
        translation_x / set_translation_x: f32,
        translation_y / set_translation_y: f32,
        translation_z / set_translation_z: f32,
        pivot_x / set_pivot_x: f32,
        pivot_y / set_pivot_y: f32,
        rotation / set_rotation: f32,
        rotation_x / set_rotation_x: f32,
        rotation_y / set_rotation_y: f32,
        scale_x / set_scale_x: f32,
        scale_y / set_scale_y: f32,
        color / set_color: Color,
        corner_radii / set_corner_radii: CornerRadii,
        is_visible / set_visible: bool,
    );

    fn commit_frame(&mut self) -> Result<(), NodeError> {
        self.commits += 1;
        if self.commits >= self.fail_on {
            Err(NodeError::new("surface lost"))
        } else {
            Ok(())
        }
    }
}

#[test]
fn test_failed_commit_cancels() {
    let mut choreographer = Choreographer::new();
    let card = choreographer.register(FlakyNode {
        inner: NodeState::new(Bounds::new(0.0, 0.0, 10.0, 10.0)),
        commits: 0,
        fail_on: 2,
    });

    let mut choreography = choreographer
        .animate(&[card])
        .alpha_to(0.0)
        .with_duration(100)
        .build()
        .unwrap();

    choreography.play().unwrap();
    let error = choreography.tick(16.0).unwrap_err();

    assert_eq!(
        error,
        PlaybackError::Node {
            node: card,
            message: "surface lost".to_string(),
        }
    );
    assert_eq!(choreography.state(), PlaybackState::Cancelled);
}
