//! Animatable properties and per-node value tables
//!
//! Scalar properties are addressed through the [`Property`] enum and dispatched
//! to the matching [`Morphable`] accessor with a `match`, so no name lookup
//! happens at playback time. Colors and corner radii have their own slots in
//! [`PropertyValues`].

use crate::node::{BackgroundKind, Morphable};
use indexmap::IndexMap;
use morph_animation::{
    AnimatedColor, AnimatedCornerRadii, AnimatedFloatValue, AnimatedValueArray, ArcPath, Stretch,
};
use morph_core::{Axis, Color, CornerRadii};
use serde::{Deserialize, Serialize};

/// Scalar node property
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    X,
    Y,
    Width,
    Height,
    Alpha,
    Elevation,
    TranslationX,
    TranslationY,
    TranslationZ,
    Rotation,
    RotationX,
    RotationY,
    ScaleX,
    ScaleY,
}

/// Number of scalar properties
pub const PROPERTY_COUNT: usize = 14;

impl Property {
    pub const ALL: [Property; PROPERTY_COUNT] = [
        Property::X,
        Property::Y,
        Property::Width,
        Property::Height,
        Property::Alpha,
        Property::Elevation,
        Property::TranslationX,
        Property::TranslationY,
        Property::TranslationZ,
        Property::Rotation,
        Property::RotationX,
        Property::RotationY,
        Property::ScaleX,
        Property::ScaleY,
    ];

    /// Dense index, matching the position in [`Property::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn read(self, node: &dyn Morphable) -> f32 {
        match self {
            Property::X => node.x(),
            Property::Y => node.y(),
            Property::Width => node.width(),
            Property::Height => node.height(),
            Property::Alpha => node.alpha(),
            Property::Elevation => node.elevation(),
            Property::TranslationX => node.translation_x(),
            Property::TranslationY => node.translation_y(),
            Property::TranslationZ => node.translation_z(),
            Property::Rotation => node.rotation(),
            Property::RotationX => node.rotation_x(),
            Property::RotationY => node.rotation_y(),
            Property::ScaleX => node.scale_x(),
            Property::ScaleY => node.scale_y(),
        }
    }

    pub fn write(self, node: &mut dyn Morphable, value: f32) {
        match self {
            Property::X => node.set_x(value),
            Property::Y => node.set_y(value),
            Property::Width => node.set_width(value),
            Property::Height => node.set_height(value),
            Property::Alpha => node.set_alpha(value),
            Property::Elevation => node.set_elevation(value),
            Property::TranslationX => node.set_translation_x(value),
            Property::TranslationY => node.set_translation_y(value),
            Property::TranslationZ => node.set_translation_z(value),
            Property::Rotation => node.set_rotation(value),
            Property::RotationX => node.set_rotation_x(value),
            Property::RotationY => node.set_rotation_y(value),
            Property::ScaleX => node.set_scale_x(value),
            Property::ScaleY => node.set_scale_y(value),
        }
    }

    /// Axis a translation property moves along
    pub fn translation_axis(self) -> Option<Axis> {
        match self {
            Property::TranslationX | Property::X => Some(Axis::Horizontal),
            Property::TranslationY | Property::Y => Some(Axis::Vertical),
            _ => None,
        }
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Full animatable state of a node at one point of a choreography
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snapshot {
    values: [f32; PROPERTY_COUNT],
    pub color: Color,
    pub corner_radii: CornerRadii,
}

impl Snapshot {
    pub fn capture(node: &dyn Morphable) -> Self {
        let mut values = [0.0; PROPERTY_COUNT];
        for property in Property::ALL {
            values[property.index()] = property.read(node);
        }
        Self {
            values,
            color: node.color(),
            corner_radii: node.corner_radii(),
        }
    }

    pub fn get(&self, property: Property) -> f32 {
        self.values[property.index()]
    }

    pub fn set(&mut self, property: Property, value: f32) {
        self.values[property.index()] = value;
    }

    /// Bounds including translation
    pub fn visual_bounds(&self) -> morph_core::Bounds {
        morph_core::Bounds::new(
            self.get(Property::X) + self.get(Property::TranslationX),
            self.get(Property::Y) + self.get(Property::TranslationY),
            self.get(Property::Width),
            self.get(Property::Height),
        )
    }

    /// Laid-out bounds, without translation
    pub fn layout_bounds(&self) -> morph_core::Bounds {
        morph_core::Bounds::new(
            self.get(Property::X),
            self.get(Property::Y),
            self.get(Property::Width),
            self.get(Property::Height),
        )
    }
}

// ============================================================================
// PropertyValues
// ============================================================================

/// Resolved animated values for one node within one step
#[derive(Clone, Debug, Default)]
pub struct PropertyValues {
    floats: IndexMap<Property, AnimatedFloatValue>,
    keyframes: IndexMap<Property, AnimatedValueArray<f32>>,
    color: Option<AnimatedColor>,
    corners: Option<AnimatedCornerRadii>,
    arc: Option<ArcPath>,
    stretch: Option<(Property, Stretch)>,
}

impl PropertyValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn float(&self, property: Property) -> Option<&AnimatedFloatValue> {
        self.floats.get(&property)
    }

    pub fn float_mut(&mut self, property: Property) -> Option<&mut AnimatedFloatValue> {
        self.floats.get_mut(&property)
    }

    /// Insert or replace a scalar value; replaces any keyframes for the property
    pub fn set_float(&mut self, property: Property, value: AnimatedFloatValue) {
        self.keyframes.shift_remove(&property);
        self.floats.insert(property, value);
    }

    pub fn keyframes(&self, property: Property) -> Option<&AnimatedValueArray<f32>> {
        self.keyframes.get(&property)
    }

    /// Insert or replace a keyframe list; replaces any scalar value for the property
    pub fn set_keyframes(&mut self, property: Property, values: AnimatedValueArray<f32>) {
        self.floats.shift_remove(&property);
        self.keyframes.insert(property, values);
    }

    pub fn floats(&self) -> impl Iterator<Item = (Property, &AnimatedFloatValue)> {
        self.floats.iter().map(|(p, v)| (*p, v))
    }

    pub fn color(&self) -> Option<&AnimatedColor> {
        self.color.as_ref()
    }

    pub fn set_color(&mut self, color: AnimatedColor) {
        self.color = Some(color);
    }

    pub fn corners(&self) -> Option<&AnimatedCornerRadii> {
        self.corners.as_ref()
    }

    pub fn set_corners(&mut self, corners: AnimatedCornerRadii) {
        self.corners = Some(corners);
    }

    pub fn arc(&self) -> Option<&ArcPath> {
        self.arc.as_ref()
    }

    /// Route translation x/y through `path` instead of independent interpolation
    pub fn set_arc(&mut self, path: ArcPath) {
        self.arc = Some(path);
    }

    pub fn set_stretch(&mut self, translation: Property, stretch: Stretch) {
        self.stretch = Some((translation, stretch));
    }

    pub fn stretch(&self) -> Option<&(Property, Stretch)> {
        self.stretch.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.floats.is_empty()
            && self.keyframes.is_empty()
            && self.color.is_none()
            && self.corners.is_none()
    }

    /// Properties written by these values, in write order
    pub fn properties(&self) -> impl Iterator<Item = Property> + '_ {
        self.floats.keys().chain(self.keyframes.keys()).copied()
    }

    /// Apply `f` to every value's duration window
    pub(crate) fn map_windows<F>(&mut self, f: F) -> morph_animation::Result<()>
    where
        F: Fn((f32, f32)) -> (f32, f32),
    {
        for value in self.floats.values_mut() {
            let (start, end) = f(value.duration_offsets());
            value.set_duration_offsets(start, end)?;
        }
        for values in self.keyframes.values_mut() {
            let (start, end) = f(values.duration_offsets());
            values.set_duration_offsets(start, end)?;
        }
        if let Some(color) = self.color.as_mut() {
            let (start, end) = f(color.duration_offsets());
            color.set_duration_offsets(start, end)?;
        }
        if let Some(corners) = self.corners.as_mut() {
            let (start, end) = f(corners.duration_offsets());
            corners.set_duration_offsets(start, end)?;
        }
        Ok(())
    }

    /// Swap every value's endpoints
    pub fn flip(&mut self) {
        for value in self.floats.values_mut() {
            value.flip();
        }
        for values in self.keyframes.values_mut() {
            values.reverse();
        }
        if let Some(color) = self.color.as_mut() {
            color.flip();
        }
        if let Some(corners) = self.corners.as_mut() {
            corners.flip();
        }
        if let Some(arc) = self.arc.as_mut() {
            std::mem::swap(&mut arc.start, &mut arc.end);
        }
    }

    /// Fold the end state of these values into `snapshot`
    pub fn project(&self, snapshot: &mut Snapshot) {
        for (property, value) in &self.floats {
            snapshot.set(*property, value.to);
        }
        for (property, values) in &self.keyframes {
            if let Some(last) = values.last() {
                snapshot.set(*property, *last);
            }
        }
        if let Some(color) = &self.color {
            snapshot.color = color.to;
        }
        if let Some(corners) = &self.corners {
            snapshot.corner_radii = corners.to;
        }
    }

    /// Write the values at `fraction` of the step to `node`
    pub fn apply(&self, node: &mut dyn Morphable, fraction: f32) {
        for (property, value) in &self.floats {
            if self.arc.is_some()
                && matches!(property, Property::TranslationX | Property::TranslationY)
            {
                continue;
            }
            property.write(node, value.value_at(fraction));
        }

        for (property, values) in &self.keyframes {
            if let Some(value) = values.value_at(fraction) {
                property.write(node, value);
            }
        }

        if let Some(arc) = &self.arc {
            let eased = self
                .floats
                .get(&Property::TranslationX)
                .or_else(|| self.floats.get(&Property::TranslationY))
                .map(|value| value.eased_fraction(fraction))
                .unwrap_or(fraction);
            let point = arc.point_at(eased);
            node.set_translation_x(point.x);
            node.set_translation_y(point.y);
        }

        if let Some(color) = &self.color {
            if node.background_kind() != BackgroundKind::Bitmap {
                node.set_color(color.value_at(fraction));
            }
        }

        if let Some(corners) = &self.corners {
            node.set_corner_radii(corners.value_at(fraction));
        }

        if let Some((translation, stretch)) = &self.stretch {
            self.apply_stretch(node, *translation, stretch);
        }
    }

    fn apply_stretch(&self, node: &mut dyn Morphable, translation: Property, stretch: &Stretch) {
        let (Some(value), Some(axis)) = (self.floats.get(&translation), translation.translation_axis())
        else {
            return;
        };

        let current = translation.read(node);
        match stretch.deform(axis, value, current, node.width(), node.height()) {
            Ok(Some(frame)) => {
                match frame.axis {
                    Axis::Vertical => node.set_pivot_y(frame.pivot),
                    Axis::Horizontal => node.set_pivot_x(frame.pivot),
                }
                node.set_scale_x(frame.scale_x);
                node.set_scale_y(frame.scale_y);
            }
            Ok(None) => {}
            Err(err) => tracing::trace!(%err, "stretch skipped"),
        }
    }
}
