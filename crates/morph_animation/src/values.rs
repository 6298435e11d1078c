//! Animated value model
//!
//! An [`AnimatedValue`] is a typed `(from, to)` pair plus everything needed to
//! evaluate it inside a step: an optional [`Curve`], a duration window (the part
//! of the step during which the value moves) and an interpolation window (the
//! part of the curve that is used).
//!
//! Evaluation order in [`AnimatedValue::value_at`]:
//!
//! 1. map the step fraction into the duration window (`duration_offset_start..end`)
//! 2. remap that local fraction into the interpolation window
//!    (`interpolate_offset_start..end`)
//! 3. run the curve
//! 4. interpolate `from -> to`
//!
//! Values are plain data: `clone()` is a deep copy and two clones never share
//! mutable state.

use crate::curve::Curve;
use crate::error::{check_window, Result};
use morph_core::{map_range, Color, Coordinates, CornerRadii};

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

// ============================================================================
// Interpolate implementations
// ============================================================================

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

impl Interpolate for i32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        (*self as f32 + (*other - *self) as f32 * t).round() as i32
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        ((self - other) as f32).abs() < epsilon
    }
}

impl Interpolate for Coordinates {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Coordinates::new(self.x.lerp(&other.x, t), self.y.lerp(&other.y, t))
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.approx_eq(&other.x, epsilon) && self.y.approx_eq(&other.y, epsilon)
    }
}

impl Interpolate for CornerRadii {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        CornerRadii::lerp(self, other, t)
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.as_array()
            .iter()
            .zip(other.as_array().iter())
            .all(|(a, b)| a.approx_eq(b, epsilon))
    }
}

impl Interpolate for Color {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Color::lerp(self, other, t)
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.r - other.r).abs() < epsilon
            && (self.g - other.g).abs() < epsilon
            && (self.b - other.b).abs() < epsilon
            && (self.a - other.a).abs() < epsilon
    }
}

// ============================================================================
// Deltas
// ============================================================================

/// A relative target, resolved against the value's `from` endpoint
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Delta {
    /// `to = from + amount`
    Add(f32),
    /// `to = from * factor`
    Multiply(f32),
}

/// Values that can resolve a [`Delta`]
pub trait Accumulate: Sized {
    fn accumulate(&self, delta: Delta) -> Self;
}

impl Accumulate for f32 {
    fn accumulate(&self, delta: Delta) -> Self {
        match delta {
            Delta::Add(amount) => self + amount,
            Delta::Multiply(factor) => self * factor,
        }
    }
}

impl Accumulate for i32 {
    fn accumulate(&self, delta: Delta) -> Self {
        match delta {
            Delta::Add(amount) => self + amount.round() as i32,
            Delta::Multiply(factor) => (*self as f32 * factor).round() as i32,
        }
    }
}

// ============================================================================
// AnimatedValue
// ============================================================================

/// A `(from, to)` pair with timing metadata
#[derive(Clone, Debug)]
pub struct AnimatedValue<T: Interpolate> {
    /// Start endpoint
    pub from: T,
    /// End endpoint
    pub to: T,
    curve: Option<Curve>,
    duration_offset_start: f32,
    duration_offset_end: f32,
    interpolate_offset_start: f32,
    interpolate_offset_end: f32,
    delta: Option<Delta>,
}

/// Scalar animated value
pub type AnimatedFloatValue = AnimatedValue<f32>;
/// Integer animated value with discrete add/multiply deltas
pub type AnimatedIntValue = AnimatedValue<i32>;
/// Animated corner radii, interpolated element-wise
pub type AnimatedCornerRadii = AnimatedValue<CornerRadii>;
/// Animated color
pub type AnimatedColor = AnimatedValue<Color>;

impl<T: Interpolate> AnimatedValue<T> {
    /// Create a value moving from `from` to `to` over the whole step
    pub fn new(from: T, to: T) -> Self {
        Self {
            from,
            to,
            curve: None,
            duration_offset_start: 0.0,
            duration_offset_end: 1.0,
            interpolate_offset_start: 0.0,
            interpolate_offset_end: 1.0,
            delta: None,
        }
    }

    /// Create a value that does not move
    pub fn constant(value: T) -> Self {
        Self::new(value.clone(), value)
    }

    /// Collapse both endpoints to `value`
    pub fn set(&mut self, value: T) {
        self.from = value.clone();
        self.to = value;
    }

    /// Re-target onto another value's end state: both endpoints take `other.to`
    pub fn retarget(&mut self, other: &AnimatedValue<T>) {
        self.set(other.to.clone());
    }

    /// Swap `from` and `to`
    pub fn flip(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }

    /// Copy with `from` and `to` swapped
    pub fn flipped(&self) -> Self {
        let mut copy = self.clone();
        copy.flip();
        copy
    }

    /// Interpolate the endpoints directly by an already-mapped fraction
    pub fn lerp(&self, fraction: f32) -> T {
        self.from.lerp(&self.to, fraction)
    }

    // ========================================================================
    // Curve
    // ========================================================================

    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = Some(curve);
        self
    }

    pub fn set_curve(&mut self, curve: Option<Curve>) {
        self.curve = curve;
    }

    pub fn curve(&self) -> Option<&Curve> {
        self.curve.as_ref()
    }

    /// Use `curve` only when no curve has been set on this value
    pub fn inherit_curve(&mut self, curve: Option<&Curve>) {
        if self.curve.is_none() {
            self.curve = curve.cloned();
        }
    }

    // ========================================================================
    // Offset windows
    // ========================================================================

    /// Restrict motion to `[start, end]` of the step's duration
    pub fn with_duration_offsets(mut self, start: f32, end: f32) -> Result<Self> {
        self.set_duration_offsets(start, end)?;
        Ok(self)
    }

    pub fn set_duration_offsets(&mut self, start: f32, end: f32) -> Result<()> {
        check_window(start, end)?;
        self.duration_offset_start = start;
        self.duration_offset_end = end;
        Ok(())
    }

    pub fn duration_offsets(&self) -> (f32, f32) {
        (self.duration_offset_start, self.duration_offset_end)
    }

    /// Evaluate only `[start, end]` of the curve
    pub fn with_interpolate_offsets(mut self, start: f32, end: f32) -> Result<Self> {
        self.set_interpolate_offsets(start, end)?;
        Ok(self)
    }

    pub fn set_interpolate_offsets(&mut self, start: f32, end: f32) -> Result<()> {
        check_window(start, end)?;
        self.interpolate_offset_start = start;
        self.interpolate_offset_end = end;
        Ok(())
    }

    pub fn interpolate_offsets(&self) -> (f32, f32) {
        (self.interpolate_offset_start, self.interpolate_offset_end)
    }

    /// Copy both offset windows from `other`
    pub fn copy_offsets<U: Interpolate>(&mut self, other: &AnimatedValue<U>) {
        self.duration_offset_start = other.duration_offset_start;
        self.duration_offset_end = other.duration_offset_end;
        self.interpolate_offset_start = other.interpolate_offset_start;
        self.interpolate_offset_end = other.interpolate_offset_end;
    }

    /// Map a step fraction into this value's duration window, clamped to `[0, 1]`
    pub fn local_fraction(&self, step_fraction: f32) -> f32 {
        map_range(
            step_fraction,
            self.duration_offset_start,
            self.duration_offset_end,
            0.0,
            1.0,
        )
    }

    /// Curve output for a step fraction
    pub fn eased_fraction(&self, step_fraction: f32) -> f32 {
        let local = self.local_fraction(step_fraction);
        let input = self.interpolate_offset_start
            + local * (self.interpolate_offset_end - self.interpolate_offset_start);
        match &self.curve {
            Some(curve) => curve.transform(input),
            None => input,
        }
    }

    /// Value at a step fraction
    pub fn value_at(&self, step_fraction: f32) -> T {
        self.lerp(self.eased_fraction(step_fraction))
    }

    // ========================================================================
    // Deltas
    // ========================================================================

    pub fn with_delta(mut self, delta: Delta) -> Self {
        self.delta = Some(delta);
        self
    }

    pub fn delta(&self) -> Option<Delta> {
        self.delta
    }
}

impl<T: Interpolate + PartialEq> AnimatedValue<T> {
    /// True when the endpoints differ
    pub fn can_interpolate(&self) -> bool {
        self.from != self.to
    }
}

impl<T: Interpolate + Accumulate> AnimatedValue<T> {
    /// Resolve a pending delta into `to`. The delta is consumed.
    pub fn resolve_delta(&mut self) {
        if let Some(delta) = self.delta.take() {
            self.to = self.from.accumulate(delta);
        }
    }
}

impl AnimatedValue<f32> {
    /// Absolute distance between the endpoints
    pub fn difference(&self) -> f32 {
        (self.from - self.to).abs()
    }
}

impl<T: Interpolate + Default> Default for AnimatedValue<T> {
    fn default() -> Self {
        Self::constant(T::default())
    }
}

// ============================================================================
// AnimatedValueArray
// ============================================================================

/// A keyframe list traversed evenly over the step
///
/// With `n` values the window is split into `n - 1` equal segments; the curve
/// runs once per segment.
#[derive(Clone, Debug)]
pub struct AnimatedValueArray<T: Interpolate> {
    values: Vec<T>,
    curve: Option<Curve>,
    duration_offset_start: f32,
    duration_offset_end: f32,
}

impl<T: Interpolate + PartialEq> AnimatedValueArray<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self {
            values,
            curve: None,
            duration_offset_start: 0.0,
            duration_offset_end: 1.0,
        }
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn set_values(&mut self, values: Vec<T>) {
        self.values = values;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.values.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.values.last()
    }

    /// True when there is more than one distinct value
    pub fn can_interpolate(&self) -> bool {
        match self.values.first() {
            Some(first) => self.values.iter().any(|v| v != first),
            None => false,
        }
    }

    /// Reverse traversal order
    pub fn reverse(&mut self) {
        self.values.reverse();
    }

    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = Some(curve);
        self
    }

    pub fn curve(&self) -> Option<&Curve> {
        self.curve.as_ref()
    }

    pub fn inherit_curve(&mut self, curve: Option<&Curve>) {
        if self.curve.is_none() {
            self.curve = curve.cloned();
        }
    }

    pub fn set_duration_offsets(&mut self, start: f32, end: f32) -> Result<()> {
        check_window(start, end)?;
        self.duration_offset_start = start;
        self.duration_offset_end = end;
        Ok(())
    }

    pub fn duration_offsets(&self) -> (f32, f32) {
        (self.duration_offset_start, self.duration_offset_end)
    }

    /// Value at a step fraction, `None` when the array is empty
    pub fn value_at(&self, step_fraction: f32) -> Option<T> {
        let last = self.values.len().checked_sub(1)?;
        if last == 0 {
            return self.values.first().cloned();
        }

        let local = map_range(
            step_fraction,
            self.duration_offset_start,
            self.duration_offset_end,
            0.0,
            1.0,
        );
        let position = local * last as f32;
        let index = (position.floor() as usize).min(last - 1);
        let segment = position - index as f32;
        let eased = match &self.curve {
            Some(curve) => curve.transform(segment),
            None => segment,
        };

        Some(self.values[index].lerp(&self.values[index + 1], eased))
    }
}

impl AnimatedValueArray<f32> {
    /// Sum of the values
    pub fn relative_sum(&self) -> f32 {
        self.values.iter().sum()
    }

    /// Sum of the absolute values
    pub fn absolute_sum(&self) -> f32 {
        self.values.iter().map(|v| v.abs()).sum()
    }
}
