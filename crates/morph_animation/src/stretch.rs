//! Stretch and squash deformation for translations
//!
//! While a node translates, it can be stretched along the direction of motion
//! and squashed on the perpendicular axis, then relaxed back to its natural
//! scale. The deformation runs in two linear phases over the translation's
//! progress:
//!
//! - **stretch**: progress in `[0, stretch_offset)` scales from 1 towards the peak
//! - **relax**: progress in `[stretch_offset, 1]` scales back to 1
//!
//! Progress is measured from the node's current translation, not from the
//! step fraction, so curves on the translation shape the deformation as well.
//! The pivot on the motion axis is moved to `size * (1 - stretch_offset)` so the
//! trailing edge stays anchored while stretching.

use crate::error::{check_window, Result, ValueError};
use crate::values::AnimatedFloatValue;
use morph_core::{map_range, Axis, Direction, GeometryError};

/// Stretch and squash settings for one translation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stretch {
    /// Fraction of the motion spent stretching; 0 disables the effect
    pub stretch_offset: f32,
    /// Multiplier applied to the travelled distance
    pub amount: f32,
    /// How much the perpendicular axis shrinks at peak stretch
    pub squash: f32,
    /// Start of the active progress window
    pub start_offset: f32,
    /// End of the active progress window
    pub end_offset: f32,
    /// Explicit direction; derived from the translation when `None`
    pub direction: Option<Direction>,
}

/// Scale and pivot writes produced for one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StretchFrame {
    /// Axis the pivot applies to
    pub axis: Axis,
    /// Pivot coordinate on `axis`
    pub pivot: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Stretch {
    pub fn new(stretch_offset: f32, amount: f32, squash: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&stretch_offset) {
            return Err(ValueError::OffsetOutOfRange(stretch_offset));
        }
        if !(0.0..=1.0).contains(&squash) {
            return Err(ValueError::OffsetOutOfRange(squash));
        }
        Ok(Self {
            stretch_offset,
            amount,
            squash,
            start_offset: 0.0,
            end_offset: 1.0,
            direction: None,
        })
    }

    /// Restrict the effect to a window of the translation's progress
    pub fn with_offsets(mut self, start: f32, end: f32) -> Result<Self> {
        check_window(start, end)?;
        self.start_offset = start;
        self.end_offset = end;
        Ok(self)
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Direction of the effect for a translation along `axis`
    pub fn direction_for(&self, axis: Axis, translation: &AnimatedFloatValue) -> Direction {
        self.direction
            .unwrap_or_else(|| Direction::of_delta(axis, translation.from, translation.to))
    }

    /// Deformation for the node's current translation.
    ///
    /// `width` and `height` are the node's unscaled size. Returns `Ok(None)` when
    /// the effect does not apply this frame: a zero stretch offset, no direction,
    /// or a stretch offset of 1 once the stretch phase is over.
    pub fn deform(
        &self,
        axis: Axis,
        translation: &AnimatedFloatValue,
        current: f32,
        width: f32,
        height: f32,
    ) -> morph_core::Result<Option<StretchFrame>> {
        if self.stretch_offset == 0.0 {
            return Ok(None);
        }

        let direction = self.direction_for(axis, translation);
        let motion_axis = match direction.axis() {
            Some(motion_axis) => motion_axis,
            None => return Ok(None),
        };

        let size = match motion_axis {
            Axis::Vertical => height,
            Axis::Horizontal => width,
        };
        if size <= 0.0 {
            return Err(GeometryError::Degenerate(format!(
                "cannot stretch a node with size {} along {:?}",
                size, motion_axis
            )));
        }

        let progress = map_range(current, translation.from, translation.to, 0.0, 1.0);
        let stretch_map = map_range(progress, self.start_offset, self.end_offset, 0.0, 1.0);

        let peak = ((translation.difference() - size).abs() * self.amount + size) / size;
        let squashed = 1.0 - self.squash;

        let (along, across) = if stretch_map < self.stretch_offset {
            let fraction = map_range(stretch_map, 0.0, self.stretch_offset, 0.0, 1.0);
            (
                1.0 + (peak - 1.0) * fraction,
                1.0 + (squashed - 1.0) * fraction,
            )
        } else {
            if self.stretch_offset == 1.0 {
                return Ok(None);
            }
            let fraction = map_range(stretch_map, self.stretch_offset, 1.0, 0.0, 1.0);
            (
                peak + (1.0 - peak) * fraction,
                squashed + (1.0 - squashed) * fraction,
            )
        };

        let pivot = size * (1.0 - self.stretch_offset);
        let frame = match motion_axis {
            Axis::Vertical => StretchFrame {
                axis: motion_axis,
                pivot,
                scale_x: across,
                scale_y: along,
            },
            Axis::Horizontal => StretchFrame {
                axis: motion_axis,
                pivot,
                scale_x: along,
                scale_y: across,
            },
        };
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn vertical_drop() -> AnimatedFloatValue {
        AnimatedFloatValue::new(0.0, 200.0)
    }

    #[test]
    fn test_zero_offset_has_no_effect() {
        let stretch = Stretch::new(0.0, 0.5, 0.2).unwrap();
        let frame = stretch
            .deform(Axis::Vertical, &vertical_drop(), 50.0, 100.0, 100.0)
            .unwrap();
        assert_eq!(frame, None);
    }

    #[test]
    fn test_no_motion_has_no_effect() {
        let stretch = Stretch::new(0.5, 0.5, 0.2).unwrap();
        let still = AnimatedFloatValue::constant(10.0);
        assert_eq!(stretch.direction_for(Axis::Vertical, &still), Direction::None);
        assert_eq!(
            stretch
                .deform(Axis::Vertical, &still, 10.0, 100.0, 100.0)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_direction_from_delta() {
        let stretch = Stretch::new(0.5, 0.5, 0.2).unwrap();
        let left = AnimatedFloatValue::new(100.0, 0.0);

        assert_eq!(stretch.direction_for(Axis::Vertical, &vertical_drop()), Direction::Down);
        assert_eq!(stretch.direction_for(Axis::Horizontal, &left), Direction::Left);
        assert_eq!(
            stretch
                .with_direction(Direction::Up)
                .direction_for(Axis::Vertical, &vertical_drop()),
            Direction::Up
        );
    }

    #[test]
    fn test_stretch_phase() {
        let stretch = Stretch::new(0.5, 0.5, 0.2).unwrap();
        let frame = stretch
            .deform(Axis::Vertical, &vertical_drop(), 50.0, 100.0, 100.0)
            .unwrap()
            .unwrap();

        // peak = (|200 - 100| * 0.5 + 100) / 100 = 1.5, halfway into the stretch phase
        assert!(approx(frame.scale_y, 1.25));
        assert!(approx(frame.scale_x, 0.9));
        assert_eq!(frame.axis, Axis::Vertical);
        assert!(approx(frame.pivot, 50.0));
    }

    #[test]
    fn test_relax_phase_returns_to_rest() {
        let stretch = Stretch::new(0.5, 0.5, 0.2).unwrap();

        let mid = stretch
            .deform(Axis::Vertical, &vertical_drop(), 150.0, 100.0, 100.0)
            .unwrap()
            .unwrap();
        assert!(approx(mid.scale_y, 1.25));
        assert!(approx(mid.scale_x, 0.9));

        let end = stretch
            .deform(Axis::Vertical, &vertical_drop(), 200.0, 100.0, 100.0)
            .unwrap()
            .unwrap();
        assert!(approx(end.scale_y, 1.0));
        assert!(approx(end.scale_x, 1.0));
    }

    #[test]
    fn test_full_offset_skips_relax() {
        let stretch = Stretch::new(1.0, 0.5, 0.2).unwrap();
        let end = stretch
            .deform(Axis::Vertical, &vertical_drop(), 200.0, 100.0, 100.0)
            .unwrap();
        assert_eq!(end, None);
    }

    #[test]
    fn test_horizontal_uses_width() {
        let stretch = Stretch::new(0.5, 1.0, 0.0).unwrap();
        let right = AnimatedFloatValue::new(0.0, 150.0);
        let frame = stretch
            .deform(Axis::Horizontal, &right, 37.5, 50.0, 200.0)
            .unwrap()
            .unwrap();

        // peak = (|150 - 50| * 1 + 50) / 50 = 3
        assert!(approx(frame.scale_x, 2.0));
        assert!(approx(frame.scale_y, 1.0));
        assert!(approx(frame.pivot, 25.0));
    }

    #[test]
    fn test_zero_size_is_degenerate() {
        let stretch = Stretch::new(0.5, 0.5, 0.2).unwrap();
        assert!(stretch
            .deform(Axis::Vertical, &vertical_drop(), 50.0, 100.0, 0.0)
            .is_err());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(Stretch::new(1.5, 0.5, 0.2).is_err());
        assert!(Stretch::new(0.5, 0.5, -0.1).is_err());
        assert!(Stretch::new(0.5, 0.5, 0.2)
            .unwrap()
            .with_offsets(0.9, 0.1)
            .is_err());
    }
}
