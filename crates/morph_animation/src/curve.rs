//! Easing curves
//!
//! A [`Curve`] maps an input fraction in `[0, 1]` to an output fraction. Output
//! may leave `[0, 1]` (spring and elastic curves overshoot) and is never clamped.
//!
//! ## Built-in curves
//!
//! - [`Curve::Linear`] - identity
//! - [`Curve::CubicBezier`] - CSS-style cubic bezier, with the material presets
//!   [`Curve::STANDARD`], [`Curve::INCOMING`] and [`Curve::OUTGOING`]
//! - [`Curve::Spring`] / [`Curve::ElasticOut`] - damped sinusoid
//!   `2^(-10f) * sin(2π(f - factor/4) / factor) + 1`
//! - [`Curve::Reversed`] - `1 - f`
//! - [`Curve::Shared`] - a window `[start, end]` of a base curve renormalized to `[0, 1]`
//!
//! ## Example
//!
//! ```rust
//! use morph_animation::Curve;
//!
//! // Reuse the second half of the standard curve on its own step
//! let tail = Curve::shared(Curve::STANDARD, 0.5, 1.0);
//! assert_eq!(tail.transform(0.0), 0.0);
//! assert!((tail.transform(1.0) - 1.0).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::sync::Arc;

/// Default oscillation factor for spring and elastic curves
pub const DEFAULT_SPRING_FACTOR: f32 = 0.3;

/// An easing curve
#[derive(Clone)]
pub enum Curve {
    /// Identity
    Linear,
    /// Cubic bezier with control points (x1, y1) and (x2, y2)
    CubicBezier(f32, f32, f32, f32),
    /// Damped sinusoid settling at 1
    Spring { factor: f32 },
    /// Elastic ease-out (same closed form as the spring)
    ElasticOut { factor: f32 },
    /// `1 - f`
    Reversed,
    /// Window of a base curve, renormalized so the window maps to `[0, 1]`
    Shared {
        base: Box<Curve>,
        start: f32,
        end: f32,
    },
    /// User-defined curve
    Custom(Arc<dyn Fn(f32) -> f32 + Send + Sync>),
}

impl Curve {
    /// Material standard curve
    pub const STANDARD: Curve = Curve::CubicBezier(0.4, 0.0, 0.2, 1.0);
    /// Material incoming (decelerate) curve
    pub const INCOMING: Curve = Curve::CubicBezier(0.0, 0.0, 0.2, 1.0);
    /// Material outgoing (accelerate) curve
    pub const OUTGOING: Curve = Curve::CubicBezier(0.4, 0.0, 1.0, 1.0);

    pub const QUART_OUT: Curve = Curve::CubicBezier(0.165, 0.84, 0.44, 1.0);
    pub const QUART_IN_OUT: Curve = Curve::CubicBezier(0.77, 0.0, 0.175, 1.0);
    pub const CIRC_IN: Curve = Curve::CubicBezier(0.6, 0.04, 0.98, 0.335);
    pub const CIRC_OUT: Curve = Curve::CubicBezier(0.075, 0.82, 0.165, 1.0);
    pub const CIRC_IN_OUT: Curve = Curve::CubicBezier(0.785, 0.135, 0.15, 0.86);
    pub const EXP_OUT: Curve = Curve::CubicBezier(0.19, 1.0, 0.22, 1.0);
    pub const EXP_IN_OUT: Curve = Curve::CubicBezier(1.0, 0.0, 0.0, 1.0);
    pub const QUINT_IN_OUT: Curve = Curve::CubicBezier(0.86, 0.0, 0.07, 1.0);
    pub const CUBIC_IN_OUT: Curve = Curve::CubicBezier(0.645, 0.045, 0.355, 1.0);
    pub const FAST_OUT_SLOW_IN: Curve = Curve::CubicBezier(0.065, 0.85, 0.18, 1.0);

    pub const SPRING: Curve = Curve::Spring {
        factor: DEFAULT_SPRING_FACTOR,
    };
    pub const ELASTIC_OUT: Curve = Curve::ElasticOut {
        factor: DEFAULT_SPRING_FACTOR,
    };

    /// Evaluate the curve at `fraction`
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Curve::Linear => fraction,
            Curve::CubicBezier(x1, y1, x2, y2) => cubic_bezier(fraction, *x1, *y1, *x2, *y2),
            Curve::Spring { factor } | Curve::ElasticOut { factor } => {
                damped_sine(fraction, *factor)
            }
            Curve::Reversed => 1.0 - fraction,
            Curve::Shared { base, start, end } => {
                let offset = base.transform(*start);
                let x_ratio = end - start;
                let y_ratio = base.transform(*end) - offset;
                if y_ratio == 0.0 {
                    return fraction;
                }
                (base.transform(start + fraction * x_ratio) - offset) / y_ratio
            }
            Curve::Custom(f) => f(fraction),
        }
    }

    /// Reuse the `[start, end]` window of `base` as a full curve
    pub fn shared(base: Curve, start: f32, end: f32) -> Self {
        Curve::Shared {
            base: Box::new(base),
            start,
            end,
        }
    }

    /// Create a curve from a closure
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f32) -> f32 + Send + Sync + 'static,
    {
        Curve::Custom(Arc::new(f))
    }

    pub fn is_linear(&self) -> bool {
        matches!(self, Curve::Linear)
    }
}

impl Default for Curve {
    fn default() -> Self {
        Curve::Linear
    }
}

impl std::fmt::Debug for Curve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Curve::Linear => write!(f, "Linear"),
            Curve::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "CubicBezier({}, {}, {}, {})", x1, y1, x2, y2)
            }
            Curve::Spring { factor } => write!(f, "Spring({})", factor),
            Curve::ElasticOut { factor } => write!(f, "ElasticOut({})", factor),
            Curve::Reversed => write!(f, "Reversed"),
            Curve::Shared { base, start, end } => {
                write!(f, "Shared({:?}, {}..{})", base, start, end)
            }
            Curve::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// Curves addressable by name from configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveName {
    Linear,
    #[default]
    Standard,
    Incoming,
    Outgoing,
    QuartOut,
    QuartInOut,
    CircIn,
    CircOut,
    CircInOut,
    ExpOut,
    ExpInOut,
    QuintInOut,
    CubicInOut,
    FastOutSlowIn,
    Spring,
    ElasticOut,
    Reversed,
}

impl From<CurveName> for Curve {
    fn from(name: CurveName) -> Self {
        match name {
            CurveName::Linear => Curve::Linear,
            CurveName::Standard => Curve::STANDARD,
            CurveName::Incoming => Curve::INCOMING,
            CurveName::Outgoing => Curve::OUTGOING,
            CurveName::QuartOut => Curve::QUART_OUT,
            CurveName::QuartInOut => Curve::QUART_IN_OUT,
            CurveName::CircIn => Curve::CIRC_IN,
            CurveName::CircOut => Curve::CIRC_OUT,
            CurveName::CircInOut => Curve::CIRC_IN_OUT,
            CurveName::ExpOut => Curve::EXP_OUT,
            CurveName::ExpInOut => Curve::EXP_IN_OUT,
            CurveName::QuintInOut => Curve::QUINT_IN_OUT,
            CurveName::CubicInOut => Curve::CUBIC_IN_OUT,
            CurveName::FastOutSlowIn => Curve::FAST_OUT_SLOW_IN,
            CurveName::Spring => Curve::SPRING,
            CurveName::ElasticOut => Curve::ELASTIC_OUT,
            CurveName::Reversed => Curve::Reversed,
        }
    }
}

// ============================================================================
// Curve functions
// ============================================================================

fn damped_sine(f: f32, factor: f32) -> f32 {
    2f32.powf(-10.0 * f) * (2.0 * PI * (f - factor / 4.0) / factor).sin() + 1.0
}

/// Solve the bezier for `t` given `x`, then evaluate `y`.
/// Newton-Raphson first, bisection when the slope is too flat to converge.
fn cubic_bezier(x: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let mut t = x;
    for _ in 0..8 {
        let error = bezier_component(t, x1, x2) - x;
        if error.abs() < 1e-6 {
            return bezier_component(t, y1, y2);
        }
        let slope = bezier_slope(t, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        t -= error / slope;
    }

    let (mut low, mut high) = (0.0_f32, 1.0_f32);
    t = x;
    for _ in 0..32 {
        let current = bezier_component(t, x1, x2);
        if (current - x).abs() < 1e-6 {
            break;
        }
        if current < x {
            low = t;
        } else {
            high = t;
        }
        t = (low + high) / 2.0;
    }
    bezier_component(t, y1, y2)
}

fn bezier_component(t: f32, p1: f32, p2: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

fn bezier_slope(t: f32, p1: f32, p2: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_linear() {
        assert_eq!(Curve::Linear.transform(0.0), 0.0);
        assert_eq!(Curve::Linear.transform(0.5), 0.5);
        assert_eq!(Curve::Linear.transform(1.0), 1.0);
    }

    #[test]
    fn test_material_curves_hit_endpoints() {
        for curve in [Curve::STANDARD, Curve::INCOMING, Curve::OUTGOING, Curve::EXP_IN_OUT] {
            assert_eq!(curve.transform(0.0), 0.0);
            assert_eq!(curve.transform(1.0), 1.0);
        }
    }

    #[test]
    fn test_bezier_is_monotonic() {
        for curve in [Curve::STANDARD, Curve::CIRC_IN, Curve::EXP_IN_OUT] {
            let mut last = 0.0;
            for step in 1..=100 {
                let value = curve.transform(step as f32 / 100.0);
                assert!(value + 1e-4 >= last, "{:?} dipped at {}", curve, step);
                last = value;
            }
        }
    }

    #[test]
    fn test_incoming_decelerates() {
        assert!(Curve::INCOMING.transform(0.5) > 0.5);
        assert!(Curve::OUTGOING.transform(0.5) < 0.5);
    }

    #[test]
    fn test_spring_overshoots_unclamped() {
        assert!(approx(Curve::SPRING.transform(0.0), 0.0));
        assert!(approx(Curve::SPRING.transform(0.2), 1.125));
        assert!(Curve::ELASTIC_OUT.transform(0.2) > 1.0);
        assert!(approx(Curve::SPRING.transform(1.0), 1.0));
    }

    #[test]
    fn test_reversed() {
        assert_eq!(Curve::Reversed.transform(0.0), 1.0);
        assert_eq!(Curve::Reversed.transform(0.25), 0.75);
    }

    #[test]
    fn test_shared_renormalizes_window() {
        let linear_window = Curve::shared(Curve::Linear, 0.25, 0.75);
        assert!(approx(linear_window.transform(0.0), 0.0));
        assert!(approx(linear_window.transform(0.5), 0.5));
        assert!(approx(linear_window.transform(1.0), 1.0));

        let tail = Curve::shared(Curve::STANDARD, 0.5, 1.0);
        assert!(approx(tail.transform(0.0), 0.0));
        assert!(approx(tail.transform(1.0), 1.0));
    }

    #[test]
    fn test_shared_flat_window_falls_back_to_input() {
        let flat = Curve::shared(Curve::custom(|_| 0.5), 0.0, 1.0);
        assert_eq!(flat.transform(0.3), 0.3);
    }

    #[test]
    fn test_curve_names_resolve() {
        let curve: Curve = CurveName::Standard.into();
        assert!(approx(curve.transform(0.5), Curve::STANDARD.transform(0.5)));
        assert!(Curve::from(CurveName::Linear).is_linear());
    }
}
