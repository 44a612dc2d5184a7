//! Easing functions for animation timing.
//!
//! A closed set of CSS-compatible timing functions plus custom cubic beziers
//! and stepped curves. All evaluation is in `f64` to match the engine's
//! progress values.

use serde::{Deserialize, Serialize};

/// Where the jump happens in a stepped easing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPosition {
    /// Jump at the start of each interval.
    Start,
    /// Jump at the end of each interval.
    #[default]
    End,
    /// Jump at both ends.
    Both,
    /// No jump at either end.
    None,
}

/// Progress-shaping function applied to an animation's local progress.
///
/// Maps `t` in `[0,1]` to an eased value; custom beziers may overshoot the
/// unit range, which callers are expected to gate on.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Easing {
    /// Identity; constant velocity.
    #[default]
    Linear,
    /// CSS `ease`: `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    Ease,
    /// CSS `ease-in`: `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,
    /// CSS `ease-out`: `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,
    /// CSS `ease-in-out`: `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,
    /// Custom cubic bezier; x control points must stay in `[0,1]`.
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// Discrete staircase with `count` intervals.
    Steps { count: u32, position: StepPosition },
}

impl Easing {
    /// Evaluate at progress `t`. Input is clamped to `[0,1]`.
    pub fn ease(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Ease => bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => bezier(*x1, *y1, *x2, *y2, t),
            Self::Steps { count, position } => stepped(*count, *position, t),
        }
    }

    /// Custom cubic bezier easing.
    ///
    /// # Panics
    /// Panics when `x1` or `x2` fall outside `[0,1]`.
    pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2),
            "bezier x control points must be in [0, 1]"
        );
        Self::CubicBezier { x1, y1, x2, y2 }
    }

    /// Stepped easing with `count` intervals.
    ///
    /// # Panics
    /// Panics when `count` is zero.
    pub fn steps(count: u32, position: StepPosition) -> Self {
        assert!(count >= 1, "steps require at least one interval");
        Self::Steps { count, position }
    }
}

/// Evaluate a unit cubic bezier at `progress` by solving the x polynomial for
/// the curve parameter, then sampling y there.
fn bezier(x1: f64, y1: f64, x2: f64, y2: f64, progress: f64) -> f64 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }
    let u = solve_curve_x(x1, x2, progress);
    sample(y1, y2, u)
}

/// Newton-Raphson on `x(u) = progress`.
fn solve_curve_x(x1: f64, x2: f64, progress: f64) -> f64 {
    let mut u = progress;
    for _ in 0..8 {
        let error = sample(x1, x2, u) - progress;
        if error.abs() < 1e-7 {
            break;
        }
        let slope = sample_derivative(x1, x2, u);
        if slope.abs() < 1e-7 {
            break;
        }
        u = (u - error / slope).clamp(0.0, 1.0);
    }
    u
}

/// One-dimensional bezier polynomial with endpoints 0 and 1:
/// `b(u) = 3(1-u)²u·c1 + 3(1-u)u²·c2 + u³`.
fn sample(c1: f64, c2: f64, u: f64) -> f64 {
    let v = 1.0 - u;
    3.0 * v * v * u * c1 + 3.0 * v * u * u * c2 + u * u * u
}

fn sample_derivative(c1: f64, c2: f64, u: f64) -> f64 {
    let v = 1.0 - u;
    3.0 * v * v * c1 + 6.0 * v * u * (c2 - c1) + 3.0 * u * u * (1.0 - c2)
}

fn stepped(count: u32, position: StepPosition, t: f64) -> f64 {
    if count == 0 {
        return t;
    }
    let steps = f64::from(count);
    match position {
        StepPosition::Start => (t * steps).ceil() / steps,
        StepPosition::End => (t * steps).floor() / steps,
        StepPosition::Both => ((t * (steps + 1.0)).floor() / steps).min(1.0),
        StepPosition::None => {
            if count == 1 {
                0.5
            } else {
                ((t * steps).floor() / (steps - 1.0)).min(1.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-3;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn linear_is_identity() {
        let e = Easing::Linear;
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert!(approx_eq(e.ease(t), t));
        }
    }

    #[test]
    fn input_is_clamped() {
        assert!(approx_eq(Easing::Linear.ease(-0.5), 0.0));
        assert!(approx_eq(Easing::Linear.ease(1.5), 1.0));
        assert!(approx_eq(Easing::Ease.ease(2.0), 1.0));
    }

    #[test]
    fn css_curves_hit_endpoints() {
        for e in [Easing::Ease, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert!(approx_eq(e.ease(0.0), 0.0));
            assert!(approx_eq(e.ease(1.0), 1.0));
        }
    }

    #[test]
    fn ease_in_starts_slow() {
        assert!(Easing::EaseIn.ease(0.25) < 0.25);
        assert!(Easing::EaseIn.ease(0.5) < 0.5);
    }

    #[test]
    fn ease_out_starts_fast() {
        assert!(Easing::EaseOut.ease(0.25) > 0.25);
        assert!(Easing::EaseOut.ease(0.5) > 0.5);
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        let e = Easing::EaseInOut;
        assert!(approx_eq(e.ease(0.5), 0.5));
        assert!(approx_eq(e.ease(0.25) + e.ease(0.75), 1.0));
    }

    #[test]
    fn ease_is_monotonic() {
        let e = Easing::Ease;
        let mut last = 0.0;
        for i in 1..=100 {
            let v = e.ease(f64::from(i) / 100.0);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn custom_bezier_linear_equivalent() {
        let e = Easing::cubic_bezier(0.0, 0.0, 1.0, 1.0);
        assert!(approx_eq(e.ease(0.3), 0.3));
        assert!(approx_eq(e.ease(0.7), 0.7));
    }

    #[test]
    fn custom_bezier_can_overshoot() {
        // y control points above 1 push the curve past the unit range.
        let e = Easing::cubic_bezier(0.3, 1.6, 0.7, 1.6);
        let peak = (1..100)
            .map(|i| e.ease(f64::from(i) / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn steps_end_floor() {
        let e = Easing::steps(4, StepPosition::End);
        assert!(approx_eq(e.ease(0.0), 0.0));
        assert!(approx_eq(e.ease(0.24), 0.0));
        assert!(approx_eq(e.ease(0.25), 0.25));
        assert!(approx_eq(e.ease(0.99), 0.75));
        assert!(approx_eq(e.ease(1.0), 1.0));
    }

    #[test]
    fn steps_start_ceil() {
        let e = Easing::steps(4, StepPosition::Start);
        assert!(approx_eq(e.ease(0.0), 0.0));
        assert!(approx_eq(e.ease(0.01), 0.25));
        assert!(approx_eq(e.ease(0.26), 0.5));
        assert!(approx_eq(e.ease(1.0), 1.0));
    }

    #[test]
    #[should_panic(expected = "bezier x control points")]
    fn invalid_bezier_panics() {
        Easing::cubic_bezier(-0.1, 0.0, 0.5, 1.0);
    }

    #[test]
    #[should_panic(expected = "at least one interval")]
    fn zero_steps_panics() {
        Easing::steps(0, StepPosition::End);
    }
}
