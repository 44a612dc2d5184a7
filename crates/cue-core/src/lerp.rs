//! Linear interpolation over animatable values.

use crate::value::{Color, Thickness, Value};

/// Types that can be linearly interpolated.
///
/// `x = 0.0` yields `self`, `x = 1.0` yields `to`; values outside `[0,1]`
/// extrapolate for numeric types.
pub trait Lerp: Sized {
    fn lerp(&self, to: &Self, x: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(&self, to: &Self, x: f64) -> Self {
        self + (to - self) * x
    }
}

impl Lerp for Color {
    /// Componentwise interpolation; channels are clamped to `[0,1]` after
    /// interpolating so eased overshoot cannot produce out-of-range colors.
    fn lerp(&self, to: &Self, x: f64) -> Self {
        Color {
            r: self.r.lerp(&to.r, x),
            g: self.g.lerp(&to.g, x),
            b: self.b.lerp(&to.b, x),
            a: self.a.lerp(&to.a, x),
        }
        .clamped()
    }
}

impl Lerp for Thickness {
    fn lerp(&self, to: &Self, x: f64) -> Self {
        Thickness {
            left: self.left.lerp(&to.left, x),
            top: self.top.lerp(&to.top, x),
            right: self.right.lerp(&to.right, x),
            bottom: self.bottom.lerp(&to.bottom, x),
        }
    }
}

impl Lerp for Value {
    /// Same-kind numeric values interpolate componentwise; the discrete-only
    /// kinds snap to the target at `x >= 1.0`. Mismatched kinds return `self`
    /// unchanged (builders reject mixed kinds before playback).
    fn lerp(&self, to: &Self, x: f64) -> Self {
        match (self, to) {
            (Value::Float { value: a }, Value::Float { value: b }) => Value::Float {
                value: a.lerp(b, x),
            },
            (Value::Color { color: a }, Value::Color { color: b }) => Value::Color {
                color: a.lerp(b, x),
            },
            (Value::Thickness { thickness: a }, Value::Thickness { thickness: b }) => {
                Value::Thickness {
                    thickness: a.lerp(b, x),
                }
            }
            (Value::Bool { .. }, Value::Bool { .. })
            | (Value::Text { .. }, Value::Text { .. }) => {
                if x >= 1.0 {
                    to.clone()
                } else {
                    self.clone()
                }
            }
            _ => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn float_lerp() {
        assert!(approx_eq(0.0_f64.lerp(&10.0, 0.0), 0.0));
        assert!(approx_eq(0.0_f64.lerp(&10.0, 0.5), 5.0));
        assert!(approx_eq(0.0_f64.lerp(&10.0, 1.0), 10.0));
        assert!(approx_eq((-50.0_f64).lerp(&50.0, 0.5), 0.0));
    }

    #[test]
    fn float_extrapolates() {
        assert!(approx_eq(0.0_f64.lerp(&10.0, 1.5), 15.0));
        assert!(approx_eq(0.0_f64.lerp(&10.0, -0.5), -5.0));
    }

    #[test]
    fn color_lerp_midpoint() {
        let red = Color::rgb(1.0, 0.0, 0.0);
        let blue = Color::rgb(0.0, 0.0, 1.0);
        let mid = red.lerp(&blue, 0.5);
        assert!(approx_eq(mid.r, 0.5));
        assert!(approx_eq(mid.g, 0.0));
        assert!(approx_eq(mid.b, 0.5));
        assert!(approx_eq(mid.a, 1.0));
    }

    #[test]
    fn color_lerp_clamps_overshoot() {
        let dark = Color::rgb(0.0, 0.0, 0.0);
        let bright = Color::rgb(1.0, 1.0, 1.0);
        // Extrapolated interpolation beyond the end must stay in range.
        let past = dark.lerp(&bright, 1.4);
        assert_eq!(past, Color::rgb(1.0, 1.0, 1.0));
        let before = dark.lerp(&bright, -0.4);
        assert_eq!(before, Color::rgba(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn thickness_lerp() {
        let from = Thickness::uniform(0.0);
        let to = Thickness::new(20.0, 40.0, 60.0, 80.0);
        let mid = from.lerp(&to, 0.5);
        assert_eq!(mid, Thickness::new(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn value_lerp_same_kind() {
        let from: Value = 0.0.into();
        let to: Value = 100.0.into();
        assert_eq!(from.lerp(&to, 0.5).as_float(), Some(50.0));
    }

    #[test]
    fn discrete_kinds_snap_at_end() {
        let from: Value = false.into();
        let to: Value = true.into();
        assert_eq!(from.lerp(&to, 0.99).as_bool(), Some(false));
        assert_eq!(from.lerp(&to, 1.0).as_bool(), Some(true));

        let from: Value = "a".into();
        let to: Value = "b".into();
        assert_eq!(from.lerp(&to, 0.5).as_text(), Some("a"));
        assert_eq!(from.lerp(&to, 1.0).as_text(), Some("b"));
    }

    #[test]
    fn mismatched_kinds_keep_self() {
        let from: Value = 50.0.into();
        let to: Value = Color::rgb(1.0, 0.0, 0.0).into();
        assert_eq!(from.lerp(&to, 0.5).as_float(), Some(50.0));
    }
}
