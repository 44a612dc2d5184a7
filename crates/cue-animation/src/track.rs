//! Animation shapes and their per-play state.
//!
//! [`Track`] is the closed set of ways an animation changes a property:
//! linear from/to interpolation, an ordered keyframe sequence, or an
//! instantaneous apply. Each play of a track owns exactly one [`PlayState`]
//! capturing the "before" values; states are never shared or reused across
//! plays.

use std::fmt;
use std::time::Duration as StdDuration;

use cue_core::{
    AnimationError, FillBehavior, Lerp, PropertyKey, PropertyTarget, TargetRef, Value,
    ValueKind,
};

use crate::keyframe::{Keyframe, KeyframeKind};

/// The shape of an animation unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Track {
    /// Interpolate from `from` (or the captured current value when `None`)
    /// to `to`.
    Linear { from: Option<Value>, to: Value },
    /// Ordered keyframe sequence; each keyframe owns a sub-window of the
    /// unit's duration.
    Keyframes { keyframes: Vec<Keyframe> },
    /// Write `value` once the unit's window is reached.
    Apply { value: Value },
}

/// Captured "before" values for one in-flight play of one track.
pub struct PlayState {
    target: TargetRef,
    stored: Value,
    shape: ShapeState,
}

impl fmt::Debug for PlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayState")
            .field("stored", &self.stored)
            .field("shape", &self.shape)
            .finish()
    }
}

#[derive(Debug)]
enum ShapeState {
    Linear {
        /// Resolved starting value: the explicit `from` or the stored value.
        from: Value,
    },
    Keyframes {
        /// Running previous-keyframe value threaded through updates.
        previous: Value,
    },
    Apply,
}

impl PlayState {
    /// The originally captured property value.
    pub fn stored(&self) -> &Value {
        &self.stored
    }

    pub fn target(&self) -> &TargetRef {
        &self.target
    }
}

impl Track {
    /// The value kind this track writes, when it has one (an empty keyframe
    /// sequence has none).
    pub fn value_kind(&self) -> Option<ValueKind> {
        match self {
            Self::Linear { to, .. } => Some(to.kind()),
            Self::Keyframes { keyframes } => keyframes.first().map(|kf| kf.value.kind()),
            Self::Apply { value } => Some(value.kind()),
        }
    }

    /// Read the current property value off `target` and capture the state
    /// this play will run against.
    pub(crate) fn capture(
        &self,
        target: &TargetRef,
        property: PropertyKey,
    ) -> Result<PlayState, AnimationError> {
        let current = target
            .borrow()
            .read(property)
            .ok_or(AnimationError::MissingProperty { property })?;

        if let Some(expected) = self.value_kind() {
            if current.kind() != expected {
                return Err(AnimationError::KindMismatch {
                    property,
                    expected,
                    found: current.kind(),
                });
            }
        }

        let shape = match self {
            Self::Linear { from, .. } => ShapeState::Linear {
                from: from.clone().unwrap_or_else(|| current.clone()),
            },
            Self::Keyframes { .. } => ShapeState::Keyframes {
                previous: current.clone(),
            },
            Self::Apply { .. } => ShapeState::Apply,
        };

        Ok(PlayState {
            target: target.clone(),
            stored: current,
            shape,
        })
    }

    /// Apply one update at local progress `x` (relative to the unit's own
    /// duration, `[0,1]` after easing).
    pub(crate) fn update(
        &self,
        x: f64,
        unit_duration: StdDuration,
        property: PropertyKey,
        state: &mut PlayState,
    ) -> Result<(), AnimationError> {
        match (self, &mut state.shape) {
            (Self::Linear { to, .. }, ShapeState::Linear { from }) => {
                let value = from.lerp(to, x);
                state.target.borrow_mut().write(property, value);
                Ok(())
            }
            (Self::Keyframes { keyframes }, ShapeState::Keyframes { previous }) => {
                let total_ms = unit_duration.as_secs_f64() * 1_000.0;
                for (i, keyframe) in keyframes.iter().enumerate() {
                    let x1 = keyframe.key_time.as_secs_f64() * 1_000.0 / total_ms;
                    if x < x1 {
                        continue;
                    }
                    let x2 = match keyframes.get(i + 1) {
                        Some(next) => next.key_time.as_secs_f64() * 1_000.0 / total_ms,
                        None => 1.0,
                    };
                    if x > x2 {
                        continue;
                    }
                    let mut t = (x - x1) / (x2 - x1);
                    if t.is_nan() {
                        t = 1.0;
                    }

                    *previous = match i.checked_sub(1) {
                        Some(prev) => keyframes[prev].value.clone(),
                        None => state.stored.clone(),
                    };
                    let value = match keyframe.kind {
                        KeyframeKind::Discrete => keyframe.value.clone(),
                        KeyframeKind::Linear => previous.lerp(&keyframe.value, t),
                    };
                    state.target.borrow_mut().write(property, value);
                }
                Ok(())
            }
            (Self::Apply { value }, ShapeState::Apply) => {
                state.target.borrow_mut().write(property, value.clone());
                Ok(())
            }
            _ => Err(AnimationError::ForeignState),
        }
    }

    /// End-of-window handling: `Stop` writes the stored value back, `HoldEnd`
    /// leaves the final interpolated value in place.
    pub(crate) fn restore(
        &self,
        fill: FillBehavior,
        property: PropertyKey,
        state: &mut PlayState,
    ) -> Result<(), AnimationError> {
        let matches = matches!(
            (self, &state.shape),
            (Self::Linear { .. }, ShapeState::Linear { .. })
                | (Self::Keyframes { .. }, ShapeState::Keyframes { .. })
                | (Self::Apply { .. }, ShapeState::Apply)
        );
        if !matches {
            return Err(AnimationError::ForeignState);
        }
        if fill == FillBehavior::Stop {
            let stored = state.stored.clone();
            state.target.borrow_mut().write(property, stored);
        }
        Ok(())
    }
}
