//! Keyframes for keyframed animation units.

use std::time::Duration as StdDuration;

use serde::{Deserialize, Serialize};

use cue_core::Value;

/// How a keyframe reaches its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyframeKind {
    /// Snap to the value for the whole window.
    Discrete,
    /// Interpolate from the previous keyframe's value (or the captured
    /// starting value for the first keyframe) to this one's.
    #[default]
    Linear,
}

/// A `(time, value)` pair inside a keyframed animation.
///
/// `key_time` is an offset within the owning animation's single-run duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub key_time: StdDuration,
    pub value: Value,
    pub kind: KeyframeKind,
}

impl Keyframe {
    pub fn discrete(key_time: StdDuration, value: impl Into<Value>) -> Self {
        Self {
            key_time,
            value: value.into(),
            kind: KeyframeKind::Discrete,
        }
    }

    pub fn linear(key_time: StdDuration, value: impl Into<Value>) -> Self {
        Self {
            key_time,
            value: value.into(),
            kind: KeyframeKind::Linear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_kind() {
        let kf = Keyframe::discrete(StdDuration::ZERO, 1.0);
        assert_eq!(kf.kind, KeyframeKind::Discrete);
        assert_eq!(kf.value.as_float(), Some(1.0));

        let kf = Keyframe::linear(StdDuration::from_millis(500), 2.0);
        assert_eq!(kf.kind, KeyframeKind::Linear);
        assert_eq!(kf.key_time, StdDuration::from_millis(500));
    }
}
