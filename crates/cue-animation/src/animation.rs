//! The atomic animation unit and its builder.

use std::fmt;
use std::time::Duration as StdDuration;

use cue_core::{
    AnimationError, Duration, Easing, FillBehavior, PropertyKey, RepeatBehavior, TargetRef,
    Value,
};

use crate::keyframe::Keyframe;
use crate::track::{PlayState, Track};

/// Declarative description of how one property on one target changes over
/// time. Immutable once built; build one with [`Animation::linear`],
/// [`Animation::keyframes`] or [`Animation::apply`].
#[derive(Clone)]
pub struct Animation {
    property: PropertyKey,
    target: Option<TargetRef>,
    begin_time: StdDuration,
    duration: Duration,
    repeat: RepeatBehavior,
    auto_reverse: bool,
    easing: Easing,
    fill: FillBehavior,
    track: Track,
}

impl Animation {
    /// Linear interpolation toward `to`; the starting value defaults to the
    /// property's current value unless [`AnimationBuilder::from`] is set.
    pub fn linear(property: PropertyKey, to: impl Into<Value>) -> AnimationBuilder {
        AnimationBuilder::new(
            property,
            BuilderTrack::Linear {
                from: None,
                to: to.into(),
            },
        )
    }

    /// Keyframed animation; add keyframes with [`AnimationBuilder::keyframe`].
    pub fn keyframes(property: PropertyKey) -> AnimationBuilder {
        AnimationBuilder::new(property, BuilderTrack::Keyframes(Vec::new()))
    }

    /// Instantaneous value application once the unit's window is reached.
    pub fn apply(property: PropertyKey, value: impl Into<Value>) -> AnimationBuilder {
        AnimationBuilder::new(property, BuilderTrack::Apply(value.into()))
    }

    pub fn property(&self) -> PropertyKey {
        self.property
    }

    /// Per-unit target override; the storyboard's target is used when absent.
    pub fn target(&self) -> Option<&TargetRef> {
        self.target.as_ref()
    }

    pub fn begin_time(&self) -> StdDuration {
        self.begin_time
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn repeat(&self) -> RepeatBehavior {
        self.repeat
    }

    pub fn auto_reverse(&self) -> bool {
        self.auto_reverse
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn fill(&self) -> FillBehavior {
        self.fill
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Fold the repeat policy into the single-run duration: a `Forever`
    /// repeat dominates everything; a timed single run multiplies under a
    /// count (saturating) or is replaced by an explicit repeat span; a
    /// non-timed single run passes through unchanged.
    pub fn exact_duration(&self) -> Duration {
        if self.repeat.is_forever() {
            return Duration::Forever;
        }
        if let Some(span) = self.duration.span() {
            if let Some(count) = self.repeat.count_value() {
                return Duration::timed(span.saturating_mul(count));
            }
            if let Some(repeat_span) = self.repeat.span_value() {
                return Duration::timed(repeat_span);
            }
        }
        self.duration
    }

    /// Read the property off `target` and capture the state for one play.
    pub fn capture(&self, target: &TargetRef) -> Result<PlayState, AnimationError> {
        self.track.capture(target, self.property)
    }

    /// Apply one update at local progress `x` (relative to this unit's own
    /// duration).
    pub fn update(&self, x: f64, state: &mut PlayState) -> Result<(), AnimationError> {
        self.track
            .update(x, self.duration.resolve(), self.property, state)
    }

    /// Apply the fill policy at the end of this unit's window.
    pub fn restore(&self, state: &mut PlayState) -> Result<(), AnimationError> {
        self.track.restore(self.fill, self.property, state)
    }
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("property", &self.property)
            .field("begin_time", &self.begin_time)
            .field("duration", &self.duration)
            .field("repeat", &self.repeat)
            .field("auto_reverse", &self.auto_reverse)
            .field("easing", &self.easing)
            .field("fill", &self.fill)
            .field("track", &self.track)
            .finish()
    }
}

enum BuilderTrack {
    Linear { from: Option<Value>, to: Value },
    Keyframes(Vec<Keyframe>),
    Apply(Value),
}

/// Mutable construction side of [`Animation`]; consumed by
/// [`build`](AnimationBuilder::build), which validates and freezes the unit.
pub struct AnimationBuilder {
    property: PropertyKey,
    target: Option<TargetRef>,
    begin_time: StdDuration,
    duration: Duration,
    repeat: RepeatBehavior,
    auto_reverse: bool,
    easing: Easing,
    fill: FillBehavior,
    track: BuilderTrack,
}

impl AnimationBuilder {
    fn new(property: PropertyKey, track: BuilderTrack) -> Self {
        Self {
            property,
            target: None,
            begin_time: StdDuration::ZERO,
            duration: Duration::ZERO,
            repeat: RepeatBehavior::Single,
            auto_reverse: false,
            easing: Easing::Linear,
            fill: FillBehavior::HoldEnd,
            track,
        }
    }

    /// Explicit starting value for a linear unit.
    pub fn from(mut self, value: impl Into<Value>) -> Self {
        if let BuilderTrack::Linear { from, .. } = &mut self.track {
            *from = Some(value.into());
        }
        self
    }

    /// Per-unit target override.
    pub fn target(mut self, target: &TargetRef) -> Self {
        self.target = Some(target.clone());
        self
    }

    /// Delay before this unit starts, within the storyboard's timeline.
    pub fn begin_time(mut self, begin_time: StdDuration) -> Self {
        self.begin_time = begin_time;
        self
    }

    /// Single-run duration.
    pub fn duration(mut self, duration: impl Into<Duration>) -> Self {
        self.duration = duration.into();
        self
    }

    pub fn repeat(mut self, repeat: RepeatBehavior) -> Self {
        self.repeat = repeat;
        self
    }

    /// Mirror every other repeat cycle.
    pub fn auto_reverse(mut self, auto_reverse: bool) -> Self {
        self.auto_reverse = auto_reverse;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn fill(mut self, fill: FillBehavior) -> Self {
        self.fill = fill;
        self
    }

    /// Append a keyframe to a keyframed unit.
    pub fn keyframe(mut self, keyframe: Keyframe) -> Self {
        if let BuilderTrack::Keyframes(keyframes) = &mut self.track {
            keyframes.push(keyframe);
        }
        self
    }

    /// Validate and freeze into an immutable [`Animation`].
    ///
    /// Keyframes are sorted ascending by key time here; the sort is stable,
    /// so keyframes sharing a key time keep their insertion order.
    pub fn build(self) -> Result<Animation, AnimationError> {
        let track = match self.track {
            BuilderTrack::Linear { from, to } => {
                if let Some(from_value) = &from {
                    if from_value.kind() != to.kind() {
                        return Err(AnimationError::KindMismatch {
                            property: self.property,
                            expected: to.kind(),
                            found: from_value.kind(),
                        });
                    }
                }
                Track::Linear { from, to }
            }
            BuilderTrack::Keyframes(mut keyframes) => {
                if let Some(first) = keyframes.first() {
                    let expected = first.value.kind();
                    for keyframe in &keyframes {
                        if keyframe.value.kind() != expected {
                            return Err(AnimationError::KindMismatch {
                                property: self.property,
                                expected,
                                found: keyframe.value.kind(),
                            });
                        }
                    }
                }
                keyframes.sort_by_key(|kf| kf.key_time);
                Track::Keyframes { keyframes }
            }
            BuilderTrack::Apply(value) => {
                if self.duration != Duration::ZERO
                    || self.repeat != RepeatBehavior::Single
                    || self.auto_reverse
                {
                    return Err(AnimationError::UnsupportedApplySettings);
                }
                Track::Apply { value }
            }
        };

        Ok(Animation {
            property: self.property,
            target: self.target,
            begin_time: self.begin_time,
            duration: self.duration,
            repeat: self.repeat,
            auto_reverse: self.auto_reverse,
            easing: self.easing,
            fill: self.fill,
            track,
        })
    }
}
