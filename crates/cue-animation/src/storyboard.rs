//! Storyboards and the storyboard compiler.
//!
//! A storyboard merges its animation units into one normalized timeline:
//! every unit gets a `[begin_at, finish_at]` window inside the storyboard's
//! own `[0,1]` progress space, and the compiled form dispatches one shared
//! global progress value into each window per tick.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration as StdDuration;

use cue_core::{
    AnimationError, Duration, FinishedFn, FrameScheduler, PropertyTarget, ScheduleHandle,
    TargetRef,
};

use crate::animation::Animation;
use crate::playback::{Channel, PlaybackRegistry};
use crate::track::PlayState;

/// Mirror offset for auto-reversed repeat cycles; stays a hair below 1.0 so
/// the mirrored progress never leaves the unit interval.
const REVERSE_MIRROR: f64 = 0.999999;

/// An ordered group of animation units sharing one timeline.
#[derive(Clone)]
pub struct Storyboard {
    /// Identity shared by clones; anonymous playback derives its channel
    /// from it, so re-beginning the same storyboard on a target aborts the
    /// previous run.
    id: u64,
    animations: Vec<Animation>,
    target: Option<TargetRef>,
    duration: Duration,
}

impl Default for Storyboard {
    fn default() -> Self {
        Storyboard::builder().build()
    }
}

impl Storyboard {
    pub fn builder() -> StoryboardBuilder {
        StoryboardBuilder::default()
    }

    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn target(&self) -> Option<&TargetRef> {
        self.target.as_ref()
    }

    /// The storyboard's duration: the explicit value when one was set,
    /// otherwise the longest unit reach (`begin_time + exact duration`,
    /// normalized to concrete spans; empty storyboards resolve to zero).
    pub fn duration(&self) -> Duration {
        if !self.duration.is_automatic() {
            return self.duration;
        }
        let mut longest = StdDuration::ZERO;
        for animation in &self.animations {
            let reach = animation
                .exact_duration()
                .resolve()
                .saturating_add(animation.begin_time());
            longest = longest.max(reach);
        }
        Duration::timed(longest)
    }

    /// Compile every unit into a bounded, progress-driven update function
    /// mapped into this storyboard's `[0,1]` space, capturing per-unit play
    /// state along the way.
    ///
    /// `root` is the fallback target for units without their own override
    /// (the storyboard's own target, when set, takes precedence over the
    /// caller's root at [`begin_on`](Self::begin_on) time).
    pub fn compile(&self, root: &TargetRef) -> Result<CompiledStoryboard, AnimationError> {
        let length = self.duration().resolve();
        let total_ms = length.as_secs_f64() * 1_000.0;

        let mut tracks = Vec::with_capacity(self.animations.len());
        for animation in &self.animations {
            let unit_target = animation
                .target()
                .cloned()
                .unwrap_or_else(|| root.clone());

            let unit_ms = match animation.exact_duration() {
                Duration::Timed { span } => span.as_secs_f64() * 1_000.0,
                Duration::Automatic => 0.0,
                // Forever units are clipped to the storyboard's own horizon.
                Duration::Forever => total_ms,
            };
            let begin_ms = animation.begin_time().as_secs_f64() * 1_000.0;
            let begin_at = (begin_ms / total_ms).max(0.0);
            let finish_at = ((begin_ms + unit_ms) / total_ms).max(0.0);

            let mode = if animation.repeat().repeat_enabled() {
                let single_fraction =
                    animation.duration().resolve().as_secs_f64() * 1_000.0 / total_ms;
                if !(single_fraction > f64::EPSILON) {
                    return Err(AnimationError::ZeroLengthRepeat {
                        property: animation.property(),
                    });
                }
                Mode::Repeating {
                    single_fraction,
                    auto_reverse: animation.auto_reverse(),
                }
            } else {
                Mode::Plain
            };

            let state = animation.capture(&unit_target)?;
            tracks.push(CompiledTrack {
                animation: animation.clone(),
                begin_at,
                finish_at,
                mode,
                state,
                restored: false,
            });
        }

        Ok(CompiledStoryboard { tracks, length })
    }

    /// Begin playback on an explicit channel, claiming it from any incumbent
    /// run. `finished` (if any) is invoked after the storyboard's own
    /// completion handling, with the final progress and the cancelled flag.
    pub fn begin_on(
        &self,
        root: &TargetRef,
        channel: Channel,
        scheduler: &dyn FrameScheduler,
        registry: &PlaybackRegistry,
        finished: Option<FinishedFn>,
    ) -> Result<ScheduleHandle, AnimationError> {
        let effective_root = self.target.clone().unwrap_or_else(|| root.clone());
        let compiled = self.compile(&effective_root)?;
        let length = compiled.length();
        let handle = ScheduleHandle::new();

        log::debug!(
            "beginning storyboard on {:?}: {} units over {}ms",
            channel,
            self.animations.len(),
            length.as_secs_f64() * 1_000.0
        );

        registry.begin(scheduler, channel.clone(), handle);

        let compiled = Rc::new(RefCell::new(compiled));
        let tick = {
            let compiled = Rc::clone(&compiled);
            Box::new(move |x: f64| compiled.borrow_mut().tick(x))
        };
        let finish = {
            let registry = registry.clone();
            Box::new(move |x: f64, cancelled: bool| {
                compiled.borrow_mut().finish(x, cancelled);
                registry.release(&channel, handle);
                if let Some(finished) = finished {
                    finished(x, cancelled);
                }
            })
        };
        scheduler.schedule(handle, length, tick, finish);
        Ok(handle)
    }

    /// Begin playback on the storyboard's own target, on a fresh anonymous
    /// channel. Fails with a null-target error when no target was set.
    pub fn begin(
        &self,
        scheduler: &dyn FrameScheduler,
        registry: &PlaybackRegistry,
    ) -> Result<ScheduleHandle, AnimationError> {
        let target = self.target.clone().ok_or(AnimationError::NoTarget)?;
        let channel = self.own_channel(&target);
        self.begin_on(&target, channel, scheduler, registry, None)
    }

    /// Abort a run started with [`begin`](Self::begin). The aborted run is
    /// force-completed by the scheduler's cancellation guarantee. Returns
    /// whether a run was in flight; fails with a null-target error when no
    /// target was set.
    pub fn stop(
        &self,
        scheduler: &dyn FrameScheduler,
        registry: &PlaybackRegistry,
    ) -> Result<bool, AnimationError> {
        let target = self.target.clone().ok_or(AnimationError::NoTarget)?;
        let channel = self.own_channel(&target);
        Ok(registry.cancel(scheduler, &channel))
    }

    fn own_channel(&self, target: &TargetRef) -> Channel {
        Channel::new(target.borrow().id(), format!("storyboard-{}", self.id))
    }
}

impl fmt::Debug for Storyboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storyboard")
            .field("animations", &self.animations)
            .field("duration", &self.duration)
            .field("has_target", &self.target.is_some())
            .finish()
    }
}

/// Mutable construction side of [`Storyboard`].
#[derive(Default)]
pub struct StoryboardBuilder {
    animations: Vec<Animation>,
    target: Option<TargetRef>,
    duration: Duration,
}

impl StoryboardBuilder {
    pub fn animation(mut self, animation: Animation) -> Self {
        self.animations.push(animation);
        self
    }

    pub fn target(mut self, target: &TargetRef) -> Self {
        self.target = Some(target.clone());
        self
    }

    /// Explicit overall duration; the default `Automatic` computes it from
    /// the units.
    pub fn duration(mut self, duration: impl Into<Duration>) -> Self {
        self.duration = duration.into();
        self
    }

    pub fn build(self) -> Storyboard {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Storyboard {
            id: COUNTER.fetch_add(1, Ordering::Relaxed),
            animations: self.animations,
            target: self.target,
            duration: self.duration,
        }
    }
}

#[derive(Debug)]
enum Mode {
    Plain,
    Repeating {
        /// One run of the unit as a fraction of the storyboard timeline.
        single_fraction: f64,
        auto_reverse: bool,
    },
}

#[derive(Debug)]
struct CompiledTrack {
    animation: Animation,
    begin_at: f64,
    finish_at: f64,
    mode: Mode,
    state: PlayState,
    restored: bool,
}

impl CompiledTrack {
    fn tick(&mut self, x_global: f64) {
        if self.restored || x_global < self.begin_at {
            return;
        }
        match self.mode {
            Mode::Plain => {
                if x_global > self.finish_at {
                    self.complete();
                    return;
                }
                let width = self.finish_at - self.begin_at;
                let mut x = (x_global - self.begin_at) / width;
                if x.is_nan() {
                    x = 1.0;
                }
                let x = self.animation.easing().ease(x);
                if (0.0..=1.0).contains(&x) {
                    self.apply(x);
                }
            }
            Mode::Repeating {
                single_fraction,
                auto_reverse,
            } => {
                // A repeating unit never updates at or past its window end;
                // its final value is whatever the last cycle left behind.
                if x_global >= self.finish_at {
                    self.restore();
                    return;
                }
                let times_elapsed = ((x_global - self.begin_at) / single_fraction).floor();
                let mut x = (x_global - self.begin_at - times_elapsed * single_fraction)
                    / single_fraction;
                if x.is_nan() {
                    x = 1.0;
                }
                let mut x = self.animation.easing().ease(x);
                if auto_reverse && (times_elapsed as u64) % 2 == 1 {
                    x = REVERSE_MIRROR - x;
                }
                if (0.0..=1.0).contains(&x) {
                    self.apply(x);
                }
            }
        }
    }

    fn apply(&mut self, x: f64) {
        if let Err(error) = self.animation.update(x, &mut self.state) {
            // Unreachable when compiled through Storyboard::compile; surfaced
            // for drivers ticking hand-built tracks.
            tracing::warn!("skipping animation update: {error}");
        }
    }

    /// Window passed for a non-repeating unit: drive it to its eased final
    /// value, then apply the fill policy. Ticks are sparse, so a window may
    /// be crossed without a tick ever landing inside it; completing here
    /// keeps the outcome independent of tick density.
    fn complete(&mut self) {
        if self.restored {
            return;
        }
        let x = self.animation.easing().ease(1.0);
        if (0.0..=1.0).contains(&x) {
            self.apply(x);
        }
        self.restore();
    }

    fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        if let Err(error) = self.animation.restore(&mut self.state) {
            tracing::warn!("skipping animation restore: {error}");
        }
    }
}

/// A storyboard compiled against concrete targets: one bounded update
/// function per unit plus the captured play states, driven by a shared
/// global progress value.
#[derive(Debug)]
pub struct CompiledStoryboard {
    tracks: Vec<CompiledTrack>,
    length: StdDuration,
}

impl CompiledStoryboard {
    /// The scheduling horizon for this run.
    pub fn length(&self) -> StdDuration {
        self.length
    }

    /// Dispatch one shared global progress value (in `[0,1]` over the whole
    /// storyboard) into every unit's window. Units whose window has passed
    /// get their fill policy applied exactly once.
    pub fn tick(&mut self, x_global: f64) {
        for track in &mut self.tracks {
            track.tick(x_global);
        }
    }

    /// End-of-run handling. A cancelled run is first forced to complete at
    /// progress 1.0 so every unit reaches its final value, then all pending
    /// restores run.
    pub fn finish(&mut self, _x: f64, cancelled: bool) {
        if cancelled {
            self.tick(1.0);
        }
        for track in &mut self.tracks {
            track.restore();
        }
    }
}
