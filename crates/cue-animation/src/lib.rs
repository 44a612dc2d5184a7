//! Animation units, storyboards and the storyboard compiler.
//!
//! An [`Animation`] is the atomic declarative description of how one property
//! on one target changes over time: a linear from/to interpolation, an
//! ordered keyframe sequence, or an instantaneous apply. A [`Storyboard`]
//! groups animations on one shared timeline and compiles them into a single
//! progress-driven [`CompiledStoryboard`], which a frame scheduler drives by
//! time.
//!
//! # Architecture
//!
//! ```text
//! Storyboard (declarative, immutable after build)
//!   └── compile() ─▶ CompiledStoryboard
//!                       ├── per-unit bounded update functions
//!                       │   (windowed into the storyboard's [0,1] space)
//!                       └── per-unit PlayState (captured "before" values)
//!
//! begin_on() ─▶ FrameScheduler (ticks the compiled storyboard by time)
//!               PlaybackRegistry (one active run per (node, channel))
//! ```

pub mod animation;
pub mod keyframe;
pub mod playback;
pub mod storyboard;
pub mod track;

pub use animation::{Animation, AnimationBuilder};
pub use keyframe::{Keyframe, KeyframeKind};
pub use playback::{Channel, PlaybackRegistry};
pub use storyboard::{CompiledStoryboard, Storyboard, StoryboardBuilder};
pub use track::{PlayState, Track};
