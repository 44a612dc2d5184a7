//! Core vocabulary for the cue animation engine.
//!
//! This crate defines the value types every other layer builds on:
//! - [`Duration`] / [`RepeatBehavior`] / [`FillBehavior`] — the declarative
//!   timing vocabulary (tri-state durations, repeat policies, post-run fill).
//! - [`Easing`] — progress-shaping timing functions.
//! - [`Value`] and [`Lerp`] — animatable property values and their
//!   interpolation rules.
//! - [`PropertyTarget`] / [`Node`] — the property-access contract the engine
//!   animates through, plus an in-memory implementation.
//! - [`FrameScheduler`] / [`StepScheduler`] — the host frame-scheduler
//!   contract and a deterministic manual-clock implementation.

pub mod duration;
pub mod easing;
pub mod error;
pub mod fill;
pub mod lerp;
pub mod repeat;
pub mod scheduler;
pub mod target;
mod timespan;
pub mod value;

pub use duration::{Duration, FOREVER_HORIZON};
pub use easing::{Easing, StepPosition};
pub use error::{AnimationError, ParseError};
pub use fill::FillBehavior;
pub use lerp::Lerp;
pub use repeat::RepeatBehavior;
pub use scheduler::{FinishedFn, FrameScheduler, ScheduleHandle, StepScheduler, TickFn};
pub use target::{Node, NodeId, PropertyKey, PropertyTarget, TargetRef};
pub use value::{Color, Thickness, Value, ValueKind};
