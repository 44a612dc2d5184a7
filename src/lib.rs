//! Declarative animation and visual-state engine for retained-mode UI trees.
//!
//! This umbrella crate re-exports the workspace members:
//! - [`cue_core`] — time vocabulary (durations, repeat policies), easing,
//!   interpolation, animatable values, and the property-access / frame-scheduler
//!   collaborator contracts.
//! - [`cue_animation`] — animation units, keyframes, storyboards, and the
//!   storyboard compiler that turns declarative descriptions into
//!   progress-driven update functions.
//! - [`cue_states`] — named visual states, weighted transition resolution, and
//!   the state manager that orchestrates transitions between them.

pub use cue_animation::*;
pub use cue_core::*;
pub use cue_states::*;
