//! Visual states, transitions between them, and the state manager.
//!
//! A [`VisualStateGroup`] names a set of mutually exclusive
//! [`VisualState`]s (at most one is current) plus the
//! [`VisualTransition`]s bridging them. The [`VisualStateManager`] attaches
//! groups to target nodes and resolves `go_to_state` requests: abort any
//! in-flight run for the group, pick the best-matching transition by
//! deterministic weighting, play it, then play the destination state's own
//! storyboard and commit the switch, raising changing/changed notifications
//! around the whole sequence.

pub mod events;
pub mod group;
pub mod manager;
pub mod state;
pub mod transition;

pub use events::StateChangeEvent;
pub use group::{TransitionFactory, VisualStateGroup, VisualStateGroupBuilder};
pub use manager::VisualStateManager;
pub use state::VisualState;
pub use transition::VisualTransition;
