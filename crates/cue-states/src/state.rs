//! Named visual states.

use cue_animation::Storyboard;

/// A named configuration of a target, with a storyboard played verbatim when
/// the state becomes active.
#[derive(Debug, Clone)]
pub struct VisualState {
    name: String,
    storyboard: Storyboard,
}

impl VisualState {
    pub fn new(name: impl Into<String>, storyboard: Storyboard) -> Self {
        Self {
            name: name.into(),
            storyboard,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn storyboard(&self) -> &Storyboard {
        &self.storyboard
    }
}
