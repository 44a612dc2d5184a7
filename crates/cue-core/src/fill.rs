//! Post-run fill policy.

use serde::{Deserialize, Serialize};

/// What happens to the animated property after an animation's window ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillBehavior {
    /// Keep the final interpolated value.
    #[default]
    HoldEnd,
    /// Restore the value the property had before the animation started.
    Stop,
}
