//! Transitions between visual states and their resolution.
//!
//! Resolution is two-tier: explicit transitions are ranked by a deterministic
//! weight (an exact `from` match outranks an exact `to` match; the wildcard
//! sits at the bottom), then the group's generated-transition cache is
//! consulted for an exact pair match.

use cue_animation::Storyboard;

/// A bridging storyboard played when switching between two states.
///
/// `from`/`to` name the states this transition applies to; both `None` is
/// the wildcard/default transition.
#[derive(Debug, Clone)]
pub struct VisualTransition {
    from: Option<String>,
    to: Option<String>,
    storyboard: Storyboard,
}

impl VisualTransition {
    pub fn new(
        from: Option<&str>,
        to: Option<&str>,
        storyboard: Storyboard,
    ) -> Self {
        Self {
            from: from.map(String::from),
            to: to.map(String::from),
            storyboard,
        }
    }

    /// The wildcard transition, applying to every state pair.
    pub fn wildcard(storyboard: Storyboard) -> Self {
        Self::new(None, None, storyboard)
    }

    pub fn from_state(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn to_state(&self) -> Option<&str> {
        self.to.as_deref()
    }

    pub fn storyboard(&self) -> &Storyboard {
        &self.storyboard
    }

    /// Whether this transition applies to a `from -> to` switch: its `from`
    /// equals the leaving state (both possibly absent), its `to` equals the
    /// entering state, or it is the wildcard.
    pub(crate) fn matches(&self, from: Option<&str>, to: &str) -> bool {
        self.from.as_deref() == from
            || self.to.as_deref() == Some(to)
            || (self.from.is_none() && self.to.is_none())
    }

    /// Match strength for a `from -> to` switch: the wildcard weighs 0, an
    /// exact `to` match adds 1, an exact `from` match adds 2 (so `from`
    /// outranks `to`, and a full match scores the maximum 3).
    pub(crate) fn weight(&self, from: Option<&str>, to: &str) -> u32 {
        if self.from.is_none() && self.to.is_none() {
            return 0;
        }
        let mut weight = 0;
        if self.from.as_deref() == from {
            weight += 2;
        }
        if self.to.as_deref() == Some(to) {
            weight += 1;
        }
        weight
    }
}

/// Pick the best-matching explicit transition: highest weight wins, ties
/// keep the earliest declared (the scan only replaces on strictly greater
/// weight).
pub(crate) fn best_explicit<'a>(
    transitions: &'a [VisualTransition],
    from: Option<&str>,
    to: &str,
) -> Option<&'a VisualTransition> {
    let mut best: Option<(&VisualTransition, u32)> = None;
    for transition in transitions.iter().filter(|t| t.matches(from, to)) {
        let weight = transition.weight(from, to);
        match best {
            Some((_, best_weight)) if weight <= best_weight => {}
            _ => best = Some((transition, weight)),
        }
    }
    best.map(|(transition, _)| transition)
}
