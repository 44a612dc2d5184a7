//! The visual state manager: groups attached to elements, plus dispatch.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use cue_animation::PlaybackRegistry;
use cue_core::{AnimationError, FrameScheduler, NodeId, PropertyTarget, TargetRef};

use crate::group::VisualStateGroup;

/// Owns the visual state groups attached to target elements and routes
/// `go_to_state` requests to the first group declaring the requested state.
///
/// The manager also owns the playback registry giving every (element, group)
/// pair its own mutually exclusive channel, so overlapping transition
/// requests on one element abort each other instead of corrupting state.
pub struct VisualStateManager {
    scheduler: Rc<dyn FrameScheduler>,
    registry: PlaybackRegistry,
    groups: HashMap<NodeId, Vec<Rc<RefCell<VisualStateGroup>>>>,
}

impl VisualStateManager {
    pub fn new(scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self {
            scheduler,
            registry: PlaybackRegistry::new(),
            groups: HashMap::new(),
        }
    }

    /// The registry driving channel mutual exclusion; shared with any other
    /// playback the host starts directly.
    pub fn registry(&self) -> &PlaybackRegistry {
        &self.registry
    }

    /// Attach a built group to `element`, returning the shared handle the
    /// manager will drive.
    pub fn attach(
        &mut self,
        element: &TargetRef,
        group: VisualStateGroup,
    ) -> Rc<RefCell<VisualStateGroup>> {
        let group = Rc::new(RefCell::new(group));
        self.groups
            .entry(element.borrow().id())
            .or_default()
            .push(Rc::clone(&group));
        group
    }

    /// Groups attached to `element`.
    pub fn groups_of(&self, element: &TargetRef) -> &[Rc<RefCell<VisualStateGroup>>] {
        self.groups
            .get(&element.borrow().id())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The current state of the named group on `element`.
    pub fn current_state(&self, element: &TargetRef, group_name: &str) -> Option<String> {
        self.groups_of(element)
            .iter()
            .find(|group| group.borrow().name() == group_name)
            .and_then(|group| group.borrow().current_state().map(String::from))
    }

    /// Switch `element` to the named state. Returns `Ok(false)` when no
    /// attached group declares the state or it is already current.
    pub fn go_to_state(
        &mut self,
        element: &TargetRef,
        state_name: &str,
        use_transitions: bool,
    ) -> Result<bool, AnimationError> {
        let group = self
            .groups
            .get(&element.borrow().id())
            .and_then(|groups| {
                groups
                    .iter()
                    .find(|group| group.borrow().has_state(state_name))
            })
            .cloned();

        let Some(group) = group else {
            return Ok(false);
        };

        log::debug!(
            "visual state change requested: {:?} -> {} (transitions: {})",
            group.borrow().current_state(),
            state_name,
            use_transitions
        );

        VisualStateGroup::go_to_state(
            &group,
            element,
            element,
            state_name,
            use_transitions,
            &self.scheduler,
            &self.registry,
        )
    }
}
