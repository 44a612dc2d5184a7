//! Visual state groups and the `go_to_state` orchestration.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use cue_animation::{Channel, PlaybackRegistry, Storyboard};
use cue_core::{AnimationError, FinishedFn, FrameScheduler, PropertyTarget, TargetRef};

use crate::events::{ObserverList, StateChangeEvent};
use crate::state::VisualState;
use crate::transition::{best_explicit, VisualTransition};

/// Hook producing a storyboard for a generated transition between two
/// states; the default produces an empty storyboard.
pub type TransitionFactory = Box<dyn Fn(&TargetRef, Option<&str>, &str) -> Storyboard>;

/// An ordered set of mutually exclusive visual states plus the transitions
/// bridging them. At most one state is current at any time; switching is
/// atomic relative to observers (changing/changed events bracket the
/// switch).
pub struct VisualStateGroup {
    name: String,
    states: Vec<VisualState>,
    transitions: Vec<VisualTransition>,
    /// Lazily generated transitions, cached per `(from, to)` pair.
    generated: Vec<VisualTransition>,
    current: Option<String>,
    transition_factory: Option<TransitionFactory>,
    changing: ObserverList,
    changed: ObserverList,
}

impl VisualStateGroup {
    pub fn builder(name: impl Into<String>) -> VisualStateGroupBuilder {
        VisualStateGroupBuilder {
            name: name.into(),
            states: Vec::new(),
            transitions: Vec::new(),
            transition_factory: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn states(&self) -> &[VisualState] {
        &self.states
    }

    pub fn transitions(&self) -> &[VisualTransition] {
        &self.transitions
    }

    /// The currently active state's name, if any.
    pub fn current_state(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.states.iter().any(|state| state.name() == name)
    }

    /// Observe switches before they proceed; runs synchronously, in
    /// registration order.
    pub fn on_changing(&self, observer: impl FnMut(&StateChangeEvent) + 'static) {
        self.changing.subscribe(observer);
    }

    /// Observe committed switches.
    pub fn on_changed(&self, observer: impl FnMut(&StateChangeEvent) + 'static) {
        self.changed.subscribe(observer);
    }

    /// Resolve the transition storyboard for a `from -> to` switch: the
    /// best-weighted explicit transition first, then the generated cache,
    /// and finally a freshly generated (and cached) one.
    fn transition_storyboard(
        &mut self,
        target: &TargetRef,
        from: Option<&str>,
        to: &str,
    ) -> Storyboard {
        if let Some(transition) = best_explicit(&self.transitions, from, to) {
            return transition.storyboard().clone();
        }
        if let Some(transition) = self
            .generated
            .iter()
            .find(|t| t.from_state() == from && t.to_state() == Some(to))
        {
            return transition.storyboard().clone();
        }

        let storyboard = match &self.transition_factory {
            Some(factory) => factory(target, from, to),
            None => Storyboard::default(),
        };
        self.generated
            .push(VisualTransition::new(from, Some(to), storyboard.clone()));
        storyboard
    }

    /// Switch the group to `state_name`.
    ///
    /// Returns `Ok(false)` when the request is a no-op (unknown state or
    /// already current). Any in-flight run on the group's channel is aborted
    /// first — the scheduler's cancellation guarantee force-completes it at
    /// progress 1.0 so fill restoration runs. With `use_transitions`, the
    /// resolved transition storyboard plays first; the destination state's
    /// storyboard, the commit, and the changed event only follow when the
    /// transition finishes without being cancelled. A cancelled transition
    /// abandons the switch entirely.
    pub fn go_to_state(
        group: &Rc<RefCell<VisualStateGroup>>,
        root: &TargetRef,
        target: &TargetRef,
        state_name: &str,
        use_transitions: bool,
        scheduler: &Rc<dyn FrameScheduler>,
        registry: &PlaybackRegistry,
    ) -> Result<bool, AnimationError> {
        let (old_state, channel, changing, changed) = {
            let this = group.borrow();
            if this.current.as_deref() == Some(state_name) {
                return Ok(false);
            }
            if !this.has_state(state_name) {
                return Ok(false);
            }
            (
                this.current.clone(),
                Channel::new(target.borrow().id(), this.name.clone()),
                this.changing.clone(),
                this.changed.clone(),
            )
        };

        registry.cancel(scheduler.as_ref(), &channel);

        changing.notify(&StateChangeEvent {
            old_state: old_state.clone(),
            new_state: state_name.to_string(),
            root: root.clone(),
            target: target.clone(),
        });

        let run_and_commit = {
            let group = Rc::clone(group);
            let root = root.clone();
            let target = target.clone();
            let scheduler = Rc::clone(scheduler);
            let registry = registry.clone();
            let channel = channel.clone();
            let state_name = state_name.to_string();
            let old_state = old_state.clone();
            move || -> Result<(), AnimationError> {
                let storyboard = {
                    let this = group.borrow();
                    this.states
                        .iter()
                        .find(|state| state.name() == state_name)
                        .map(|state| state.storyboard().clone())
                };
                if let Some(storyboard) = storyboard {
                    storyboard.begin_on(
                        &target,
                        channel.clone(),
                        scheduler.as_ref(),
                        &registry,
                        None,
                    )?;
                }
                group.borrow_mut().current = Some(state_name.clone());
                changed.notify(&StateChangeEvent {
                    old_state: old_state.clone(),
                    new_state: state_name.clone(),
                    root: root.clone(),
                    target: target.clone(),
                });
                Ok(())
            }
        };

        if use_transitions {
            let transition_storyboard = group.borrow_mut().transition_storyboard(
                target,
                old_state.as_deref(),
                state_name,
            );
            let on_finished: FinishedFn = Box::new(move |_x, cancelled| {
                if cancelled {
                    // Abandoned switch; the aborted run was force-completed
                    // by the playback layer.
                    return;
                }
                if let Err(error) = run_and_commit() {
                    tracing::warn!("state switch abandoned: {error}");
                }
            });
            transition_storyboard.begin_on(
                target,
                channel,
                scheduler.as_ref(),
                registry,
                Some(on_finished),
            )?;
            return Ok(true);
        }

        run_and_commit()?;
        Ok(true)
    }
}

impl fmt::Debug for VisualStateGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualStateGroup")
            .field("name", &self.name)
            .field("states", &self.states)
            .field("transitions", &self.transitions)
            .field("current", &self.current)
            .finish()
    }
}

/// Mutable construction side of [`VisualStateGroup`].
pub struct VisualStateGroupBuilder {
    name: String,
    states: Vec<VisualState>,
    transitions: Vec<VisualTransition>,
    transition_factory: Option<TransitionFactory>,
}

impl VisualStateGroupBuilder {
    pub fn state(mut self, state: VisualState) -> Self {
        self.states.push(state);
        self
    }

    pub fn transition(mut self, transition: VisualTransition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Custom storyboard generation for transitions no explicit declaration
    /// covers.
    pub fn transition_factory(
        mut self,
        factory: impl Fn(&TargetRef, Option<&str>, &str) -> Storyboard + 'static,
    ) -> Self {
        self.transition_factory = Some(Box::new(factory));
        self
    }

    pub fn build(self) -> VisualStateGroup {
        VisualStateGroup {
            name: self.name,
            states: self.states,
            transitions: self.transitions,
            generated: Vec::new(),
            current: None,
            transition_factory: self.transition_factory,
            changing: ObserverList::default(),
            changed: ObserverList::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cue_animation::Animation;
    use cue_core::{Node, PropertyKey, StepScheduler};
    use std::time::Duration as StdDuration;

    const OPACITY: PropertyKey = PropertyKey("opacity");

    fn ms(v: u64) -> StdDuration {
        StdDuration::from_millis(v)
    }

    fn fade_storyboard(to: f64) -> Storyboard {
        Storyboard::builder()
            .animation(
                Animation::linear(OPACITY, to)
                    .duration(ms(100))
                    .build()
                    .unwrap(),
            )
            .build()
    }

    fn group_with_states() -> Rc<RefCell<VisualStateGroup>> {
        Rc::new(RefCell::new(
            VisualStateGroup::builder("common")
                .state(VisualState::new("normal", fade_storyboard(1.0)))
                .state(VisualState::new("pressed", fade_storyboard(0.5)))
                .build(),
        ))
    }

    #[test]
    fn unknown_state_is_a_no_op() {
        let group = group_with_states();
        let node = Node::new().with(OPACITY, 1.0).into_ref();
        let scheduler: Rc<dyn FrameScheduler> = Rc::new(StepScheduler::new());
        let registry = PlaybackRegistry::new();

        let switched = VisualStateGroup::go_to_state(
            &group, &node, &node, "missing", false, &scheduler, &registry,
        )
        .unwrap();
        assert!(!switched);
        assert_eq!(group.borrow().current_state(), None);
    }

    #[test]
    fn switching_to_current_state_is_a_no_op() {
        let group = group_with_states();
        let node = Node::new().with(OPACITY, 1.0).into_ref();
        let scheduler: Rc<dyn FrameScheduler> = Rc::new(StepScheduler::new());
        let registry = PlaybackRegistry::new();

        assert!(VisualStateGroup::go_to_state(
            &group, &node, &node, "pressed", false, &scheduler, &registry
        )
        .unwrap());
        assert!(!VisualStateGroup::go_to_state(
            &group, &node, &node, "pressed", false, &scheduler, &registry
        )
        .unwrap());
    }

    #[test]
    fn generated_transitions_are_cached_per_pair() {
        let group = group_with_states();
        let node = Node::new().with(OPACITY, 1.0).into_ref();

        let storyboard = group
            .borrow_mut()
            .transition_storyboard(&node, None, "pressed");
        assert!(storyboard.is_empty());
        assert_eq!(group.borrow().generated.len(), 1);

        // Same pair reuses the cache; a new pair generates another entry.
        group
            .borrow_mut()
            .transition_storyboard(&node, None, "pressed");
        assert_eq!(group.borrow().generated.len(), 1);
        group
            .borrow_mut()
            .transition_storyboard(&node, Some("pressed"), "normal");
        assert_eq!(group.borrow().generated.len(), 2);
    }

    #[test]
    fn transition_factory_supplies_generated_storyboards() {
        let group = Rc::new(RefCell::new(
            VisualStateGroup::builder("common")
                .state(VisualState::new("normal", Storyboard::default()))
                .transition_factory(|_, _, _| fade_storyboard(0.0))
                .build(),
        ));
        let node = Node::new().with(OPACITY, 1.0).into_ref();
        let storyboard = group
            .borrow_mut()
            .transition_storyboard(&node, None, "normal");
        assert_eq!(storyboard.animations().len(), 1);
    }

    #[test]
    fn explicit_transition_outranks_generated() {
        let group = Rc::new(RefCell::new(
            VisualStateGroup::builder("common")
                .state(VisualState::new("normal", Storyboard::default()))
                .transition(VisualTransition::new(
                    None,
                    Some("normal"),
                    fade_storyboard(0.25),
                ))
                .build(),
        ));
        let node = Node::new().with(OPACITY, 1.0).into_ref();
        let storyboard = group
            .borrow_mut()
            .transition_storyboard(&node, None, "normal");
        assert_eq!(storyboard.animations().len(), 1);
        assert!(group.borrow().generated.is_empty());
    }

    #[test]
    fn switch_without_transitions_commits_immediately() {
        let group = group_with_states();
        let node = Node::new().with(OPACITY, 0.0).into_ref();
        let scheduler_impl = Rc::new(StepScheduler::new());
        let scheduler: Rc<dyn FrameScheduler> = scheduler_impl.clone();
        let registry = PlaybackRegistry::new();

        VisualStateGroup::go_to_state(
            &group, &node, &node, "normal", false, &scheduler, &registry,
        )
        .unwrap();

        // Committed as soon as the destination storyboard started.
        assert_eq!(group.borrow().current_state(), Some("normal"));
        scheduler_impl.advance(ms(100));
        let opacity = node.borrow().read(OPACITY).and_then(|v| v.as_float());
        assert_eq!(opacity, Some(1.0));
    }

    #[test]
    fn capture_failure_surfaces_from_go_to_state() {
        let group = group_with_states();
        // The animated property is missing on the node entirely.
        let node = Node::new().into_ref();
        let scheduler: Rc<dyn FrameScheduler> = Rc::new(StepScheduler::new());
        let registry = PlaybackRegistry::new();

        let result = VisualStateGroup::go_to_state(
            &group, &node, &node, "normal", false, &scheduler, &registry,
        );
        assert_eq!(
            result.unwrap_err(),
            AnimationError::MissingProperty { property: OPACITY }
        );
    }

    fn opacity_of(node: &TargetRef) -> f64 {
        node.borrow()
            .read(OPACITY)
            .and_then(|v| v.as_float())
            .unwrap()
    }

    #[test]
    fn transition_plays_before_destination_storyboard() {
        let node = Node::new().with(OPACITY, 0.0).into_ref();
        let group = Rc::new(RefCell::new(
            VisualStateGroup::builder("common")
                .state(VisualState::new("normal", fade_storyboard(1.0)))
                .transition(VisualTransition::new(
                    None,
                    Some("normal"),
                    Storyboard::builder()
                        .animation(
                            Animation::linear(OPACITY, 0.5)
                                .duration(ms(50))
                                .build()
                                .unwrap(),
                        )
                        .build(),
                ))
                .build(),
        ));
        let scheduler_impl = Rc::new(StepScheduler::new());
        let scheduler: Rc<dyn FrameScheduler> = scheduler_impl.clone();
        let registry = PlaybackRegistry::new();

        VisualStateGroup::go_to_state(
            &group, &node, &node, "normal", true, &scheduler, &registry,
        )
        .unwrap();

        // While the transition runs, the switch has not committed.
        scheduler_impl.advance(ms(25));
        assert_eq!(group.borrow().current_state(), None);
        assert!((opacity_of(&node) - 0.25).abs() < 1e-9);

        // Transition completes: destination storyboard starts, commit and
        // changed happen right away.
        scheduler_impl.advance(ms(25));
        assert_eq!(group.borrow().current_state(), Some("normal"));

        scheduler_impl.advance(ms(100));
        assert!((opacity_of(&node) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cancelled_transition_abandons_the_switch() {
        let node = Node::new().with(OPACITY, 0.0).into_ref();
        let group = Rc::new(RefCell::new(
            VisualStateGroup::builder("common")
                .state(VisualState::new("normal", fade_storyboard(1.0)))
                .transition(VisualTransition::wildcard(
                    Storyboard::builder()
                        .animation(
                            Animation::linear(OPACITY, 0.5)
                                .duration(ms(100))
                                .build()
                                .unwrap(),
                        )
                        .build(),
                ))
                .build(),
        ));
        let scheduler_impl = Rc::new(StepScheduler::new());
        let scheduler: Rc<dyn FrameScheduler> = scheduler_impl.clone();
        let registry = PlaybackRegistry::new();

        VisualStateGroup::go_to_state(
            &group, &node, &node, "normal", true, &scheduler, &registry,
        )
        .unwrap();
        scheduler_impl.advance(ms(40));

        let channel = Channel::new(node.borrow().id(), "common");
        registry.cancel(scheduler.as_ref(), &channel);

        // The transition was force-completed (HoldEnd keeps its final value)
        // but the switch never committed.
        assert!((opacity_of(&node) - 0.5).abs() < 1e-9);
        assert_eq!(group.borrow().current_state(), None);
        scheduler_impl.advance(ms(200));
        assert_eq!(group.borrow().current_state(), None);
    }

    #[test]
    fn events_bracket_the_switch() {
        use std::cell::RefCell as StdRefCell;

        let group = group_with_states();
        let node = Node::new().with(OPACITY, 0.0).into_ref();
        let log = Rc::new(StdRefCell::new(Vec::new()));

        {
            let this = group.borrow();
            let sink = Rc::clone(&log);
            this.on_changing(move |event| {
                sink.borrow_mut().push(format!(
                    "changing {:?} -> {}",
                    event.old_state, event.new_state
                ));
            });
            let sink = Rc::clone(&log);
            this.on_changed(move |event| {
                sink.borrow_mut().push(format!(
                    "changed {:?} -> {}",
                    event.old_state, event.new_state
                ));
            });
        }

        let scheduler: Rc<dyn FrameScheduler> = Rc::new(StepScheduler::new());
        let registry = PlaybackRegistry::new();
        VisualStateGroup::go_to_state(
            &group, &node, &node, "normal", false, &scheduler, &registry,
        )
        .unwrap();

        assert_eq!(
            log.borrow().as_slice(),
            &[
                "changing None -> normal".to_string(),
                "changed None -> normal".to_string(),
            ]
        );
    }
}
