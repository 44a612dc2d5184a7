//! State-change notifications.

use std::cell::RefCell;
use std::rc::Rc;

use cue_core::TargetRef;

/// Payload delivered to changing/changed observers around a state switch.
#[derive(Clone)]
pub struct StateChangeEvent {
    /// The state being left, if the group had one.
    pub old_state: Option<String>,
    /// The state being entered.
    pub new_state: String,
    /// The element the switch was requested on.
    pub root: TargetRef,
    /// The element the animations run against.
    pub target: TargetRef,
}

type Observer = Box<dyn FnMut(&StateChangeEvent)>;

/// Synchronous observer list; callbacks run in registration order. Clones
/// share the underlying list, so notification never requires holding a
/// borrow of the owning group.
#[derive(Clone, Default)]
pub(crate) struct ObserverList {
    observers: Rc<RefCell<Vec<Observer>>>,
}

impl ObserverList {
    pub(crate) fn subscribe(&self, observer: impl FnMut(&StateChangeEvent) + 'static) {
        self.observers.borrow_mut().push(Box::new(observer));
    }

    pub(crate) fn notify(&self, event: &StateChangeEvent) {
        for observer in self.observers.borrow_mut().iter_mut() {
            observer(event);
        }
    }
}
