//! Playback channels and the mutual-exclusion registry.
//!
//! Two runs sharing a channel are mutually exclusive: beginning on a channel
//! aborts the incumbent first. The registry is the engine-owned lookup table
//! replacing ad hoc string handles; cancellation is routed through the
//! scheduler so the aborted run's finished callback (and with it, fill
//! restoration) is guaranteed to fire.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use cue_core::{FrameScheduler, NodeId, ScheduleHandle};

/// Logical playback slot: one target node plus a channel name (for the state
/// machinery, the state group's name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Channel {
    pub node: NodeId,
    pub name: String,
}

impl Channel {
    pub fn new(node: NodeId, name: impl Into<String>) -> Self {
        Self {
            node,
            name: name.into(),
        }
    }
}

/// Table of in-flight runs, one per channel. Cheaply cloneable; clones share
/// the same table.
#[derive(Clone, Default)]
pub struct PlaybackRegistry {
    active: Rc<RefCell<HashMap<Channel, ScheduleHandle>>>,
}

impl PlaybackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `channel` for `handle`, aborting the incumbent run if any.
    pub fn begin(&self, scheduler: &dyn FrameScheduler, channel: Channel, handle: ScheduleHandle) {
        let previous = self.active.borrow_mut().insert(channel, handle);
        if let Some(previous) = previous {
            scheduler.cancel(previous);
        }
    }

    /// Abort whatever run currently owns `channel`. Returns whether one did.
    pub fn cancel(&self, scheduler: &dyn FrameScheduler, channel: &Channel) -> bool {
        let handle = self.active.borrow_mut().remove(channel);
        match handle {
            Some(handle) => scheduler.cancel(handle),
            None => false,
        }
    }

    /// Release `channel` if it is still owned by `handle` (completion path;
    /// a newer run keeps its claim).
    pub fn release(&self, channel: &Channel, handle: ScheduleHandle) {
        let mut active = self.active.borrow_mut();
        if active.get(channel) == Some(&handle) {
            active.remove(channel);
        }
    }

    /// The run currently owning `channel`.
    pub fn active_handle(&self, channel: &Channel) -> Option<ScheduleHandle> {
        self.active.borrow().get(channel).copied()
    }

    pub fn active_count(&self) -> usize {
        self.active.borrow().len()
    }
}
