//! Property-access contract and the in-memory node implementation.
//!
//! The engine never talks to a concrete scene graph; it reads and writes
//! named properties through [`PropertyTarget`] and holds targets as
//! [`TargetRef`] handles. [`Node`] is a property-bag implementation with
//! synchronous change observers, used by tests and by hosts that have no
//! retained tree of their own.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Reference to a named property on a target.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyKey(pub &'static str);

impl PropertyKey {
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl fmt::Debug for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyKey({})", self.0)
    }
}

/// Unique identity of a target node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Allocate a fresh unique id.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// The capability the engine requires from a target: identity plus reading
/// and writing named property values.
pub trait PropertyTarget {
    fn id(&self) -> NodeId;

    /// Current value of `property`, or `None` when it has never been set.
    fn read(&self, property: PropertyKey) -> Option<Value>;

    /// Store a new value for `property` and notify any observers.
    fn write(&mut self, property: PropertyKey, value: Value);
}

/// Shared single-threaded handle to a target.
pub type TargetRef = Rc<RefCell<dyn PropertyTarget>>;

type Observer = Box<dyn FnMut(PropertyKey, &Value)>;

/// In-memory property bag implementing [`PropertyTarget`].
pub struct Node {
    id: NodeId,
    values: HashMap<PropertyKey, Value>,
    observers: Vec<(PropertyKey, Observer)>,
}

impl Node {
    pub fn new() -> Self {
        Self {
            id: NodeId::new(),
            values: HashMap::new(),
            observers: Vec::new(),
        }
    }

    /// Builder-style property initialization.
    pub fn with(mut self, property: PropertyKey, value: impl Into<Value>) -> Self {
        self.values.insert(property, value.into());
        self
    }

    pub fn set(&mut self, property: PropertyKey, value: impl Into<Value>) {
        self.write(property, value.into());
    }

    pub fn get(&self, property: PropertyKey) -> Option<&Value> {
        self.values.get(&property)
    }

    /// Register a synchronous observer called on every write to `property`,
    /// in registration order.
    pub fn observe(
        &mut self,
        property: PropertyKey,
        observer: impl FnMut(PropertyKey, &Value) + 'static,
    ) {
        self.observers.push((property, Box::new(observer)));
    }

    /// Wrap this node into the shared handle the engine animates through.
    pub fn into_ref(self) -> TargetRef {
        Rc::new(RefCell::new(self))
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyTarget for Node {
    fn id(&self) -> NodeId {
        self.id
    }

    fn read(&self, property: PropertyKey) -> Option<Value> {
        self.values.get(&property).cloned()
    }

    fn write(&mut self, property: PropertyKey, value: Value) {
        self.values.insert(property, value.clone());
        for (key, observer) in &mut self.observers {
            if *key == property {
                observer(property, &value);
            }
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("values", &self.values)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const OPACITY: PropertyKey = PropertyKey("opacity");
    const LABEL: PropertyKey = PropertyKey("label");

    #[test]
    fn node_ids_are_unique() {
        assert_ne!(Node::new().id(), Node::new().id());
    }

    #[test]
    fn read_write_round_trip() {
        let mut node = Node::new().with(OPACITY, 1.0);
        assert_eq!(node.read(OPACITY).and_then(|v| v.as_float()), Some(1.0));
        assert_eq!(node.read(LABEL), None);

        node.set(LABEL, "ready");
        assert_eq!(node.get(LABEL).and_then(|v| v.as_text().map(String::from)), Some("ready".into()));
    }

    #[test]
    fn observers_fire_on_matching_writes() {
        let seen = Rc::new(Cell::new(0u32));
        let mut node = Node::new();
        let counter = Rc::clone(&seen);
        node.observe(OPACITY, move |_, value| {
            assert!(value.as_float().is_some());
            counter.set(counter.get() + 1);
        });

        node.set(OPACITY, 0.5);
        node.set(LABEL, "ignored");
        node.set(OPACITY, 0.7);
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn target_ref_is_shareable() {
        let target = Node::new().with(OPACITY, 0.0).into_ref();
        let alias = Rc::clone(&target);
        alias.borrow_mut().write(OPACITY, Value::from(1.0));
        assert_eq!(
            target.borrow().read(OPACITY).and_then(|v| v.as_float()),
            Some(1.0)
        );
    }
}
