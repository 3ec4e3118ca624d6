//! Raw transport events, normalized input events, and the subscriber registry.

use std::collections::BTreeMap;

use crate::address::Coordinate;

/// Transport-level event, before address translation.
///
/// One tagged type covers both hardware message kinds so a single
/// classification routine can dispatch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEvent {
    /// Note message: grid pads and right-side controls.
    Note { key: u8, velocity: u8 },
    /// Control-change message: top-row controls.
    Control { controller: u8, value: u8 },
}

/// Normalized button press at a grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub coordinate: Coordinate,
}

impl InputEvent {
    pub const fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }

    /// Column of the button press.
    pub const fn x(&self) -> u8 {
        self.coordinate.x
    }

    /// Row of the button press.
    pub const fn y(&self) -> u8 {
        self.coordinate.y
    }
}

/// Callback invoked for each delivered [`InputEvent`].
pub type InputEventHandler = Box<dyn FnMut(&InputEvent) + Send + 'static>;

/// Handle returned by [`SubscriberRegistry::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Ordered set of input-event subscribers.
///
/// Delivery iterates in subscription order, synchronously on the calling
/// thread.
#[derive(Default)]
pub struct SubscriberRegistry {
    next_id: u64,
    handlers: BTreeMap<SubscriptionId, InputEventHandler>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler and return its subscription handle.
    pub fn subscribe(&mut self, handler: InputEventHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.insert(id, handler);
        id
    }

    /// Remove a handler. Returns false if the id was never registered or was
    /// already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.handlers.remove(&id).is_some()
    }

    /// Deliver an event to every subscriber in subscription order.
    pub fn emit(&mut self, event: &InputEvent) {
        for handler in self.handlers.values_mut() {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
