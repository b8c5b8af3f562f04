//! Synchronous multi-subscriber event bus.
//!
//! Subscribers are stored as `Rc<F>` in registration order. Dispatch never
//! iterates the live list: the emitter takes a [`snapshot`](EventBus::snapshot)
//! first and calls each entry with whatever arguments it needs. This keeps
//! the bus free of any knowledge about its callers while letting callbacks
//! mutate the subscriber list, or the emitter itself, mid-dispatch.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. A subscriber removed during dispatch still receives the event that
//!    was in flight when it was removed; it receives nothing afterwards.
//! 3. A subscriber added during dispatch is not notified of the in-flight
//!    event.
//! 4. [`SubscriberId`]s are never reused by the same bus.

use std::fmt;
use std::rc::Rc;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Raw id value.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Ordered list of subscriber callbacks of type `F`.
pub struct EventBus<F: ?Sized> {
    subscribers: Vec<(SubscriberId, Rc<F>)>,
    next_id: u64,
}

impl<F: ?Sized> Default for EventBus<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ?Sized> fmt::Debug for EventBus<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<F: ?Sized> EventBus<F> {
    /// Create an empty bus.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 1,
        }
    }

    /// Register a subscriber at the end of the list.
    pub fn subscribe(&mut self, subscriber: Rc<F>) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, subscriber));
        tracing::trace!(subscriber = id.0, total = self.subscribers.len(), "subscribed");
        id
    }

    /// Remove the subscriber registered under `id`.
    ///
    /// Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        before != self.subscribers.len()
    }

    /// Remove every registration of `subscriber`, compared by pointer.
    ///
    /// Returns `false` if it was not registered.
    pub fn unsubscribe_rc(&mut self, subscriber: &Rc<F>) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(_, s)| !Rc::ptr_eq(s, subscriber));
        before != self.subscribers.len()
    }

    /// Remove all subscribers. The bus stays usable.
    pub fn clear(&mut self) {
        self.subscribers.clear();
    }

    /// Callbacks to notify for one emission, in registration order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Rc<F>> {
        self.subscribers.iter().map(|(_, s)| Rc::clone(s)).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    type Callback = dyn Fn(&RefCell<Vec<u32>>);

    fn recorder(tag: u32) -> Rc<Callback> {
        Rc::new(move |log: &RefCell<Vec<u32>>| log.borrow_mut().push(tag))
    }

    fn dispatch(bus: &EventBus<Callback>, log: &RefCell<Vec<u32>>) {
        for s in bus.snapshot() {
            s(log);
        }
    }

    #[test]
    fn notifies_in_registration_order() {
        let mut bus = EventBus::<Callback>::new();
        bus.subscribe(recorder(1));
        bus.subscribe(recorder(2));
        bus.subscribe(recorder(3));

        let log = RefCell::new(Vec::new());
        dispatch(&bus, &log);
        assert_eq!(*log.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn unsubscribe_by_id() {
        let mut bus = EventBus::<Callback>::new();
        let a = bus.subscribe(recorder(1));
        bus.subscribe(recorder(2));

        assert!(bus.unsubscribe(a));
        assert!(!bus.unsubscribe(a));

        let log = RefCell::new(Vec::new());
        dispatch(&bus, &log);
        assert_eq!(*log.borrow(), vec![2]);
    }

    #[test]
    fn unsubscribe_by_reference() {
        let mut bus = EventBus::<Callback>::new();
        let shared = recorder(7);
        bus.subscribe(Rc::clone(&shared));
        bus.subscribe(recorder(8));

        assert!(bus.unsubscribe_rc(&shared));
        assert!(!bus.unsubscribe_rc(&shared));
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn clear_then_subscribe_again() {
        let mut bus = EventBus::<Callback>::new();
        bus.subscribe(recorder(1));
        bus.clear();
        assert!(bus.is_empty());

        bus.subscribe(recorder(2));
        let log = RefCell::new(Vec::new());
        dispatch(&bus, &log);
        assert_eq!(*log.borrow(), vec![2]);
    }

    #[test]
    fn ids_are_not_reused() {
        let mut bus = EventBus::<Callback>::new();
        let a = bus.subscribe(recorder(1));
        bus.unsubscribe(a);
        let b = bus.subscribe(recorder(1));
        assert_ne!(a, b);
        assert!(b.id() > a.id());
    }

    #[test]
    fn snapshot_is_detached_from_live_list() {
        let mut bus = EventBus::<Callback>::new();
        let a = bus.subscribe(recorder(1));
        bus.subscribe(recorder(2));

        let snapshot = bus.snapshot();
        bus.unsubscribe(a);
        bus.subscribe(recorder(3));

        let log = RefCell::new(Vec::new());
        for s in snapshot {
            s(&log);
        }
        assert_eq!(*log.borrow(), vec![1, 2]);
    }
}
