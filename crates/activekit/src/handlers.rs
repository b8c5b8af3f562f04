//! Per-event-type dispatch for subscribers.
//!
//! [`EventHandlers`] maps event types to callbacks so a consumer can react
//! to a few kinds of change without matching on every variant itself. It
//! is turned into an ordinary subscriber with
//! [`into_subscriber`](EventHandlers::into_subscriber).
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use activekit::{ActionOptions, ActiveList, ActiveListConfig, ActiveListEventType, EventHandlers};
//!
//! let activations = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&activations);
//! let handlers = EventHandlers::new()
//!     .on(ActiveListEventType::Activated, move |_, _| counter.set(counter.get() + 1));
//!
//! let mut list = ActiveList::new(ActiveListConfig::new(["a", "b"]))?;
//! list.subscribe_rc(handlers.into_subscriber());
//! list.activate_by_index(1, ActionOptions::default())?;
//! assert_eq!(activations.get(), 1);
//! # Ok::<(), activekit::ActiveListError>(())
//! ```

use std::fmt;
use std::rc::Rc;

use activekit_core::{ActiveListEvent, ActiveListEventType};
use ahash::AHashMap;

use crate::list::{ActiveList, Subscriber};

/// Dispatch table from event type to handler.
pub struct EventHandlers<T> {
    handlers: AHashMap<ActiveListEventType, Rc<Subscriber<T>>>,
    fallback: Option<Rc<Subscriber<T>>>,
}

impl<T> Default for EventHandlers<T> {
    fn default() -> Self {
        Self {
            handlers: AHashMap::new(),
            fallback: None,
        }
    }
}

impl<T> EventHandlers<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle events of `event_type`, replacing any previous handler.
    #[must_use]
    pub fn on(
        mut self,
        event_type: ActiveListEventType,
        handler: impl Fn(&mut ActiveList<T>, &ActiveListEvent<T>) + 'static,
    ) -> Self {
        self.handlers.insert(event_type, Rc::new(handler));
        self
    }

    /// Handle every event type without its own handler.
    #[must_use]
    pub fn otherwise(
        mut self,
        handler: impl Fn(&mut ActiveList<T>, &ActiveListEvent<T>) + 'static,
    ) -> Self {
        self.fallback = Some(Rc::new(handler));
        self
    }

    #[must_use]
    pub fn handles(&self, event_type: ActiveListEventType) -> bool {
        self.fallback.is_some() || self.handlers.contains_key(&event_type)
    }

    /// Route `event` to its handler. Returns whether one ran.
    pub fn dispatch(&self, list: &mut ActiveList<T>, event: &ActiveListEvent<T>) -> bool {
        let handler = self
            .handlers
            .get(&event.event_type())
            .or(self.fallback.as_ref());
        match handler {
            Some(handler) => {
                handler(list, event);
                true
            }
            None => false,
        }
    }
}

impl<T: 'static> EventHandlers<T> {
    /// Wrap the table as a subscriber.
    #[must_use]
    pub fn into_subscriber(self) -> Rc<Subscriber<T>> {
        Rc::new(move |list: &mut ActiveList<T>, event: &ActiveListEvent<T>| {
            self.dispatch(list, event);
        })
    }
}

impl<T> fmt::Debug for EventHandlers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.handlers.keys().map(|t| t.as_str()).collect();
        types.sort_unstable();
        f.debug_struct("EventHandlers")
            .field("types", &types)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ActionOptions, ActiveListConfig};
    use std::cell::RefCell;

    #[test]
    fn routes_by_type_with_fallback() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (on_activate, on_other) = (Rc::clone(&log), Rc::clone(&log));
        let handlers = EventHandlers::new()
            .on(ActiveListEventType::Activated, move |_, _| {
                on_activate.borrow_mut().push("activated");
            })
            .otherwise(move |_, event: &ActiveListEvent<&'static str>| {
                on_other.borrow_mut().push(event.event_type().as_str());
            });
        assert!(handlers.handles(ActiveListEventType::Moved));

        let mut list = ActiveList::new(ActiveListConfig::new(["a", "b"])).unwrap();
        list.subscribe_rc(handlers.into_subscriber());
        list.activate_by_index(0, ActionOptions::default()).unwrap();
        list.swap_by_index(0, 1).unwrap();
        assert_eq!(*log.borrow(), vec!["activated", "SWAPPED"]);
    }

    #[test]
    fn unhandled_types_are_skipped() {
        let handlers: EventHandlers<u8> =
            EventHandlers::new().on(ActiveListEventType::Removed, |_, _| {});
        assert!(!handlers.handles(ActiveListEventType::Inserted));
        let mut list = ActiveList::new(ActiveListConfig::new([1u8])).unwrap();
        let event = ActiveListEvent::new(
            activekit_core::ActiveListEventKind::Inserted { index: 0, value: 1 },
            std::time::Duration::ZERO,
        );
        assert!(!handlers.dispatch(&mut list, &event));
        assert_eq!(
            format!("{handlers:?}"),
            "EventHandlers { types: [\"REMOVED\"], fallback: false }"
        );
    }

    #[test]
    fn handler_may_reenter_list() {
        let handlers = EventHandlers::<&'static str>::new().on(ActiveListEventType::Inserted, |list, _| {
            if list.len() < 3 {
                list.push("auto");
            }
        });
        let mut list = ActiveList::new(ActiveListConfig::new(["a"])).unwrap();
        list.subscribe_rc(handlers.into_subscriber());
        list.push("b");
        assert_eq!(list.len(), 3);
        assert_eq!(list.contents()[2].value(), &"auto");
    }
}
