//! Event bus owned by an application context
//!
//! There is no process-wide emitter: whoever owns the bus hands out
//! `&mut EventBus` to the code that needs to publish or subscribe.

use std::collections::VecDeque;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<E> = Box<dyn FnMut(&E)>;

/// Synchronous publish/subscribe channel for events of type `E`.
pub struct EventBus<E> {
    handlers: Vec<(SubscriptionId, Handler<E>)>,
    queue: VecDeque<E>,
    next_id: u64,
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            queue: VecDeque::new(),
            next_id: 0,
        }
    }

    /// Register a handler. Handlers run in subscription order.
    pub fn subscribe<F: FnMut(&E) + 'static>(&mut self, handler: F) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Remove a handler. Returns `true` if it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sid, _)| *sid != id);
        self.handlers.len() != before
    }

    /// Deliver an event to every handler immediately.
    pub fn emit(&mut self, event: &E) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }

    /// Queue an event for the next [`flush`](Self::flush).
    pub fn push(&mut self, event: E) {
        self.queue.push_back(event);
    }

    /// Deliver all queued events in the order they were pushed.
    /// Returns the number of events delivered.
    pub fn flush(&mut self) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.queue.pop_front() {
            self.emit(&event);
            delivered += 1;
        }
        delivered
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emit_reaches_handlers_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let log1 = log.clone();
        bus.subscribe(move |e: &u32| log1.borrow_mut().push(("first", *e)));
        let log2 = log.clone();
        bus.subscribe(move |e: &u32| log2.borrow_mut().push(("second", *e)));

        bus.emit(&7);
        assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let c = count.clone();
        let id = bus.subscribe(move |_: &()| *c.borrow_mut() += 1);

        bus.emit(&());
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(&());
        assert_eq!(*count.borrow(), 1);
        assert!(bus.is_empty());
    }

    #[test]
    fn flush_delivers_queue_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let l = log.clone();
        bus.subscribe(move |e: &&str| l.borrow_mut().push(*e));

        bus.push("resize");
        bus.push("pointer");
        assert!(log.borrow().is_empty());
        assert_eq!(bus.flush(), 2);
        assert_eq!(*log.borrow(), vec!["resize", "pointer"]);
        assert_eq!(bus.flush(), 0);
    }

    #[test]
    fn separate_buses_are_independent() {
        let mut a: EventBus<u8> = EventBus::new();
        let b: EventBus<u8> = EventBus::new();
        a.subscribe(|_| {});
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 0);
    }
}
