//! Ordered publish/subscribe primitive for single-threaded event dispatch.
//!
//! A [`Subscription`] is a plain list of callbacks invoked in registration
//! order. Buses can be chained with [`connect`], which registers a forwarder
//! on the source that re-raises every event on a target bus. Forward targets
//! are held weakly: dropping the target bus silently ends the forwarding.
//!
//! Everything here assumes a single logical thread of control; there is no
//! locking and no `Send` bound on callbacks.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Stable identity of one registered subscriber.
pub type SubscriberId = u64;

struct Subscriber<E> {
    id: SubscriberId,
    callback: Rc<dyn Fn(&E)>,
}

/// An ordered list of subscriber callbacks.
pub struct Subscription<E> {
    subscribers: RefCell<Vec<Subscriber<E>>>,
    next_id: Cell<SubscriberId>,
}

impl<E> Default for Subscription<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Subscription<E> {
    /// Create an empty subscription list.
    pub fn new() -> Self {
        Self {
            subscribers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Append a callback and return its id.
    pub fn subscribe(&self, callback: impl Fn(&E) + 'static) -> SubscriberId {
        self.subscribe_rc(Rc::new(callback))
    }

    /// Append an already shared callback and return its id.
    pub fn subscribe_rc(&self, callback: Rc<dyn Fn(&E)>) -> SubscriberId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.subscribers.borrow_mut().push(Subscriber { id, callback });
        id
    }

    /// Remove the first subscriber with the given id, if still present.
    pub fn unsubscribe(&self, id: SubscriberId) {
        let mut subscribers = self.subscribers.borrow_mut();
        if let Some(index) = subscribers.iter().position(|s| s.id == id) {
            subscribers.remove(index);
        }
    }

    /// Synchronously call every currently subscribed callback, in
    /// subscription order, with the same event reference.
    ///
    /// The subscriber list is snapshotted when the dispatch begins, so
    /// callbacks may subscribe or unsubscribe freely while it runs. A
    /// subscriber removed mid-dispatch may still receive this event; one
    /// removed before `invoke` began never does.
    pub fn invoke(&self, event: &E) {
        let snapshot: Vec<Rc<dyn Fn(&E)>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|s| Rc::clone(&s.callback))
            .collect();
        for callback in snapshot {
            callback(event);
        }
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// True when nothing is subscribed.
    pub fn is_empty(&self) -> bool {
        self.subscribers.borrow().is_empty()
    }
}

/// Make every event raised on `source` also invoke on `target`.
///
/// The forwarder keeps only a weak handle on the target bus. Revoke the
/// registration by passing the returned id to `source.unsubscribe`.
pub fn connect<E: 'static>(source: &Subscription<E>, target: &Rc<Subscription<E>>) -> SubscriberId {
    let target: Weak<Subscription<E>> = Rc::downgrade(target);
    source.subscribe(move |event| {
        if let Some(target) = target.upgrade() {
            target.invoke(event);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invokes_in_subscription_order() {
        let bus: Subscription<u32> = Subscription::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let seen = Rc::clone(&seen);
            bus.subscribe(move |event: &u32| seen.borrow_mut().push((tag, *event)));
        }
        bus.invoke(&7);

        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7), ("c", 7)]);
    }

    #[test]
    fn unsubscribed_callback_is_not_invoked() {
        let bus: Subscription<()> = Subscription::new();
        let count = Rc::new(Cell::new(0));

        let counting = {
            let count = Rc::clone(&count);
            bus.subscribe(move |_| count.set(count.get() + 1))
        };
        bus.invoke(&());
        bus.unsubscribe(counting);
        bus.invoke(&());

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn unsubscribe_during_dispatch_does_not_corrupt_the_list() {
        let bus: Rc<Subscription<()>> = Rc::new(Subscription::new());
        let late_calls = Rc::new(Cell::new(0));

        let bus_handle = Rc::clone(&bus);
        let removable = Rc::new(Cell::new(0));
        let removable_id = {
            let removable = Rc::clone(&removable);
            bus.subscribe(move |_| removable.set(removable.get() + 1))
        };
        bus.subscribe(move |_| bus_handle.unsubscribe(removable_id));
        {
            let late_calls = Rc::clone(&late_calls);
            bus.subscribe(move |_| late_calls.set(late_calls.get() + 1));
        }

        bus.invoke(&());
        bus.invoke(&());

        // The removable subscriber saw at most the dispatch that removed it.
        assert_eq!(removable.get(), 1);
        // Later subscribers keep firing on every dispatch.
        assert_eq!(late_calls.get(), 2);
        assert_eq!(bus.len(), 2);
    }

    #[test]
    fn connect_forwards_every_event() {
        let child: Subscription<&'static str> = Subscription::new();
        let parent: Rc<Subscription<&'static str>> = Rc::new(Subscription::new());
        let seen = Rc::new(RefCell::new(Vec::new()));

        {
            let seen = Rc::clone(&seen);
            parent.subscribe(move |event: &&str| seen.borrow_mut().push(*event));
        }
        let forward = connect(&child, &parent);
        child.invoke(&"first");
        child.invoke(&"second");
        child.unsubscribe(forward);
        child.invoke(&"third");

        assert_eq!(*seen.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn forwarding_to_a_dropped_target_is_a_no_op() {
        let child: Subscription<()> = Subscription::new();
        let parent: Rc<Subscription<()>> = Rc::new(Subscription::new());
        connect(&child, &parent);
        drop(parent);

        child.invoke(&());
    }
}
