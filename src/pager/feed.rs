// Scroll offset stream with scoped listener registration.
// The widget pushes adjustment values in; handlers live only as long as their
// ScrollSubscription guard.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Handler = Rc<dyn Fn(f64)>;

#[derive(Default)]
struct FeedInner {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(u64, Handler)>>,
}

impl FeedInner {
    fn is_registered(&self, id: u64) -> bool {
        self.handlers.borrow().iter().any(|(hid, _)| *hid == id)
    }

    fn remove(&self, id: u64) {
        self.handlers.borrow_mut().retain(|(hid, _)| *hid != id);
    }
}

/// Single-threaded broadcast of horizontal scroll offsets.
#[derive(Clone, Default)]
pub struct ScrollFeed {
    inner: Rc<FeedInner>,
}

impl std::fmt::Debug for ScrollFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollFeed")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl ScrollFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler. It stays registered until the returned guard is
    /// dropped or released.
    #[must_use = "dropping the subscription unregisters the handler"]
    pub fn subscribe<F>(&self, handler: F) -> ScrollSubscription
    where
        F: Fn(f64) + 'static,
    {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .handlers
            .borrow_mut()
            .push((id, Rc::new(handler)));
        ScrollSubscription {
            feed: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Delivers an offset to every registered handler, in subscription order.
    ///
    /// Handlers may drop subscriptions while running; a handler released
    /// mid-delivery is not called.
    pub fn emit(&self, offset: f64) {
        let snapshot: Vec<(u64, Handler)> = self.inner.handlers.borrow().clone();
        for (id, handler) in snapshot {
            if self.inner.is_registered(id) {
                handler(offset);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.handlers.borrow().len()
    }
}

/// Guard for a registered scroll handler.
#[derive(Debug)]
pub struct ScrollSubscription {
    feed: Weak<FeedInner>,
    id: u64,
}

impl ScrollSubscription {
    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.feed
            .upgrade()
            .is_some_and(|feed| feed.is_registered(self.id))
    }

    /// Unregisters the handler now. Equivalent to dropping the guard.
    #[cfg(test)]
    pub fn release(self) {}
}

impl Drop for ScrollSubscription {
    fn drop(&mut self) {
        if let Some(feed) = self.feed.upgrade() {
            feed.remove(self.id);
        }
    }
}
