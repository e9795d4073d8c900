// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The location cell: current URL plus opaque state.
//!
//! ## Overview
//!
//! [`LocationState`] is the single piece of truth every other component reads and writes.
//! It does no validation. Writes notify subscribers synchronously, in subscription order,
//! after the new value is in place.
//!
//! ## Caching
//!
//! [`LocationState::revision`] increases on every URL write. Values derived from the URL
//! (for example parsed hash paths) can be cached against it and recomputed only when it moves.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;
use url::Url;

use crate::listeners::{ListenerId, Listeners};

/// A point-in-time copy of a [`LocationState`].
#[derive(Clone, Debug, PartialEq)]
pub struct LocationSnapshot {
    /// Full URL, including query and fragment.
    pub url: Url,
    /// Opaque state associated with the entry.
    pub state: Value,
}

type Subscriber = dyn Fn(&LocationSnapshot);

struct Inner {
    current: RefCell<LocationSnapshot>,
    revision: Cell<u64>,
    subscribers: RefCell<Listeners<Subscriber>>,
    disposed: Cell<bool>,
}

/// Shared, mutable `(url, state)` pair.
///
/// Cloning yields another handle to the same cell.
#[derive(Clone)]
pub struct LocationState {
    inner: Rc<Inner>,
}

impl core::fmt::Debug for LocationState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LocationState")
            .field("current", &*self.inner.current.borrow())
            .field("revision", &self.inner.revision.get())
            .field("disposed", &self.inner.disposed.get())
            .finish_non_exhaustive()
    }
}

impl LocationState {
    /// Create a cell holding `url` and `state`.
    pub fn new(url: Url, state: Value) -> Self {
        Self {
            inner: Rc::new(Inner {
                current: RefCell::new(LocationSnapshot { url, state }),
                revision: Cell::new(0),
                subscribers: RefCell::new(Listeners::new()),
                disposed: Cell::new(false),
            }),
        }
    }

    /// Current URL.
    pub fn url(&self) -> Url {
        self.inner.current.borrow().url.clone()
    }

    /// Current state.
    pub fn state(&self) -> Value {
        self.inner.current.borrow().state.clone()
    }

    /// Current URL and state.
    pub fn snapshot(&self) -> LocationSnapshot {
        self.inner.current.borrow().clone()
    }

    /// Run `f` against the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&LocationSnapshot) -> R) -> R {
        f(&self.inner.current.borrow())
    }

    /// Counter bumped on every URL write.
    pub fn revision(&self) -> u64 {
        self.inner.revision.get()
    }

    /// Replace the URL.
    pub fn set_url(&self, url: Url) {
        self.inner.current.borrow_mut().url = url;
        self.bump();
        self.notify();
    }

    /// Replace the state.
    pub fn set_state(&self, state: Value) {
        self.inner.current.borrow_mut().state = state;
        self.notify();
    }

    /// Replace both, with a single notification.
    pub fn set(&self, url: Url, state: Value) {
        *self.inner.current.borrow_mut() = LocationSnapshot { url, state };
        self.bump();
        self.notify();
    }

    /// Observe every subsequent write.
    pub fn subscribe(&self, subscriber: impl Fn(&LocationSnapshot) + 'static) -> ListenerId {
        self.inner
            .subscribers
            .borrow_mut()
            .insert(Rc::new(subscriber))
    }

    /// Stop observing. Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.subscribers.borrow_mut().remove(id)
    }

    /// Release every subscription. Later writes still land but notify nobody.
    ///
    /// Calling this more than once has no further effect.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        self.inner.subscribers.borrow_mut().clear();
    }

    /// True once [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// True if both handles refer to the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn bump(&self) {
        self.inner.revision.set(self.inner.revision.get() + 1);
    }

    fn notify(&self) {
        if self.inner.disposed.get() {
            return;
        }
        let subscribers = self.inner.subscribers.borrow().snapshot();
        if subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for subscriber in subscribers {
            subscriber(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn reads_and_writes() {
        let loc = LocationState::new(url("https://x/a"), json!(null));
        loc.set_url(url("https://x/b"));
        loc.set_state(json!({ "k": 1 }));
        assert_eq!(loc.url().as_str(), "https://x/b");
        assert_eq!(loc.state(), json!({ "k": 1 }));
        assert_eq!(loc.with(|s| s.url.path().to_owned()), "/b");
    }

    #[test]
    fn revision_tracks_url_writes_only() {
        let loc = LocationState::new(url("https://x/"), json!(null));
        assert_eq!(loc.revision(), 0);
        loc.set_state(json!(1));
        assert_eq!(loc.revision(), 0);
        loc.set_url(url("https://x/1"));
        loc.set(url("https://x/2"), json!(2));
        assert_eq!(loc.revision(), 2);
    }

    #[test]
    fn subscribers_see_new_value_in_order() {
        let loc = LocationState::new(url("https://x/"), json!(null));
        let seen = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second"] {
            let seen = Rc::clone(&seen);
            loc.subscribe(move |s| seen.borrow_mut().push((tag, s.url.path().to_owned())));
        }
        loc.set(url("https://x/next"), json!(null));
        assert_eq!(
            *seen.borrow(),
            vec![("first", "/next".to_owned()), ("second", "/next".to_owned())]
        );
    }

    #[test]
    fn unsubscribe_and_dispose() {
        let loc = LocationState::new(url("https://x/"), json!(null));
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let id = loc.subscribe(move |_| counter.set(counter.get() + 1));
        loc.set_state(json!(1));
        assert!(loc.unsubscribe(id));
        loc.set_state(json!(2));
        assert_eq!(hits.get(), 1);

        let counter = Rc::clone(&hits);
        loc.subscribe(move |_| counter.set(counter.get() + 1));
        loc.dispose();
        loc.dispose();
        assert!(loc.is_disposed());
        loc.set_state(json!(3));
        assert_eq!(hits.get(), 1);
        assert_eq!(loc.state(), json!(3));
    }

    #[test]
    fn clones_share_the_cell() {
        let a = LocationState::new(url("https://x/"), json!(null));
        let b = a.clone();
        b.set_state(json!("shared"));
        assert_eq!(a.state(), json!("shared"));
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn subscriber_may_write_back() {
        let loc = LocationState::new(url("https://x/"), json!(0));
        let handle = loc.clone();
        loc.subscribe(move |s| {
            if s.state == json!(1) {
                handle.set_state(json!(2));
            }
        });
        loc.set_state(json!(1));
        assert_eq!(loc.state(), json!(2));
    }
}
