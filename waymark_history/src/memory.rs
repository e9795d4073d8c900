// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory session history.
//!
//! ## Overview
//!
//! [`InMemoryHistory`] reproduces the [`HistoryApi`] contract without a browser, for
//! embedded or headless contexts and for tests. It is a stack of [`HistoryEntry`] values plus
//! a current index.
//!
//! - `push_state` truncates everything after the current index, then appends.
//! - `replace_state` overwrites the current entry, or appends when the stack is empty.
//! - `go`, `back` and `forward` apply only when the target index is in range; otherwise
//!   nothing happens.
//!
//! After every change the current entry is mirrored into the [`LocationState`] the history
//! was built on, until [`InMemoryHistory::dispose`] is called. Traversals then notify
//! popstate listeners.
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use url::Url;
//! use waymark_history::{HistoryApi, InMemoryHistory};
//!
//! let history = InMemoryHistory::from_url(Url::parse("https://app.test/").unwrap());
//! history.push_state(json!(1), "", Some("/a"))?;
//! history.push_state(json!(2), "", Some("/b"))?;
//! history.back();
//! assert_eq!(history.location().url().path(), "/a");
//! assert_eq!(history.length(), 3);
//! # Ok::<(), waymark_history::HistoryError>(())
//! ```

use std::cell::{Cell, RefCell};

use serde_json::Value;
use url::Url;

use crate::api::{HistoryApi, PopStateEvent, PopStateListener, ScrollRestoration};
use crate::error::HistoryError;
use crate::listeners::{ListenerId, Listeners};
use crate::location::LocationState;

/// One entry of the in-memory stack.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    /// State stored with the entry.
    pub state: Value,
    /// Title argument given when the entry was written.
    pub title: String,
    /// Absolute URL of the entry.
    pub url: Url,
}

#[derive(Debug, Default)]
struct Stack {
    entries: Vec<HistoryEntry>,
    // `None` until the first entry exists.
    index: Option<usize>,
}

impl Stack {
    fn current(&self) -> Option<&HistoryEntry> {
        self.index.map(|i| &self.entries[i])
    }
}

/// Stack-backed [`HistoryApi`] implementation.
pub struct InMemoryHistory {
    stack: RefCell<Stack>,
    location: LocationState,
    mirroring: Cell<bool>,
    scroll_restoration: Cell<ScrollRestoration>,
    popstate: RefCell<Listeners<dyn Fn(&PopStateEvent)>>,
}

impl core::fmt::Debug for InMemoryHistory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let stack = self.stack.borrow();
        f.debug_struct("InMemoryHistory")
            .field("length", &stack.entries.len())
            .field("index", &stack.index)
            .field("mirroring", &self.mirroring.get())
            .finish_non_exhaustive()
    }
}

impl InMemoryHistory {
    /// Build an empty history over `location`.
    ///
    /// Until the first entry is written the current index is `None` and the location keeps
    /// whatever it was created with.
    pub fn new(location: LocationState) -> Self {
        Self {
            stack: RefCell::new(Stack::default()),
            location,
            mirroring: Cell::new(true),
            scroll_restoration: Cell::new(ScrollRestoration::default()),
            popstate: RefCell::new(Listeners::new()),
        }
    }

    /// Build a history holding a single entry for `url`, like a freshly opened tab.
    pub fn from_url(url: Url) -> Self {
        let history = Self::new(LocationState::new(url.clone(), Value::Null));
        history.stack.borrow_mut().entries.push(HistoryEntry {
            state: Value::Null,
            title: String::new(),
            url,
        });
        history.stack.borrow_mut().index = Some(0);
        history
    }

    /// The location cell mirrored from the current entry.
    pub fn location(&self) -> LocationState {
        self.location.clone()
    }

    /// Index of the current entry, `None` before the first entry.
    pub fn current_index(&self) -> Option<usize> {
        self.stack.borrow().index
    }

    /// The current entry.
    pub fn current_entry(&self) -> Option<HistoryEntry> {
        self.stack.borrow().current().cloned()
    }

    /// Copy of the whole stack, oldest first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.stack.borrow().entries.clone()
    }

    /// Stop mirroring entries into the location cell.
    ///
    /// Calling this more than once has no further effect.
    pub fn dispose(&self) {
        if self.mirroring.replace(false) {
            tracing::debug!("in-memory history stopped mirroring");
        }
    }

    fn base_url(&self) -> Url {
        match self.stack.borrow().current() {
            Some(entry) => entry.url.clone(),
            None => self.location.url(),
        }
    }

    fn resolve(&self, url: Option<&str>) -> Result<Url, HistoryError> {
        let base = self.base_url();
        let Some(url) = url else {
            return Ok(base);
        };
        let target = base.join(url).map_err(|source| HistoryError::InvalidUrl {
            url: url.to_owned(),
            source,
        })?;
        let origin = base.origin();
        if origin.is_tuple() && origin != target.origin() {
            return Err(HistoryError::CrossOrigin {
                origin: origin.ascii_serialization(),
                target: target.into(),
            });
        }
        Ok(target)
    }

    fn mirror(&self) {
        if !self.mirroring.get() {
            return;
        }
        let current = self.stack.borrow().current().cloned();
        if let Some(entry) = current {
            self.location.set(entry.url, entry.state);
        }
    }
}

impl HistoryApi for InMemoryHistory {
    fn push_state(&self, state: Value, title: &str, url: Option<&str>) -> Result<(), HistoryError> {
        let url = self.resolve(url)?;
        {
            let mut stack = self.stack.borrow_mut();
            let keep = stack.index.map_or(0, |i| i + 1);
            stack.entries.truncate(keep);
            stack.entries.push(HistoryEntry {
                state,
                title: title.to_owned(),
                url,
            });
            stack.index = Some(stack.entries.len() - 1);
        }
        self.mirror();
        Ok(())
    }

    fn replace_state(
        &self,
        state: Value,
        title: &str,
        url: Option<&str>,
    ) -> Result<(), HistoryError> {
        let url = self.resolve(url)?;
        {
            let mut stack = self.stack.borrow_mut();
            let entry = HistoryEntry {
                state,
                title: title.to_owned(),
                url,
            };
            match stack.index {
                Some(i) => stack.entries[i] = entry,
                None => {
                    stack.entries.push(entry);
                    stack.index = Some(0);
                }
            }
        }
        self.mirror();
        Ok(())
    }

    fn go(&self, delta: isize) {
        let event = {
            let mut stack = self.stack.borrow_mut();
            let Some(index) = stack.index else {
                tracing::trace!(delta, "ignoring history move on an empty stack");
                return;
            };
            let target = index.checked_add_signed(delta);
            match target {
                Some(t) if t != index && t < stack.entries.len() => {
                    stack.index = Some(t);
                    let entry = &stack.entries[t];
                    PopStateEvent {
                        url: entry.url.clone(),
                        state: entry.state.clone(),
                    }
                }
                _ => {
                    tracing::trace!(delta, index, "ignoring out-of-range history move");
                    return;
                }
            }
        };
        self.mirror();
        let listeners = self.popstate.borrow().snapshot();
        for listener in listeners {
            listener(&event);
        }
    }

    fn length(&self) -> usize {
        self.stack.borrow().entries.len()
    }

    fn state(&self) -> Value {
        self.stack
            .borrow()
            .current()
            .map_or(Value::Null, |entry| entry.state.clone())
    }

    fn current_url(&self) -> Url {
        self.base_url()
    }

    fn scroll_restoration(&self) -> ScrollRestoration {
        self.scroll_restoration.get()
    }

    fn set_scroll_restoration(&self, value: ScrollRestoration) {
        self.scroll_restoration.set(value);
    }

    fn add_popstate_listener(&self, listener: PopStateListener) -> ListenerId {
        self.popstate.borrow_mut().insert(listener)
    }

    fn remove_popstate_listener(&self, id: ListenerId) -> bool {
        self.popstate.borrow_mut().remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::rc::Rc;

    fn base() -> Url {
        Url::parse("https://app.test/").unwrap()
    }

    fn paths(history: &InMemoryHistory) -> Vec<String> {
        history
            .entries()
            .iter()
            .map(|e| e.url.path().to_owned())
            .collect()
    }

    #[test]
    fn empty_history_has_no_current_entry() {
        let history = InMemoryHistory::new(LocationState::new(base(), json!(null)));
        assert_eq!(history.current_index(), None);
        assert_eq!(history.length(), 0);
        assert!(history.current_entry().is_none());
        assert_eq!(history.state(), json!(null));
        history.back();
        assert_eq!(history.current_index(), None);
    }

    #[test]
    fn push_after_back_discards_forward_entries() {
        let history = InMemoryHistory::new(LocationState::new(base(), json!(null)));
        for p in ["/a", "/b", "/c"] {
            history.push_state(json!(p), "", Some(p)).unwrap();
        }
        assert_eq!(history.current_index(), Some(2));
        history.back();
        history.push_state(json!("/d"), "", Some("/d")).unwrap();
        assert_eq!(paths(&history), vec!["/a", "/b", "/d"]);
        assert_eq!(history.current_index(), Some(2));
    }

    #[test]
    fn out_of_range_go_is_ignored() {
        let history = InMemoryHistory::new(LocationState::new(base(), json!(null)));
        for p in ["/a", "/b", "/c"] {
            history.push_state(json!(null), "", Some(p)).unwrap();
        }
        history.go(5);
        assert_eq!(history.current_index(), Some(2));
        history.go(-3);
        assert_eq!(history.current_index(), Some(2));
        history.forward();
        assert_eq!(history.current_index(), Some(2));
        history.go(-2);
        assert_eq!(history.current_index(), Some(0));
    }

    #[test]
    fn replace_on_empty_appends() {
        let history = InMemoryHistory::new(LocationState::new(base(), json!(null)));
        history.replace_state(json!(1), "t", Some("/r")).unwrap();
        assert_eq!(history.length(), 1);
        assert_eq!(history.current_index(), Some(0));
        history.replace_state(json!(2), "t", Some("/s")).unwrap();
        assert_eq!(paths(&history), vec!["/s"]);
        assert_eq!(history.state(), json!(2));
    }

    #[test]
    fn location_mirrors_current_entry() {
        let history = InMemoryHistory::from_url(base());
        let location = history.location();
        history.push_state(json!({ "n": 1 }), "", Some("/one?q=1#f")).unwrap();
        assert_eq!(location.url().as_str(), "https://app.test/one?q=1#f");
        assert_eq!(location.state(), json!({ "n": 1 }));
        history.back();
        assert_eq!(location.url().as_str(), "https://app.test/");
        assert_eq!(location.state(), json!(null));
    }

    #[test]
    fn dispose_stops_mirroring() {
        let history = InMemoryHistory::from_url(base());
        let location = history.location();
        history.dispose();
        history.dispose();
        history.push_state(json!(1), "", Some("/gone")).unwrap();
        assert_eq!(location.url().path(), "/");
        assert_eq!(history.current_url().path(), "/gone");
    }

    #[test]
    fn traversal_notifies_popstate() {
        let history = InMemoryHistory::from_url(base());
        history.push_state(json!("a"), "", Some("/a")).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = history.add_popstate_listener(Rc::new(move |e: &PopStateEvent| {
            sink.borrow_mut().push((e.url.path().to_owned(), e.state.clone()));
        }));
        history.back();
        history.back();
        history.forward();
        assert_eq!(
            *seen.borrow(),
            vec![("/".to_owned(), json!(null)), ("/a".to_owned(), json!("a"))]
        );
        assert!(history.remove_popstate_listener(id));
        history.back();
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn push_does_not_notify_popstate() {
        let history = InMemoryHistory::from_url(base());
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        history.add_popstate_listener(Rc::new(move |_: &PopStateEvent| {
            counter.set(counter.get() + 1);
        }));
        history.push_state(json!(null), "", Some("/a")).unwrap();
        history.replace_state(json!(null), "", None).unwrap();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn missing_url_keeps_current() {
        let history = InMemoryHistory::from_url(Url::parse("https://app.test/x#h").unwrap());
        history.push_state(json!(7), "", None).unwrap();
        assert_eq!(history.current_url().as_str(), "https://app.test/x#h");
        assert_eq!(history.length(), 2);
    }

    #[test]
    fn cross_origin_and_invalid_urls_are_rejected() {
        let history = InMemoryHistory::from_url(base());
        let err = history
            .push_state(json!(null), "", Some("https://elsewhere.test/"))
            .unwrap_err();
        assert!(matches!(err, HistoryError::CrossOrigin { .. }));
        let err = history
            .push_state(json!(null), "", Some("http://[::1"))
            .unwrap_err();
        assert!(matches!(err, HistoryError::InvalidUrl { .. }));
        assert_eq!(history.length(), 1);
    }

    #[test]
    fn scroll_restoration_is_stored() {
        let history = InMemoryHistory::from_url(base());
        assert_eq!(history.scroll_restoration(), ScrollRestoration::Auto);
        history.set_scroll_restoration(ScrollRestoration::Manual);
        assert_eq!(history.scroll_restoration(), ScrollRestoration::Manual);
    }
}
