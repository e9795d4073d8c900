// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The environment a router runs in.
//!
//! A [`Window`] bundles the three environment services navigation touches: the shared
//! [`History`] handle, [`SessionStorage`], and the ability to reload the document.
//! [`Window::in_memory`] assembles a complete environment without a browser.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use url::Url;

use crate::api::HistoryApi;
use crate::error::HistoryError;
use crate::history::History;
use crate::memory::InMemoryHistory;
use crate::storage::{MemoryStorage, SessionStorage};

type ReloadHandler = dyn Fn(&Window);

struct Inner {
    history: History,
    storage: Rc<dyn SessionStorage>,
    memory: Option<Rc<InMemoryHistory>>,
    reload: RefCell<Option<Rc<ReloadHandler>>>,
    reloads: Cell<u32>,
}

/// Shared handle to the navigation environment.
///
/// Cloning yields another handle to the same environment.
#[derive(Clone)]
pub struct Window {
    inner: Rc<Inner>,
}

impl core::fmt::Debug for Window {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Window")
            .field("location", &self.location().as_str())
            .field("history", &self.inner.history)
            .field("reloads", &self.inner.reloads.get())
            .finish_non_exhaustive()
    }
}

impl Window {
    /// Assemble an environment from host-provided services.
    pub fn new(history: History, storage: Rc<dyn SessionStorage>) -> Self {
        Self::assemble(history, storage, None)
    }

    /// A browserless environment: an [`InMemoryHistory`] seeded with `url` and an empty
    /// [`MemoryStorage`].
    pub fn in_memory(url: &str) -> Result<Self, HistoryError> {
        let url = Url::parse(url).map_err(|source| HistoryError::InvalidUrl {
            url: url.to_owned(),
            source,
        })?;
        let memory = Rc::new(InMemoryHistory::from_url(url));
        let history = History::new(memory.clone());
        Ok(Self::assemble(
            history,
            Rc::new(MemoryStorage::new()),
            Some(memory),
        ))
    }

    fn assemble(
        history: History,
        storage: Rc<dyn SessionStorage>,
        memory: Option<Rc<InMemoryHistory>>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                history,
                storage,
                memory,
                reload: RefCell::new(None),
                reloads: Cell::new(0),
            }),
        }
    }

    /// The shared, interceptable history handle.
    pub fn history(&self) -> &History {
        &self.inner.history
    }

    /// The in-memory history backing this window, if it was built by [`Window::in_memory`].
    pub fn memory_history(&self) -> Option<Rc<InMemoryHistory>> {
        self.inner.memory.clone()
    }

    /// Session-scoped storage.
    pub fn storage(&self) -> Rc<dyn SessionStorage> {
        Rc::clone(&self.inner.storage)
    }

    /// The live location.
    pub fn location(&self) -> Url {
        self.inner.history.current_url()
    }

    /// Set what [`reload`](Self::reload) does. Replaces any previous handler.
    pub fn set_reload_handler(&self, handler: impl Fn(&Self) + 'static) {
        *self.inner.reload.borrow_mut() = Some(Rc::new(handler));
    }

    /// Reload the document.
    ///
    /// Runs the reload handler, if any, and counts the reload either way.
    pub fn reload(&self) {
        self.inner.reloads.set(self.inner.reloads.get() + 1);
        tracing::debug!(url = %self.location(), "reloading");
        let handler = self.inner.reload.borrow().clone();
        if let Some(handler) = handler {
            handler(self);
        }
    }

    /// Number of times [`reload`](Self::reload) has run.
    pub fn reload_count(&self) -> u32 {
        self.inner.reloads.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn in_memory_window_tracks_history() {
        let window = Window::in_memory("https://app.test/start").unwrap();
        assert_eq!(window.location().path(), "/start");
        window
            .history()
            .push_state(json!(null), "", Some("/next"))
            .unwrap();
        assert_eq!(window.location().path(), "/next");
        let memory = window.memory_history().unwrap();
        assert_eq!(memory.length(), 2);
        assert_eq!(memory.location().url().path(), "/next");
    }

    #[test]
    fn rejects_unparsable_url() {
        assert!(matches!(
            Window::in_memory("not a url"),
            Err(HistoryError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn reload_runs_handler_and_counts() {
        let window = Window::in_memory("https://app.test/").unwrap();
        window.reload();
        let seen = Rc::new(Cell::new(0));
        let sink = Rc::clone(&seen);
        window.set_reload_handler(move |w| sink.set(w.reload_count()));
        window.reload();
        assert_eq!(window.reload_count(), 2);
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn storage_is_shared_between_clones() {
        let window = Window::in_memory("https://app.test/").unwrap();
        let other = window.clone();
        window.storage().set("k", "v").unwrap();
        assert_eq!(other.storage().get("k").unwrap().as_deref(), Some("v"));
    }
}
