// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The process-wide history handle and its mutation hook.
//!
//! ## Overview
//!
//! [`History`] is what every caller navigates through: this library, third-party routers,
//! application code. It wraps the native [`HistoryApi`] and, optionally, one
//! [`MutationHook`].
//!
//! - With no hook, `push_state` and `replace_state` go straight to the native primitives.
//! - With a hook, both are handed to the hook as a [`Mutation`] together with the native
//!   history, and the hook decides whether and how to commit.
//! - `go`, `back`, `forward`, `length`, scroll restoration and popstate are never routed
//!   through the hook.
//!
//! ## Installation
//!
//! [`History::install`] captures the hook and returns a [`HookId`]. A second install while one
//! is present fails with [`HistoryError::AlreadyIntercepted`]; hooks never wrap hooks.
//! [`History::uninstall`] removes the hook only when given the id it was installed under,
//! after which the native primitives are reached directly again.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;
use url::Url;

use crate::api::{
    HistoryApi, Method, Mutation, NavigationOutcome, PopStateListener, ScrollRestoration,
};
use crate::error::HistoryError;
use crate::listeners::ListenerId;

/// Receives every call to the two mutation primitives while installed.
pub trait MutationHook {
    /// Handle `mutation`. Committing it means calling [`Mutation::commit_to`] with `native`
    /// (or the equivalent primitive directly) and returning
    /// [`NavigationOutcome::Committed`]; a dropped mutation reports
    /// [`NavigationOutcome::Cancelled`].
    fn intercept(
        &self,
        mutation: Mutation,
        native: &dyn HistoryApi,
    ) -> Result<NavigationOutcome, HistoryError>;
}

/// Identifies an installed hook.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HookId(u64);

struct Installed {
    id: HookId,
    hook: Rc<dyn MutationHook>,
}

struct Inner {
    native: Rc<dyn HistoryApi>,
    hook: RefCell<Option<Installed>>,
    installs: Cell<u64>,
}

/// Shared, interceptable history handle.
///
/// Cloning yields another handle to the same history and the same hook slot.
#[derive(Clone)]
pub struct History {
    inner: Rc<Inner>,
}

impl core::fmt::Debug for History {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("History")
            .field("length", &self.inner.native.length())
            .field("intercepted", &self.is_intercepted())
            .finish_non_exhaustive()
    }
}

impl History {
    /// Wrap the native history.
    pub fn new(native: Rc<dyn HistoryApi>) -> Self {
        Self {
            inner: Rc::new(Inner {
                native,
                hook: RefCell::new(None),
                installs: Cell::new(0),
            }),
        }
    }

    /// The original primitives, bypassing any hook.
    pub fn native(&self) -> Rc<dyn HistoryApi> {
        Rc::clone(&self.inner.native)
    }

    /// Route all mutation calls through `hook`.
    pub fn install(&self, hook: Rc<dyn MutationHook>) -> Result<HookId, HistoryError> {
        let mut slot = self.inner.hook.borrow_mut();
        if slot.is_some() {
            return Err(HistoryError::AlreadyIntercepted);
        }
        let id = HookId(self.inner.installs.get() + 1);
        self.inner.installs.set(id.0);
        *slot = Some(Installed { id, hook });
        tracing::debug!(hook = id.0, "history mutation hook installed");
        Ok(id)
    }

    /// Remove the hook installed under `id`, restoring direct native dispatch.
    ///
    /// Returns false (and changes nothing) if `id` is not the installed hook.
    pub fn uninstall(&self, id: HookId) -> bool {
        let mut slot = self.inner.hook.borrow_mut();
        match slot.as_ref() {
            Some(installed) if installed.id == id => {
                *slot = None;
                tracing::debug!(hook = id.0, "history mutation hook removed");
                true
            }
            _ => false,
        }
    }

    /// True while a hook is installed.
    pub fn is_intercepted(&self) -> bool {
        self.inner.hook.borrow().is_some()
    }

    /// Dispatch a mutation through the hook, or natively when none is installed.
    ///
    /// The outcome is whatever the hook reports; native dispatch always commits.
    pub fn mutate(&self, mutation: Mutation) -> Result<NavigationOutcome, HistoryError> {
        let hook = self
            .inner
            .hook
            .borrow()
            .as_ref()
            .map(|installed| Rc::clone(&installed.hook));
        match hook {
            Some(hook) => hook.intercept(mutation, &*self.inner.native),
            None => {
                mutation.commit_to(&*self.inner.native)?;
                Ok(NavigationOutcome::Committed)
            }
        }
    }
}

impl HistoryApi for History {
    fn push_state(&self, state: Value, title: &str, url: Option<&str>) -> Result<(), HistoryError> {
        self.mutate(Mutation {
            method: Method::Push,
            state,
            title: title.to_owned(),
            url: url.map(str::to_owned),
        })
        .map(|_| ())
    }

    fn replace_state(
        &self,
        state: Value,
        title: &str,
        url: Option<&str>,
    ) -> Result<(), HistoryError> {
        self.mutate(Mutation {
            method: Method::Replace,
            state,
            title: title.to_owned(),
            url: url.map(str::to_owned),
        })
        .map(|_| ())
    }

    fn go(&self, delta: isize) {
        self.inner.native.go(delta);
    }

    fn back(&self) {
        self.inner.native.back();
    }

    fn forward(&self) {
        self.inner.native.forward();
    }

    fn length(&self) -> usize {
        self.inner.native.length()
    }

    fn state(&self) -> Value {
        self.inner.native.state()
    }

    fn current_url(&self) -> Url {
        self.inner.native.current_url()
    }

    fn scroll_restoration(&self) -> ScrollRestoration {
        self.inner.native.scroll_restoration()
    }

    fn set_scroll_restoration(&self, value: ScrollRestoration) {
        self.inner.native.set_scroll_restoration(value);
    }

    fn add_popstate_listener(&self, listener: PopStateListener) -> ListenerId {
        self.inner.native.add_popstate_listener(listener)
    }

    fn remove_popstate_listener(&self, id: ListenerId) -> bool {
        self.inner.native.remove_popstate_listener(id)
    }
}
