// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation events and their registry.
//!
//! ## Kinds
//!
//! - [`BeforeNavigateEvent`] is raised for every intercepted push or replace, before anything
//!   is committed. Handlers may [`cancel`](BeforeNavigateEvent::cancel) it; the first cancel
//!   wins and later ones are ignored. Every handler still runs.
//! - [`NavigationCancelledEvent`] follows a cancelled [`BeforeNavigateEvent`], carrying the
//!   reason given by the cancelling handler.
//!
//! ## Ordering
//!
//! Handlers of one kind run synchronously in subscription order. Dispatch works on a snapshot
//! of the handler list, so a handler may subscribe or unsubscribe (itself included) without
//! affecting the delivery in progress.
//!
//! ## Unsubscribing
//!
//! [`NavigationEvents::subscribe`] returns an [`Unsubscribe`] bound to the kind the handler
//! was registered under. Dropping it leaves the handler registered.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde_json::Value;
use waymark_history::{ListenerId, Listeners, Method};

/// Raised before an intercepted navigation commits.
#[derive(Clone, Debug, PartialEq)]
pub struct BeforeNavigateEvent {
    /// Target URL.
    pub url: String,
    /// State the navigation will store. Handlers may replace it.
    pub state: Value,
    /// Push or replace.
    pub method: Method,
    cancel_reason: Option<String>,
}

impl BeforeNavigateEvent {
    /// A fresh, uncancelled event.
    pub fn new(url: impl Into<String>, state: Value, method: Method) -> Self {
        Self {
            url: url.into(),
            state,
            method,
            cancel_reason: None,
        }
    }

    /// Cancel the navigation. Has no effect if it is already cancelled.
    pub fn cancel(&mut self, reason: impl Into<String>) {
        if self.cancel_reason.is_none() {
            self.cancel_reason = Some(reason.into());
        }
    }

    /// True once a handler has cancelled.
    pub fn was_cancelled(&self) -> bool {
        self.cancel_reason.is_some()
    }

    /// Reason given by the first cancel.
    pub fn cancel_reason(&self) -> Option<&str> {
        self.cancel_reason.as_deref()
    }
}

/// Raised after a navigation was cancelled.
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationCancelledEvent {
    /// Target URL of the abandoned navigation.
    pub url: String,
    /// State the abandoned navigation carried.
    pub state: Value,
    /// Push or replace.
    pub method: Method,
    /// Reason given to [`BeforeNavigateEvent::cancel`].
    pub cause: String,
}

/// Names an event kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// [`BeforeNavigateEvent`].
    BeforeNavigate,
    /// [`NavigationCancelledEvent`].
    NavigationCancelled,
}

type BeforeNavigateFn = dyn Fn(&mut BeforeNavigateEvent);
type NavigationCancelledFn = dyn Fn(&NavigationCancelledEvent);

/// A handler tagged with the kind of event it receives.
#[derive(Clone)]
pub enum NavigationHandler {
    /// Receives [`BeforeNavigateEvent`]s.
    BeforeNavigate(Rc<BeforeNavigateFn>),
    /// Receives [`NavigationCancelledEvent`]s.
    NavigationCancelled(Rc<NavigationCancelledFn>),
}

impl core::fmt::Debug for NavigationHandler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("NavigationHandler").field(&self.kind()).finish()
    }
}

impl NavigationHandler {
    /// Wrap a `beforeNavigate` handler.
    pub fn before_navigate(f: impl Fn(&mut BeforeNavigateEvent) + 'static) -> Self {
        Self::BeforeNavigate(Rc::new(f))
    }

    /// Wrap a `navigationCancelled` handler.
    pub fn navigation_cancelled(f: impl Fn(&NavigationCancelledEvent) + 'static) -> Self {
        Self::NavigationCancelled(Rc::new(f))
    }

    /// Kind of event this handler receives.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::BeforeNavigate(_) => EventKind::BeforeNavigate,
            Self::NavigationCancelled(_) => EventKind::NavigationCancelled,
        }
    }
}

#[derive(Debug, Default)]
struct Registry {
    before_navigate: Listeners<BeforeNavigateFn>,
    navigation_cancelled: Listeners<NavigationCancelledFn>,
}

impl Registry {
    fn remove(&mut self, kind: EventKind, id: ListenerId) -> bool {
        match kind {
            EventKind::BeforeNavigate => self.before_navigate.remove(id),
            EventKind::NavigationCancelled => self.navigation_cancelled.remove(id),
        }
    }
}

/// Shared registry of navigation handlers.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Debug, Default)]
pub struct NavigationEvents {
    registry: Rc<RefCell<Registry>>,
}

impl NavigationEvents {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` after every handler of the same kind.
    pub fn subscribe(&self, handler: NavigationHandler) -> Unsubscribe {
        let kind = handler.kind();
        let mut registry = self.registry.borrow_mut();
        let id = match handler {
            NavigationHandler::BeforeNavigate(f) => registry.before_navigate.insert(f),
            NavigationHandler::NavigationCancelled(f) => registry.navigation_cancelled.insert(f),
        };
        Unsubscribe {
            registry: Rc::downgrade(&self.registry),
            kind,
            id,
        }
    }

    /// Number of handlers registered for `kind`.
    pub fn count(&self, kind: EventKind) -> usize {
        let registry = self.registry.borrow();
        match kind {
            EventKind::BeforeNavigate => registry.before_navigate.len(),
            EventKind::NavigationCancelled => registry.navigation_cancelled.len(),
        }
    }

    /// Deliver `event` to every `beforeNavigate` handler.
    pub fn emit_before_navigate(&self, event: &mut BeforeNavigateEvent) {
        let handlers = self.registry.borrow().before_navigate.snapshot();
        for handler in handlers {
            handler(event);
        }
    }

    /// Deliver `event` to every `navigationCancelled` handler.
    pub fn emit_navigation_cancelled(&self, event: &NavigationCancelledEvent) {
        let handlers = self.registry.borrow().navigation_cancelled.snapshot();
        for handler in handlers {
            handler(event);
        }
    }

    /// Remove every handler of every kind.
    pub fn clear(&self) {
        let mut registry = self.registry.borrow_mut();
        registry.before_navigate.clear();
        registry.navigation_cancelled.clear();
    }
}

/// Removes one handler from the registry it was subscribed to.
#[derive(Debug)]
#[must_use = "dropping the handle keeps the handler registered"]
pub struct Unsubscribe {
    registry: Weak<RefCell<Registry>>,
    kind: EventKind,
    id: ListenerId,
}

impl Unsubscribe {
    /// Kind the handler was registered under.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Remove the handler.
    ///
    /// Returns false if it was already gone or the registry no longer exists.
    pub fn unsubscribe(self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => registry.borrow_mut().remove(self.kind, self.id),
            None => false,
        }
    }
}
