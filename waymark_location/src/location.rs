// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The reactive location.
//!
//! ## Overview
//!
//! [`Location`] keeps a [`LocationState`] in step with the session history of a [`Window`].
//!
//! - Navigations made through it ([`navigate`](Location::navigate),
//!   [`navigate_in`](Location::navigate_in), [`go_to`](Location::go_to)) commit to history and
//!   then update the cell.
//! - Traversals (back, forward, `go`) reach it as popstate notifications and are mirrored
//!   into the cell.
//! - [`hash_paths`](Location::hash_paths) decodes the fragment, cached until the URL changes.
//!
//! ## Lite and full
//!
//! A lite location only navigates and listens. A full location (`RoutingOptions::full`)
//! additionally installs a [`NavigationInterceptor`] on the shared history, so every push or
//! replace, from any caller, raises navigation events that may cancel it. Only one full
//! location can be active per history; a second one fails with
//! [`HistoryError::AlreadyIntercepted`](waymark_history::HistoryError::AlreadyIntercepted).
//!
//! [`dispose`](Location::dispose) removes the popstate listener and the interceptor. It runs
//! on drop and is safe to call more than once.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;
use url::Url;
use waymark_history::{
    HistoryApi, HookId, ListenerId, LocationSnapshot, LocationState, Method, Mutation,
    PopStateEvent, Window,
};
use waymark_state::{
    Hash, HashMode, HashPaths, PreserveQuery, State, calculate_state_from, is_conformant_state,
};

use crate::error::LocationError;
use crate::events::{
    BeforeNavigateEvent, NavigationCancelledEvent, NavigationEvents, NavigationHandler,
    Unsubscribe,
};
use crate::href::{calculate_href, with_fragment, with_universe};
use crate::intercept::{NavigationInterceptor, NavigationOutcome};
use crate::options::RoutingOptions;

/// Options of [`Location::navigate`] and [`Location::navigate_in`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavigateOptions {
    /// Overwrite the current entry instead of pushing a new one.
    pub replace: bool,
    /// State stored with the entry.
    pub state: Value,
}

impl NavigateOptions {
    /// Push with `state`.
    pub fn push(state: Value) -> Self {
        Self {
            replace: false,
            state,
        }
    }

    /// Replace with `state`.
    pub fn replace(state: Value) -> Self {
        Self {
            replace: true,
            state,
        }
    }

    fn method(&self) -> Method {
        if self.replace {
            Method::Replace
        } else {
            Method::Push
        }
    }
}

/// Options of [`Location::go_to`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GoToOptions {
    /// Routing target; `None` uses the configured default.
    pub hash: Option<Hash>,
    /// Overwrite the current entry instead of pushing a new one.
    pub replace: bool,
    /// State for the targeted slot; merged into the complete current state.
    pub state: Value,
    /// Query parameters carried from the current URL (path routing only).
    pub preserve_query: PreserveQuery,
}

struct Interception {
    interceptor: Rc<NavigationInterceptor>,
    hook: HookId,
}

/// Current URL and state, synchronized with session history.
pub struct Location {
    window: Window,
    options: RoutingOptions,
    state: LocationState,
    hash_paths: RefCell<Option<(u64, HashPaths)>>,
    popstate: Cell<Option<ListenerId>>,
    interception: Option<Interception>,
    disposed: Cell<bool>,
}

impl core::fmt::Debug for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Location")
            .field("url", &self.url().as_str())
            .field("options", &self.options)
            .field("full", &self.is_full())
            .field("disposed", &self.disposed.get())
            .finish_non_exhaustive()
    }
}

impl Location {
    /// Attach a location to `window`.
    ///
    /// In full mode the interceptor is installed first; if that fails nothing else is set up.
    /// A full location also normalizes a non-conformant current entry state to an empty
    /// [`State`], through the native primitive.
    pub fn new(window: &Window, options: RoutingOptions) -> Result<Self, LocationError> {
        options.validate()?;
        let history = window.history();
        let state = LocationState::new(history.current_url(), history.state());

        let interception = if options.full {
            let interceptor = Rc::new(NavigationInterceptor::new(
                state.clone(),
                NavigationEvents::new(),
            ));
            let hook = history.install(interceptor.clone())?;
            if !is_conformant_state(&state.state()) {
                let empty = State::new().to_value();
                let native = history.native();
                if let Err(err) = native.replace_state(empty.clone(), "", None) {
                    history.uninstall(hook);
                    return Err(err.into());
                }
                state.set_state(empty);
            }
            Some(Interception { interceptor, hook })
        } else {
            None
        };

        let sync = state.clone();
        let popstate = history.add_popstate_listener(Rc::new(move |event: &PopStateEvent| {
            sync.set(event.url.clone(), event.state.clone());
        }));
        tracing::debug!(
            url = %state.url(),
            full = options.full,
            hash_mode = %options.hash_mode,
            "location attached"
        );

        Ok(Self {
            window: window.clone(),
            options,
            state,
            hash_paths: RefCell::new(None),
            popstate: Cell::new(Some(popstate)),
            interception,
            disposed: Cell::new(false),
        })
    }

    /// The routing options this location was built with.
    pub fn options(&self) -> &RoutingOptions {
        &self.options
    }

    /// The window this location is attached to.
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// The underlying cell, for subscribing to changes.
    pub fn location_state(&self) -> &LocationState {
        &self.state
    }

    /// True when navigation interception is active.
    pub fn is_full(&self) -> bool {
        self.interception.is_some()
    }

    /// Current URL.
    pub fn url(&self) -> Url {
        self.state.url()
    }

    /// Current state.
    pub fn state(&self) -> Value {
        self.state.state()
    }

    /// Path of the current URL.
    pub fn path(&self) -> String {
        self.state.with(|s| s.url.path().to_owned())
    }

    /// State of the slot `hash` targets (`None` uses the configured default).
    ///
    /// Returns `Ok(None)` when the current state is not conformant or the slot is empty.
    pub fn get_state(&self, hash: Option<Hash>) -> Result<Option<Value>, LocationError> {
        let hash = self.options.resolve_hash(hash)?;
        Ok(self.state.with(|s| {
            State::from_value(&s.state).and_then(|state| state.universe(&hash).cloned())
        }))
    }

    /// Decoded fragment, recomputed only when the URL has changed since the last read.
    pub fn hash_paths(&self) -> HashPaths {
        let revision = self.state.revision();
        let mut cache = self.hash_paths.borrow_mut();
        if let Some((_, paths)) = cache.as_ref().filter(|(seen, _)| *seen == revision) {
            return paths.clone();
        }
        let paths = self.state.with(|s| {
            HashPaths::parse(s.url.fragment().unwrap_or_default(), self.options.hash_mode)
        });
        *cache = Some((revision, paths.clone()));
        paths
    }

    /// Observe every change of URL or state.
    pub fn subscribe(&self, f: impl Fn(&LocationSnapshot) + 'static) -> ListenerId {
        self.state.subscribe(f)
    }

    /// Stop observing.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.state.unsubscribe(id)
    }

    /// Navigate to `url`, absolute or relative to the current URL.
    pub fn navigate(
        &self,
        url: &str,
        options: NavigateOptions,
    ) -> Result<NavigationOutcome, LocationError> {
        self.ensure_live()?;
        let mutation = Mutation {
            method: options.method(),
            state: options.state,
            title: String::new(),
            url: Some(url.to_owned()),
        };
        let history = self.window.history();
        match &self.interception {
            Some(interception) => {
                let native = history.native();
                Ok(interception.interceptor.run(mutation, &*native)?)
            }
            None => {
                let outcome = history.mutate(mutation)?;
                if outcome.is_committed() {
                    self.state.set(history.current_url(), history.state());
                    tracing::trace!(url = %self.state.url(), "navigation committed");
                }
                Ok(outcome)
            }
        }
    }

    /// Navigate hash universe `hash_id` to `url`, leaving every other universe in place.
    ///
    /// In single hash mode there is only one universe: `url` becomes the whole fragment and
    /// `hash_id` is not used.
    pub fn navigate_in(
        &self,
        url: &str,
        hash_id: &str,
        options: NavigateOptions,
    ) -> Result<NavigationOutcome, LocationError> {
        let current = self.url();
        let target = match self.options.hash_mode {
            HashMode::Single => with_fragment(&current, url),
            HashMode::Multi => with_universe(&current, hash_id, url),
        };
        self.navigate(target.as_str(), options)
    }

    /// Routing-aware navigation.
    ///
    /// Computes the target with [`calculate_href`], merges `options.state` into the complete
    /// current state for the targeted slot, and commits the result.
    pub fn go_to(
        &self,
        href: &str,
        options: GoToOptions,
    ) -> Result<NavigationOutcome, LocationError> {
        self.ensure_live()?;
        let hash = self.options.resolve_hash(options.hash)?;
        let target = calculate_href(
            &self.options,
            &self.url(),
            href,
            Some(hash.clone()),
            &options.preserve_query,
        )?;
        let state = self
            .state
            .with(|s| calculate_state_from(&s.state, &hash, options.state));
        self.navigate(
            &target,
            NavigateOptions {
                replace: options.replace,
                state: state.to_value(),
            },
        )
    }

    /// Move one entry back.
    pub fn back(&self) {
        self.go(-1);
    }

    /// Move one entry forward.
    pub fn forward(&self) {
        self.go(1);
    }

    /// Move `delta` entries; out-of-range moves are ignored.
    pub fn go(&self, delta: isize) {
        if self.disposed.get() {
            return;
        }
        self.window.history().go(delta);
    }

    /// Register a navigation event handler.
    ///
    /// Fails with [`LocationError::UnsupportedInLiteMode`] unless interception is active.
    pub fn on(&self, handler: NavigationHandler) -> Result<Unsubscribe, LocationError> {
        self.ensure_live()?;
        match &self.interception {
            Some(interception) => Ok(interception.interceptor.events().subscribe(handler)),
            None => Err(LocationError::UnsupportedInLiteMode),
        }
    }

    /// Register a `beforeNavigate` handler.
    pub fn on_before_navigate(
        &self,
        f: impl Fn(&mut BeforeNavigateEvent) + 'static,
    ) -> Result<Unsubscribe, LocationError> {
        self.on(NavigationHandler::before_navigate(f))
    }

    /// Register a `navigationCancelled` handler.
    pub fn on_navigation_cancelled(
        &self,
        f: impl Fn(&NavigationCancelledEvent) + 'static,
    ) -> Result<Unsubscribe, LocationError> {
        self.on(NavigationHandler::navigation_cancelled(f))
    }

    /// Detach from the window: remove the popstate listener and the interceptor, drop every
    /// handler and subscriber.
    ///
    /// Calling this more than once has no further effect.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        let history = self.window.history();
        if let Some(id) = self.popstate.take() {
            history.remove_popstate_listener(id);
        }
        if let Some(interception) = &self.interception {
            history.uninstall(interception.hook);
            interception.interceptor.events().clear();
        }
        self.state.dispose();
        tracing::debug!("location disposed");
    }

    /// True once [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    fn ensure_live(&self) -> Result<(), LocationError> {
        if self.disposed.get() {
            Err(LocationError::Disposed)
        } else {
            Ok(())
        }
    }
}

impl Drop for Location {
    fn drop(&mut self) {
        self.dispose();
    }
}
