// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interception layer of full mode.
//!
//! [`NavigationInterceptor`] is installed as the [`MutationHook`] of the shared
//! [`History`](waymark_history::History), so every push and replace passes through it no
//! matter who made the call. For each one it:
//!
//! 1. builds a [`BeforeNavigateEvent`] and delivers it to every `beforeNavigate` handler;
//! 2. if a handler cancelled, delivers a [`NavigationCancelledEvent`] and stops; nothing is
//!    committed and the location cell is left alone;
//! 3. otherwise checks the event's state with [`is_conformant_state`], substituting the
//!    previous state (with a warning) when it does not conform;
//! 4. commits through the native primitive, then refreshes the location cell from the live
//!    URL and the committed state.

use serde_json::Value;
use waymark_history::{HistoryApi, HistoryError, LocationState, Mutation, MutationHook};
use waymark_state::{State, is_conformant_state};

use crate::events::{BeforeNavigateEvent, NavigationCancelledEvent, NavigationEvents};

pub use waymark_history::NavigationOutcome;

/// Routes history mutations through the navigation event pipeline.
#[derive(Debug)]
pub struct NavigationInterceptor {
    location: LocationState,
    events: NavigationEvents,
}

impl NavigationInterceptor {
    /// Interceptor keeping `location` in sync and dispatching to `events`.
    pub fn new(location: LocationState, events: NavigationEvents) -> Self {
        Self { location, events }
    }

    /// The handler registry this interceptor dispatches to.
    pub fn events(&self) -> &NavigationEvents {
        &self.events
    }

    /// Run `mutation` through the pipeline, committing it to `native` unless cancelled.
    pub fn run(
        &self,
        mutation: Mutation,
        native: &dyn HistoryApi,
    ) -> Result<NavigationOutcome, HistoryError> {
        let Mutation {
            method,
            state,
            title,
            url,
        } = mutation;
        let url = url.unwrap_or_else(|| native.current_url().into());
        let mut event = BeforeNavigateEvent::new(url, state, method);
        self.events.emit_before_navigate(&mut event);

        if let Some(cause) = event.cancel_reason().map(str::to_owned) {
            tracing::trace!(url = %event.url, %method, cause = %cause, "navigation cancelled");
            let cancelled = NavigationCancelledEvent {
                cause,
                url: event.url,
                state: event.state,
                method,
            };
            self.events.emit_navigation_cancelled(&cancelled);
            return Ok(NavigationOutcome::Cancelled);
        }

        let state = if is_conformant_state(&event.state) {
            event.state
        } else {
            tracing::warn!(
                url = %event.url,
                %method,
                "non-conformant navigation state, keeping the previous state"
            );
            self.last_good_state()
        };
        let commit = Mutation {
            method,
            state: state.clone(),
            title,
            url: Some(event.url),
        };
        commit.commit_to(native)?;
        let url = native.current_url();
        tracing::trace!(%url, %method, "navigation committed");
        self.location.set(url, state);
        Ok(NavigationOutcome::Committed)
    }

    fn last_good_state(&self) -> Value {
        let previous = self.location.state();
        if is_conformant_state(&previous) {
            previous
        } else {
            State::new().to_value()
        }
    }
}

impl MutationHook for NavigationInterceptor {
    fn intercept(
        &self,
        mutation: Mutation,
        native: &dyn HistoryApi,
    ) -> Result<NavigationOutcome, HistoryError> {
        self.run(mutation, native)
    }
}
