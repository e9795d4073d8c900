// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The native history contract.
//!
//! [`HistoryApi`] is the signature set of a browser's session history: two mutation
//! primitives, traversal, length, scroll restoration, and the entry state.
//! It also carries the two things a history backend alone knows about: the live location
//! ([`HistoryApi::current_url`]) and when the session history moves by traversal
//! ([`HistoryApi::add_popstate_listener`]).

use core::fmt;
use std::rc::Rc;

use serde_json::Value;
use url::Url;

use crate::error::HistoryError;
use crate::listeners::ListenerId;

/// Which mutation primitive a navigation uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// Append an entry, discarding forward entries.
    Push,
    /// Overwrite the current entry.
    Replace,
}

impl Method {
    /// `push` or `replace`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Replace => "replace",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scroll restoration preference stored on the history object.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollRestoration {
    /// The environment restores scroll positions.
    #[default]
    Auto,
    /// The application restores scroll positions.
    Manual,
}

/// Notification that the session history moved by traversal (back/forward/go).
#[derive(Clone, Debug, PartialEq)]
pub struct PopStateEvent {
    /// URL of the entry now current.
    pub url: Url,
    /// State of the entry now current (`Null` if none).
    pub state: Value,
}

/// Popstate callback.
pub type PopStateListener = Rc<dyn Fn(&PopStateEvent)>;

/// A call to one of the two mutation primitives, captured as data.
#[derive(Clone, Debug, PartialEq)]
pub struct Mutation {
    /// Which primitive.
    pub method: Method,
    /// State to store with the entry.
    pub state: Value,
    /// Title argument (unused by browsers, kept for contract parity).
    pub title: String,
    /// Target URL, absolute or relative to the current one; `None` keeps the current URL.
    pub url: Option<String>,
}

/// Result of a mutation or navigation attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NavigationOutcome {
    /// The history entry was written.
    Committed,
    /// A hook cancelled the mutation; nothing was written.
    Cancelled,
}

impl NavigationOutcome {
    /// True for [`NavigationOutcome::Committed`].
    pub fn is_committed(self) -> bool {
        matches!(self, Self::Committed)
    }
}

impl Mutation {
    /// Apply this mutation to `history` through its own primitive.
    pub fn commit_to(&self, history: &dyn HistoryApi) -> Result<(), HistoryError> {
        let url = self.url.as_deref();
        match self.method {
            Method::Push => history.push_state(self.state.clone(), &self.title, url),
            Method::Replace => history.replace_state(self.state.clone(), &self.title, url),
        }
    }
}

/// Session history contract.
///
/// Implementations use interior mutability; every method takes `&self` because a history
/// object is shared by everything that navigates.
pub trait HistoryApi {
    /// Append an entry after the current one, discarding forward entries.
    fn push_state(&self, state: Value, title: &str, url: Option<&str>) -> Result<(), HistoryError>;

    /// Overwrite the current entry.
    fn replace_state(
        &self,
        state: Value,
        title: &str,
        url: Option<&str>,
    ) -> Result<(), HistoryError>;

    /// Move `delta` entries; out-of-range moves are ignored.
    fn go(&self, delta: isize);

    /// Move one entry back.
    fn back(&self) {
        self.go(-1);
    }

    /// Move one entry forward.
    fn forward(&self) {
        self.go(1);
    }

    /// Number of entries.
    fn length(&self) -> usize;

    /// State of the current entry (`Null` if none).
    fn state(&self) -> Value;

    /// The live location.
    fn current_url(&self) -> Url;

    /// Current scroll restoration preference.
    fn scroll_restoration(&self) -> ScrollRestoration;

    /// Set the scroll restoration preference.
    fn set_scroll_restoration(&self, value: ScrollRestoration);

    /// Observe traversals.
    fn add_popstate_listener(&self, listener: PopStateListener) -> ListenerId;

    /// Stop observing traversals. Returns false if `id` was not registered.
    fn remove_popstate_listener(&self, id: ListenerId) -> bool;
}
