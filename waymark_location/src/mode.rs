// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session-persisted hash mode.
//!
//! The hash mode decides how the whole fragment is encoded, so it cannot change while a
//! document is live. [`HashModeSwitch`] reads it once from session storage; toggling it
//! stores the other mode, clears the fragment and reloads the document, which then starts
//! in the new mode.

use std::rc::Rc;

use waymark_history::{HistoryApi, SessionStorage, Window};
use waymark_state::HashMode;

use crate::error::LocationError;

/// Session storage key holding `single` or `multi`.
pub const ROUTING_MODE_KEY: &str = "routingMode";

/// The hash mode, as persisted for this session.
pub struct HashModeSwitch {
    storage: Rc<dyn SessionStorage>,
    mode: HashMode,
}

impl core::fmt::Debug for HashModeSwitch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashModeSwitch")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl HashModeSwitch {
    /// Read the stored mode, falling back to `default` when nothing usable is stored.
    pub fn load(storage: Rc<dyn SessionStorage>, default: HashMode) -> Self {
        let mode = match storage.get(ROUTING_MODE_KEY) {
            Ok(Some(stored)) => stored.parse().unwrap_or_else(|err| {
                tracing::warn!(%err, "ignoring stored routing mode");
                default
            }),
            Ok(None) => default,
            Err(err) => {
                tracing::warn!(%err, "could not read routing mode");
                default
            }
        };
        Self { storage, mode }
    }

    /// Mode in effect for this document.
    pub fn mode(&self) -> HashMode {
        self.mode
    }

    /// Switch to the other mode: persist it, clear the fragment and reload `window`.
    ///
    /// The fragment is cleared through the native primitive, so no navigation events are
    /// raised for it and a [`Location`](crate::Location) still attached to `window` keeps
    /// its old URL and hash paths. The document is expected to be rebuilt by the window's
    /// reload handler (see [`Window::set_reload_handler`]): without one, an in-memory window
    /// only counts the reload, and attached locations should be recreated by the caller.
    pub fn toggle(&mut self, window: &Window) -> Result<HashMode, LocationError> {
        let next = self.mode.toggled();
        self.storage.set(ROUTING_MODE_KEY, next.as_str())?;
        let history = window.history();
        let mut url = history.current_url();
        url.set_fragment(None);
        history
            .native()
            .replace_state(history.state(), "", Some(url.as_str()))?;
        tracing::debug!(from = %self.mode, to = %next, "hash mode toggled");
        self.mode = next;
        window.reload();
        Ok(next)
    }
}
