// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Routing context lifecycle.
//!
//! [`init`] is the entry point of the library: it validates the options, attaches a
//! [`Location`] to the window (installing interception in full mode) and returns the
//! [`RoutingContext`] every other component is handed. [`RoutingContext::teardown`] reverses
//! all of it, after which `init` may run again on the same window.

use waymark_history::Window;

use crate::error::LocationError;
use crate::location::Location;
use crate::options::RoutingOptions;

/// Everything routing needs, created by [`init`].
#[derive(Debug)]
pub struct RoutingContext {
    options: RoutingOptions,
    location: Location,
}

/// Start routing on `window`.
///
/// Fails with [`LocationError::InvalidOptions`] for contradictory options, and with
/// [`HistoryError::AlreadyIntercepted`](waymark_history::HistoryError::AlreadyIntercepted)
/// when a full context is requested while another one is active on the same history.
///
/// ```
/// use waymark_history::Window;
/// use waymark_location::{RoutingOptions, init};
///
/// let window = Window::in_memory("https://app.test/")?;
/// let context = init(&window, RoutingOptions::default().full())?;
/// assert!(init(&window, RoutingOptions::default().full()).is_err());
/// context.teardown();
/// let again = init(&window, RoutingOptions::default().full())?;
/// assert!(again.location().is_full());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn init(window: &Window, options: RoutingOptions) -> Result<RoutingContext, LocationError> {
    let location = Location::new(window, options.clone())?;
    tracing::debug!(full = options.full, hash_mode = %options.hash_mode, "routing initialized");
    Ok(RoutingContext { options, location })
}

impl RoutingContext {
    /// Options the context was created with.
    pub fn options(&self) -> &RoutingOptions {
        &self.options
    }

    /// The location.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// The window routing runs on.
    pub fn window(&self) -> &Window {
        self.location.window()
    }

    /// Stop routing and remove every global installation.
    pub fn teardown(self) {
        self.location.dispose();
        tracing::debug!("routing torn down");
    }
}
