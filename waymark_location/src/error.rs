// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for the navigation engine.

use thiserror::Error;
use waymark_history::HistoryError;
use waymark_state::StateError;

/// Errors surfaced by [`Location`](crate::Location) and the routing context.
///
/// Only misuse is reported here. Malformed fragments, out-of-range traversals and
/// non-conformant state are recovered without an error, and a cancelled navigation is an
/// ordinary [`NavigationOutcome`](crate::NavigationOutcome).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// Navigation events exist only when interception is enabled.
    #[error("navigation events are unavailable in lite mode")]
    UnsupportedInLiteMode,

    /// The requested kind of routing is turned off by the routing options.
    #[error("{0} is disallowed by the routing options")]
    RoutingModeDisallowed(&'static str),

    /// The routing options contradict each other.
    #[error("invalid routing options: {0}")]
    InvalidOptions(&'static str),

    /// The location was disposed; it can still be read but no longer navigates.
    #[error("location has been disposed")]
    Disposed,

    /// A history primitive failed.
    #[error(transparent)]
    History(#[from] HistoryError),

    /// A navigation target could not be computed.
    #[error(transparent)]
    State(#[from] StateError),
}
