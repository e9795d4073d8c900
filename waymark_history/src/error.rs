// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for the history boundary.

use thiserror::Error;

/// Errors raised by history primitives and the environment around them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// A URL handed to a history primitive could not be parsed or resolved.
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        /// The rejected input.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },

    /// A history entry may not change the document's origin.
    #[error("cannot navigate history from origin {origin} to {target}")]
    CrossOrigin {
        /// Origin of the current entry.
        origin: String,
        /// The rejected target URL.
        target: String,
    },

    /// A mutation hook is already installed; hooks never stack.
    #[error("history mutations are already intercepted")]
    AlreadyIntercepted,

    /// The session storage backend refused an operation.
    #[error("session storage error: {0}")]
    Storage(String),
}
