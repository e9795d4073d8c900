// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for state and URL helpers.

use thiserror::Error;

/// Errors produced by the pure state and query helpers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// A navigation target could not be parsed or resolved against the current URL.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// A stored hash mode was neither `single` nor `multi`.
    #[error("unknown hash mode: {0:?}")]
    UnknownHashMode(String),
}
