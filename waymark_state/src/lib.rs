// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waymark State: multiplexed navigation state for client-side routers.
//!
//! Waymark State is the pure, environment-free layer of Waymark.
//!
//! - [`State`] is the shape stored with every history entry: one value per hash universe plus
//!   an optional value owned by path routing.
//! - [`calculate_state`] merges a navigation's state into the complete current state without
//!   disturbing universes it does not target.
//! - [`is_conformant_state`] is the structural gate for values read back from history.
//! - [`HashPaths`] encodes and decodes the `id=path;id=path` multi-hash fragment.
//! - [`preserve_query_in_url`] and [`merge_query_params`] carry query parameters from the
//!   current URL into a new target.
//!
//! Nothing here touches a history stack; the `waymark_history` and `waymark_location` crates
//! build on these pieces.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use waymark_state::{Hash, HashMode, HashPaths, State, calculate_state};
//!
//! // Two universes are active in the fragment.
//! let mut paths = HashPaths::parse("#main=/inbox;side=/help", HashMode::Multi);
//!
//! // Move the side universe and rebuild the fragment.
//! paths.insert("side", "/settings");
//! assert_eq!(paths.to_fragment(), "main=/inbox;side=/settings");
//!
//! // Merge the state for that navigation.
//! let current = State::from_value(&json!({ "hash": { "main": 1, "side": 2 } })).unwrap();
//! let next = calculate_state(&current, &Hash::from("side"), json!(3));
//! assert_eq!(next.to_value(), json!({ "hash": { "main": 1, "side": 3 } }));
//! ```

pub mod error;
pub mod fragment;
pub mod merge;
pub mod query;
pub mod types;

pub use error::StateError;
pub use fragment::HashPaths;
pub use merge::{calculate_state, calculate_state_from, is_conformant_state};
pub use query::{PreserveQuery, QueryParams, merge_query_params, preserve_query_in_url};
pub use types::{Hash, HashMode, SINGLE_HASH_KEY, State};
