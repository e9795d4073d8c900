// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! State merge and shape validation.
//!
//! ## Placement rule
//!
//! [`calculate_state`] starts from a snapshot of the complete current state and writes the
//! new value into the slot selected by [`Hash`]:
//!
//! - [`Hash::Universe`]: only that universe changes; siblings are preserved.
//! - [`Hash::Single`]: the whole `hash` map is replaced by `{ single: state }`, discarding
//!   every other universe.
//! - [`Hash::Path`]: `path` is replaced (`null` clears it); `hash` is untouched.

use serde_json::{Map, Value};

use crate::types::{Hash, SINGLE_HASH_KEY, State};

/// Compute the next complete state for a navigation targeting `hash`.
///
/// ```
/// use serde_json::json;
/// use waymark_state::{Hash, State, calculate_state};
///
/// let current = State::from_value(&json!({ "hash": { "a": "1", "b": "2" } })).unwrap();
/// let next = calculate_state(&current, &Hash::from("b"), json!("9"));
/// assert_eq!(next.to_value(), json!({ "hash": { "a": "1", "b": "9" } }));
/// ```
pub fn calculate_state(current: &State, hash: &Hash, state: Value) -> State {
    let mut next = current.clone();
    match hash {
        Hash::Universe(id) => {
            next.hash.insert(id.clone(), state);
        }
        Hash::Single => {
            let mut only = Map::new();
            only.insert(SINGLE_HASH_KEY.to_owned(), state);
            next.hash = only;
        }
        Hash::Path => next.path = Some(state).filter(|state| !state.is_null()),
    }
    next
}

/// Like [`calculate_state`], reading the current state from an opaque stored value.
///
/// A non-conformant `current` contributes nothing; the merge starts from an empty [`State`].
pub fn calculate_state_from(current: &Value, hash: &Hash, state: Value) -> State {
    let base = State::from_value(current).unwrap_or_default();
    calculate_state(&base, hash, state)
}

/// True when `value` is an object whose `hash` property is a non-array object.
pub fn is_conformant_state(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|obj| obj.get("hash"))
        .is_some_and(Value::is_object)
}
