// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: routing hashes, hash modes, and the multiplexed navigation state.
//!
//! ## Overview
//!
//! [`State`] is what gets stored alongside every history entry.
//! Its `hash` map holds one value per hash universe; `path` holds the value owned by path routing.
//! [`Hash`] names which of those slots a navigation targets.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StateError;

/// Key of the lone universe in single-hash mode.
pub const SINGLE_HASH_KEY: &str = "single";

/// Routing target of a navigation.
///
/// The wire form is `bool | string`: `false` is path routing, `true` is the single default
/// hash universe, and a string names a universe in multi-hash mode.
/// "Use the configured default" is expressed as `Option<Hash>::None` by the APIs that accept one.
///
/// An empty universe name is falsy on the wire, so `Hash::from("")` is [`Hash::Path`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawHash", into = "RawHash")]
pub enum Hash {
    /// Conventional path routing.
    Path,
    /// The whole fragment is one routing namespace.
    Single,
    /// A named universe inside a multiplexed fragment.
    Universe(String),
}

impl Hash {
    /// True for [`Hash::Single`] and [`Hash::Universe`].
    pub fn is_hash_routing(&self) -> bool {
        !matches!(self, Self::Path)
    }

    /// Key of this target in [`State::hash`], or `None` for path routing.
    pub fn universe_key(&self) -> Option<&str> {
        match self {
            Self::Path => None,
            Self::Single => Some(SINGLE_HASH_KEY),
            Self::Universe(id) => Some(id),
        }
    }
}

impl From<bool> for Hash {
    fn from(flag: bool) -> Self {
        if flag { Self::Single } else { Self::Path }
    }
}

impl From<String> for Hash {
    fn from(id: String) -> Self {
        if id.is_empty() {
            Self::Path
        } else {
            Self::Universe(id)
        }
    }
}

impl From<&str> for Hash {
    fn from(id: &str) -> Self {
        Self::from(id.to_owned())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawHash {
    Flag(bool),
    Id(String),
}

impl From<RawHash> for Hash {
    fn from(raw: RawHash) -> Self {
        match raw {
            RawHash::Flag(flag) => flag.into(),
            RawHash::Id(id) => id.into(),
        }
    }
}

impl From<Hash> for RawHash {
    fn from(hash: Hash) -> Self {
        match hash {
            Hash::Path => Self::Flag(false),
            Hash::Single => Self::Flag(true),
            Hash::Universe(id) => Self::Id(id),
        }
    }
}

/// How the URL fragment is interpreted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashMode {
    /// The whole fragment is one routing namespace.
    #[default]
    Single,
    /// The fragment encodes several `id=path` universes.
    Multi,
}

impl HashMode {
    /// Stored representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multi => "multi",
        }
    }

    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Single => Self::Multi,
            Self::Multi => Self::Single,
        }
    }
}

impl fmt::Display for HashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashMode {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "multi" => Ok(Self::Multi),
            other => Err(StateError::UnknownHashMode(other.to_owned())),
        }
    }
}

/// Multiplexed navigation state stored with each history entry.
///
/// Invariant: `hash` is always an object. In single-hash mode it conventionally holds one
/// entry keyed [`SINGLE_HASH_KEY`]. A `null` path state is the same as no path state: it
/// reads back as `None` and is never written out.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Per-universe state, keyed by universe id.
    pub hash: Map<String, Value>,
    /// State owned by path routing.
    #[serde(default, skip_serializing_if = "path_is_absent")]
    pub path: Option<Value>,
}

fn path_is_absent(path: &Option<Value>) -> bool {
    path.as_ref().is_none_or(Value::is_null)
}

impl State {
    /// An empty state: no universes, no path state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a conformant state out of an opaque value.
    ///
    /// Returns `None` when [`is_conformant_state`](crate::is_conformant_state) rejects it.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let hash = obj.get("hash")?.as_object()?.clone();
        Some(Self {
            hash,
            path: obj.get("path").filter(|path| !path.is_null()).cloned(),
        })
    }

    /// Opaque representation, as stored in history.
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("hash".to_owned(), Value::Object(self.hash.clone()));
        if let Some(path) = self.path.as_ref().filter(|path| !path.is_null()) {
            obj.insert("path".to_owned(), path.clone());
        }
        Value::Object(obj)
    }

    /// State held by the slot `hash` targets.
    pub fn universe(&self, hash: &Hash) -> Option<&Value> {
        match hash.universe_key() {
            Some(key) => self.hash.get(key),
            None => self.path.as_ref(),
        }
    }
}

impl From<State> for Value {
    fn from(state: State) -> Self {
        state.to_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hash_from_wire_values() {
        assert_eq!(Hash::from(true), Hash::Single);
        assert_eq!(Hash::from(false), Hash::Path);
        assert_eq!(Hash::from("tab"), Hash::Universe("tab".into()));
        assert_eq!(Hash::from(""), Hash::Path);
    }

    #[test]
    fn hash_serde_is_bool_or_string() {
        let parsed: Vec<Hash> = serde_json::from_value(json!([true, false, "side"])).unwrap();
        assert_eq!(
            parsed,
            vec![Hash::Single, Hash::Path, Hash::Universe("side".into())]
        );
        assert_eq!(
            serde_json::to_value(Hash::Universe("main".into())).unwrap(),
            json!("main")
        );
        assert_eq!(serde_json::to_value(Hash::Single).unwrap(), json!(true));
    }

    #[test]
    fn universe_keys() {
        assert_eq!(Hash::Path.universe_key(), None);
        assert_eq!(Hash::Single.universe_key(), Some("single"));
        assert_eq!(Hash::from("a").universe_key(), Some("a"));
        assert!(!Hash::Path.is_hash_routing());
        assert!(Hash::Single.is_hash_routing());
    }

    #[test]
    fn hash_mode_parse_and_toggle() {
        assert_eq!("multi".parse::<HashMode>().unwrap(), HashMode::Multi);
        assert!("both".parse::<HashMode>().is_err());
        assert_eq!(HashMode::Single.toggled(), HashMode::Multi);
        assert_eq!(HashMode::Multi.to_string(), "multi");
        assert_eq!(HashMode::default(), HashMode::Single);
    }

    #[test]
    fn state_value_conversion() {
        let value = json!({ "hash": { "a": 1 }, "path": "p" });
        let state = State::from_value(&value).unwrap();
        assert_eq!(state.hash.get("a"), Some(&json!(1)));
        assert_eq!(state.path, Some(json!("p")));
        assert_eq!(state.to_value(), value);

        assert!(State::from_value(&json!({ "hash": [] })).is_none());
        assert!(State::from_value(&json!("nope")).is_none());
    }

    #[test]
    fn state_without_path_omits_it() {
        let state = State::new();
        assert_eq!(state.to_value(), json!({ "hash": {} }));
        assert_eq!(serde_json::to_value(&state).unwrap(), json!({ "hash": {} }));
    }

    #[test]
    fn null_path_reads_as_absent_both_ways() {
        let value = json!({ "hash": { "a": 1 }, "path": null });
        let via_serde: State = serde_json::from_value(value.clone()).unwrap();
        let via_value = State::from_value(&value).unwrap();
        assert_eq!(via_serde, via_value);
        assert_eq!(via_value.path, None);

        let stray = State {
            hash: Map::new(),
            path: Some(Value::Null),
        };
        assert_eq!(stray.to_value(), json!({ "hash": {} }));
        assert_eq!(serde_json::to_value(&stray).unwrap(), json!({ "hash": {} }));
        let back: State = serde_json::from_value(stray.to_value()).unwrap();
        assert_eq!(back, State::new());
    }

    #[test]
    fn universe_reader() {
        let state = State::from_value(&json!({ "hash": { "single": 1, "x": 2 }, "path": 3 })).unwrap();
        assert_eq!(state.universe(&Hash::Single), Some(&json!(1)));
        assert_eq!(state.universe(&Hash::from("x")), Some(&json!(2)));
        assert_eq!(state.universe(&Hash::Path), Some(&json!(3)));
        assert_eq!(state.universe(&Hash::from("y")), None);
    }
}
