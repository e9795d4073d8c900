// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hash-universe fragment codec.
//!
//! ## Wire format
//!
//! In multi-hash mode the fragment is `id1=path1;id2=path2;...`.
//! Parsing splits on `;`, then each segment on its first `=`.
//! Segments without `=`, with an empty id, or with an empty path are dropped.
//!
//! Ids and paths are percent-encoded for `%`, `;`, `=`, `#` and control characters when a
//! fragment is written, and percent-decoded when it is read, so paths containing the
//! separators survive a round trip.
//!
//! In single-hash mode the fragment is not split or decoded; it is exposed as-is under
//! [`SINGLE_HASH_KEY`].

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

use crate::types::{HashMode, SINGLE_HASH_KEY};

/// Characters escaped inside a universe id or path.
const SEGMENT: &AsciiSet = &CONTROLS.add(b'%').add(b';').add(b'=').add(b'#');

/// Ordered mapping from universe id to raw path.
///
/// Insertion order is kept so rewriting one universe leaves the position of every other
/// universe in the fragment unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HashPaths {
    entries: Vec<(String, String)>,
}

impl HashPaths {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a URL fragment (with or without its leading `#`).
    pub fn parse(fragment: &str, mode: HashMode) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let mut paths = Self::new();
        match mode {
            HashMode::Single => {
                paths.insert(SINGLE_HASH_KEY, fragment);
            }
            HashMode::Multi => {
                for segment in fragment.split(';') {
                    let Some((id, path)) = segment.split_once('=') else {
                        if !segment.is_empty() {
                            tracing::trace!(segment, "dropping hash segment without '='");
                        }
                        continue;
                    };
                    if id.is_empty() || path.is_empty() {
                        tracing::trace!(segment, "dropping hash segment with empty id or path");
                        continue;
                    }
                    paths.insert(decode(id), decode(path));
                }
            }
        }
        paths
    }

    /// Path of universe `id`.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, v)| v.as_str())
    }

    /// True if universe `id` is present.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Set the path of universe `id`, in place if present, otherwise appended.
    ///
    /// Returns the previous path.
    pub fn insert(&mut self, id: impl Into<String>, path: impl Into<String>) -> Option<String> {
        let id = id.into();
        let path = path.into();
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some((_, slot)) => Some(core::mem::replace(slot, path)),
            None => {
                self.entries.push((id, path));
                None
            }
        }
    }

    /// Remove universe `id`, returning its path.
    pub fn remove(&mut self, id: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == id)?;
        Some(self.entries.remove(pos).1)
    }

    /// Number of universes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no universes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(id, path)` pairs in fragment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode as a multi-hash fragment, without the leading `#`.
    pub fn to_fragment(&self) -> String {
        let mut out = String::new();
        for (id, path) in &self.entries {
            if !out.is_empty() {
                out.push(';');
            }
            out.extend(utf8_percent_encode(id, SEGMENT));
            out.push('=');
            out.extend(utf8_percent_encode(path, SEGMENT));
        }
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HashPaths {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut paths = Self::new();
        for (k, v) in iter {
            paths.insert(k, v);
        }
        paths
    }
}

fn decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_fragment_parses_pairs() {
        let paths = HashPaths::parse("#main=/home;side=/help", HashMode::Multi);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths.get("main"), Some("/home"));
        assert_eq!(paths.get("side"), Some("/help"));
    }

    #[test]
    fn malformed_segments_are_dropped() {
        let paths = HashPaths::parse("foo;=bar;baz=;ok=/x;;", HashMode::Multi);
        assert_eq!(paths.iter().collect::<Vec<_>>(), vec![("ok", "/x")]);
        for bad in ["foo", "=bar", "baz="] {
            assert!(HashPaths::parse(bad, HashMode::Multi).is_empty());
        }
    }

    #[test]
    fn splits_on_first_equals_only() {
        let paths = HashPaths::parse("q=/search?a=b", HashMode::Multi);
        assert_eq!(paths.get("q"), Some("/search?a=b"));
    }

    #[test]
    fn single_mode_exposes_whole_fragment() {
        let paths = HashPaths::parse("#/a=b;c", HashMode::Single);
        assert_eq!(paths.iter().collect::<Vec<_>>(), vec![("single", "/a=b;c")]);
    }

    #[test]
    fn insert_replaces_in_place_and_appends() {
        let mut paths = HashPaths::parse("a=/1;b=/2", HashMode::Multi);
        assert_eq!(paths.insert("a", "/9"), Some("/1".to_owned()));
        assert_eq!(paths.insert("c", "/3"), None);
        assert_eq!(paths.to_fragment(), "a=/9;b=/2;c=/3");
        assert_eq!(paths.remove("b"), Some("/2".to_owned()));
        assert_eq!(paths.to_fragment(), "a=/9;c=/3");
    }

    #[test]
    fn separators_are_escaped_and_restored() {
        let mut paths = HashPaths::new();
        paths.insert("odd;id", "/p=1;q%2");
        let fragment = paths.to_fragment();
        assert_eq!(fragment, "odd%3Bid=/p%3D1%3Bq%252");
        let back = HashPaths::parse(&fragment, HashMode::Multi);
        assert_eq!(back.get("odd;id"), Some("/p=1;q%2"));
    }

    #[test]
    fn empty_fragment() {
        assert!(HashPaths::parse("", HashMode::Multi).is_empty());
        assert!(HashPaths::parse("#", HashMode::Multi).is_empty());
        assert_eq!(HashPaths::new().to_fragment(), "");
    }

    #[test]
    fn collects_from_pairs() {
        let paths: HashPaths = [("a", "/1"), ("a", "/2"), ("b", "/3")].into_iter().collect();
        assert_eq!(paths.to_fragment(), "a=/2;b=/3");
    }
}
