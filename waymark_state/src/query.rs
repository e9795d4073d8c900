// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query-string preservation across navigations.
//!
//! ## Policy
//!
//! [`PreserveQuery`] selects which parameters of the current URL are carried into a new
//! navigation target:
//!
//! - [`PreserveQuery::None`]: nothing; the target is returned unchanged.
//! - [`PreserveQuery::All`]: every parameter.
//! - [`PreserveQuery::Key`]: every value of one key.
//! - [`PreserveQuery::Keys`]: every value of each listed key.
//!
//! Carried parameters are appended, never overwritten, so repeated keys accumulate.
//! When the current URL has no query parameters at all, both entry points are no-ops.

use url::Url;
use url::form_urlencoded;

use crate::error::StateError;

/// Which query parameters of the current URL to carry into a navigation target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PreserveQuery {
    /// Carry nothing.
    #[default]
    None,
    /// Carry every parameter.
    All,
    /// Carry one key (all of its values).
    Key(String),
    /// Carry exactly these keys.
    Keys(Vec<String>),
}

impl PreserveQuery {
    /// True for [`PreserveQuery::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// True if parameters named `key` are carried.
    pub fn selects(&self, key: &str) -> bool {
        match self {
            Self::None => false,
            Self::All => true,
            Self::Key(k) => k == key,
            Self::Keys(keys) => keys.iter().any(|k| k == key),
        }
    }
}

impl From<bool> for PreserveQuery {
    fn from(all: bool) -> Self {
        if all { Self::All } else { Self::None }
    }
}

impl From<&str> for PreserveQuery {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<String> for PreserveQuery {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<Vec<String>> for PreserveQuery {
    fn from(keys: Vec<String>) -> Self {
        Self::Keys(keys)
    }
}

impl From<&[&str]> for PreserveQuery {
    fn from(keys: &[&str]) -> Self {
        Self::Keys(keys.iter().map(|k| (*k).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for PreserveQuery {
    fn from(keys: [&str; N]) -> Self {
        Self::from(&keys[..])
    }
}

/// Ordered query-parameter multimap.
///
/// Keys may repeat; order is preserved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, with or without its leading `?`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    /// Parameters of `url`.
    pub fn from_url(url: &Url) -> Self {
        url.query_pairs().into_owned().collect()
    }

    /// Append a value; existing values of `key` are kept.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// First value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value of `key`, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// True if `key` has at least one value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Distinct keys, in first-seen order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for (k, _) in &self.pairs {
            if !keys.contains(&k.as_str()) {
                keys.push(k);
            }
        }
        keys
    }

    /// Iterate `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Serialize as `application/x-www-form-urlencoded`, without the leading `?`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.pairs)
            .finish()
    }
}

impl FromIterator<(String, String)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

fn has_query_params(url: &Url) -> bool {
    url.query_pairs().next().is_some()
}

fn selected(preserve: &PreserveQuery, current: &Url) -> Vec<(String, String)> {
    current
        .query_pairs()
        .filter(|(k, _)| preserve.selects(k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Carry the selected query parameters of `current` into the navigation target `url`.
///
/// Relative targets are resolved against `current`, so the result is an absolute URL
/// whenever anything was carried. When nothing applies, `url` is returned unchanged.
///
/// ```
/// use url::Url;
/// use waymark_state::{PreserveQuery, preserve_query_in_url};
///
/// let current = Url::parse("https://x/base?existing=value&another=param").unwrap();
/// let href = preserve_query_in_url("https://x/new", &PreserveQuery::from(["existing"]), &current)?;
/// assert_eq!(href, "https://x/new?existing=value");
/// # Ok::<(), waymark_state::StateError>(())
/// ```
pub fn preserve_query_in_url(
    url: &str,
    preserve: &PreserveQuery,
    current: &Url,
) -> Result<String, StateError> {
    if preserve.is_none() || !has_query_params(current) {
        return Ok(url.to_owned());
    }
    let carried = selected(preserve, current);
    if carried.is_empty() {
        return Ok(url.to_owned());
    }
    let mut target = current.join(url)?;
    target.query_pairs_mut().extend_pairs(carried);
    Ok(target.into())
}

/// Carry the selected query parameters of `current` into a parameter collection.
///
/// `existing` is returned unchanged when the policy is [`PreserveQuery::None`] or `current`
/// has no parameters. With no `existing` collection and [`PreserveQuery::All`], the
/// parameters of `current` are returned as they are.
pub fn merge_query_params(
    existing: Option<QueryParams>,
    preserve: &PreserveQuery,
    current: &Url,
) -> Option<QueryParams> {
    if preserve.is_none() || !has_query_params(current) {
        return existing;
    }
    if existing.is_none() && matches!(preserve, PreserveQuery::All) {
        return Some(QueryParams::from_url(current));
    }
    let mut merged = existing.unwrap_or_default();
    for (k, v) in selected(preserve, current) {
        merged.append(k, v);
    }
    Some(merged)
}
