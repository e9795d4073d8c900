// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation targets.
//!
//! [`calculate_href`] turns an application-level href into the full URL a navigation
//! commits, according to where the navigation routes:
//!
//! - path routing: `href` is resolved against the current URL and the selected query
//!   parameters of the current URL are carried over;
//! - single-hash routing: the current URL with `href` as its whole fragment;
//! - a named universe: the current URL with that universe rewritten in the multi-hash
//!   fragment, every other universe left in place.
//!
//! Hash routing never touches the path or query of the current URL, so query preservation
//! only applies to path routing.

use url::Url;
use waymark_state::{Hash, HashMode, HashPaths, PreserveQuery, preserve_query_in_url};

use crate::error::LocationError;
use crate::options::RoutingOptions;

/// Compute the URL a navigation to `href` commits.
///
/// `hash` falls back to the configured default and is checked against the options.
///
/// ```
/// use url::Url;
/// use waymark_location::{RoutingOptions, calculate_href};
/// use waymark_state::{Hash, HashMode, PreserveQuery};
///
/// let options = RoutingOptions::default().with_hash_mode(HashMode::Multi);
/// let current = Url::parse("https://app.test/?lang=en#main=/inbox").unwrap();
/// let href = calculate_href(
///     &options,
///     &current,
///     "/help",
///     Some(Hash::from("side")),
///     &PreserveQuery::None,
/// )?;
/// assert_eq!(href, "https://app.test/?lang=en#main=/inbox;side=/help");
/// # Ok::<(), waymark_location::LocationError>(())
/// ```
pub fn calculate_href(
    options: &RoutingOptions,
    current: &Url,
    href: &str,
    hash: Option<Hash>,
    preserve: &PreserveQuery,
) -> Result<String, LocationError> {
    let target = match options.resolve_hash(hash)? {
        Hash::Path => {
            let href = preserve_query_in_url(href, preserve, current)?;
            current.join(&href).map_err(waymark_state::StateError::from)?
        }
        Hash::Single => with_fragment(current, href),
        Hash::Universe(id) => with_universe(current, &id, href),
    };
    Ok(target.into())
}

/// `current` with its fragment replaced by `fragment` (leading `#` optional).
///
/// An empty fragment removes it.
pub fn with_fragment(current: &Url, fragment: &str) -> Url {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let mut url = current.clone();
    url.set_fragment((!fragment.is_empty()).then_some(fragment));
    url
}

/// `current` with universe `id` set to `path` in its multi-hash fragment.
pub fn with_universe(current: &Url, id: &str, path: &str) -> Url {
    let mut paths = HashPaths::parse(current.fragment().unwrap_or_default(), HashMode::Multi);
    paths.insert(id, path);
    with_fragment(current, &paths.to_fragment())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn path_routing_resolves_and_preserves_query() {
        let options = RoutingOptions::default();
        let current = url("https://x/base?existing=value&another=param#frag");
        let href = calculate_href(
            &options,
            &current,
            "new",
            None,
            &PreserveQuery::from(["existing"]),
        )
        .unwrap();
        assert_eq!(href, "https://x/new?existing=value");

        let plain = calculate_href(&options, &current, "/p", None, &PreserveQuery::None).unwrap();
        assert_eq!(plain, "https://x/p");
    }

    #[test]
    fn single_hash_routing_rewrites_fragment_only() {
        let options = RoutingOptions::default().with_default_hash(true);
        let current = url("https://x/app?q=1#/old");
        let href = calculate_href(&options, &current, "/new", None, &PreserveQuery::All).unwrap();
        assert_eq!(href, "https://x/app?q=1#/new");
        let cleared = calculate_href(&options, &current, "", None, &PreserveQuery::None).unwrap();
        assert_eq!(cleared, "https://x/app?q=1");
    }

    #[test]
    fn universe_routing_keeps_siblings() {
        let current = url("https://x/#a=/one;b=/two");
        assert_eq!(
            with_universe(&current, "b", "/three").as_str(),
            "https://x/#a=/one;b=/three"
        );
        assert_eq!(
            with_universe(&current, "c", "/new").as_str(),
            "https://x/#a=/one;b=/two;c=/new"
        );
    }

    #[test]
    fn disallowed_target_is_rejected() {
        let options = RoutingOptions {
            disallow_path_routing: true,
            ..RoutingOptions::default().with_default_hash(true)
        };
        let err = calculate_href(
            &options,
            &url("https://x/"),
            "/p",
            Some(Hash::Path),
            &PreserveQuery::None,
        )
        .unwrap_err();
        assert_eq!(err, LocationError::RoutingModeDisallowed("path routing"));
    }
}
