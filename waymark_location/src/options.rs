// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Process-wide routing configuration.
//!
//! [`RoutingOptions`] is fixed when a routing context is created and read by every
//! navigation decision afterwards. It deserializes from camelCase JSON:
//!
//! ```
//! use waymark_location::RoutingOptions;
//! use waymark_state::{Hash, HashMode};
//!
//! let options: RoutingOptions = serde_json::from_str(
//!     r#"{ "hashMode": "multi", "defaultHash": "main", "full": true }"#,
//! )
//! .unwrap();
//! assert_eq!(options.hash_mode, HashMode::Multi);
//! assert_eq!(options.default_hash, Hash::from("main"));
//! assert!(options.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use waymark_state::{Hash, HashMode};

use crate::error::LocationError;

/// Routing configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoutingOptions {
    /// How the fragment is interpreted.
    pub hash_mode: HashMode,
    /// Target used when a navigation does not name one.
    pub default_hash: Hash,
    /// Reject path routing.
    pub disallow_path_routing: bool,
    /// Reject every kind of hash routing.
    pub disallow_hash_routing: bool,
    /// Reject named hash universes.
    pub disallow_multi_hash_routing: bool,
    /// Intercept every history mutation and raise navigation events.
    pub full: bool,
}

impl Default for RoutingOptions {
    fn default() -> Self {
        Self {
            hash_mode: HashMode::Single,
            default_hash: Hash::Path,
            disallow_path_routing: false,
            disallow_hash_routing: false,
            disallow_multi_hash_routing: false,
            full: false,
        }
    }
}

impl RoutingOptions {
    /// Same options with interception turned on.
    #[must_use]
    pub fn full(mut self) -> Self {
        self.full = true;
        self
    }

    /// Same options with `mode` as the hash mode.
    #[must_use]
    pub fn with_hash_mode(mut self, mode: HashMode) -> Self {
        self.hash_mode = mode;
        self
    }

    /// Same options with `hash` as the default target.
    #[must_use]
    pub fn with_default_hash(mut self, hash: impl Into<Hash>) -> Self {
        self.default_hash = hash.into();
        self
    }

    /// Reject contradictory combinations.
    pub fn validate(&self) -> Result<(), LocationError> {
        if self.disallow_path_routing && self.disallow_hash_routing {
            return Err(LocationError::InvalidOptions(
                "path routing and hash routing cannot both be disallowed",
            ));
        }
        if self.disallow_multi_hash_routing && self.hash_mode == HashMode::Multi {
            return Err(LocationError::InvalidOptions(
                "multi hash mode is selected but multi-hash routing is disallowed",
            ));
        }
        self.check(&self.default_hash)
            .map_err(|_| LocationError::InvalidOptions("the default hash is not routable"))
    }

    /// Apply the default to an optional target and check it is allowed.
    pub fn resolve_hash(&self, hash: Option<Hash>) -> Result<Hash, LocationError> {
        let hash = hash.unwrap_or_else(|| self.default_hash.clone());
        self.check(&hash)?;
        Ok(hash)
    }

    fn check(&self, hash: &Hash) -> Result<(), LocationError> {
        let denied = match hash {
            Hash::Path if self.disallow_path_routing => Some("path routing"),
            Hash::Path => None,
            _ if self.disallow_hash_routing => Some("hash routing"),
            Hash::Single if self.hash_mode == HashMode::Multi => {
                Some("single-hash routing in multi hash mode")
            }
            Hash::Single => None,
            Hash::Universe(_) if self.disallow_multi_hash_routing => Some("multi-hash routing"),
            Hash::Universe(_) if self.hash_mode == HashMode::Single => {
                Some("a named hash universe in single hash mode")
            }
            Hash::Universe(_) => None,
        };
        match denied {
            Some(what) => Err(LocationError::RoutingModeDisallowed(what)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = RoutingOptions::default();
        assert_eq!(options.hash_mode, HashMode::Single);
        assert_eq!(options.default_hash, Hash::Path);
        assert!(!options.full);
        assert!(options.validate().is_ok());
        let parsed: RoutingOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, options);
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(RoutingOptions::default().full()).unwrap();
        assert_eq!(value["hashMode"], "single");
        assert_eq!(value["defaultHash"], false);
        assert_eq!(value["disallowMultiHashRouting"], false);
        assert_eq!(value["full"], true);
    }

    #[test]
    fn contradictions_are_rejected() {
        let both = RoutingOptions {
            disallow_path_routing: true,
            disallow_hash_routing: true,
            ..RoutingOptions::default()
        };
        assert!(matches!(
            both.validate(),
            Err(LocationError::InvalidOptions(_))
        ));

        let multi = RoutingOptions {
            disallow_multi_hash_routing: true,
            ..RoutingOptions::default().with_hash_mode(HashMode::Multi)
        };
        assert!(multi.validate().is_err());

        let named_in_single = RoutingOptions::default().with_default_hash("main");
        assert!(named_in_single.validate().is_err());

        let path_default_disallowed = RoutingOptions {
            disallow_path_routing: true,
            ..RoutingOptions::default()
        };
        assert!(path_default_disallowed.validate().is_err());
        assert!(path_default_disallowed.with_default_hash(true).validate().is_ok());
    }

    #[test]
    fn resolve_hash_applies_default_and_gates() {
        let options = RoutingOptions::default()
            .with_hash_mode(HashMode::Multi)
            .with_default_hash("main");
        assert_eq!(options.resolve_hash(None).unwrap(), Hash::from("main"));
        assert_eq!(
            options.resolve_hash(Some(Hash::Path)).unwrap(),
            Hash::Path
        );
        assert_eq!(
            options.resolve_hash(Some(Hash::Single)),
            Err(LocationError::RoutingModeDisallowed(
                "single-hash routing in multi hash mode"
            ))
        );

        let no_hash = RoutingOptions {
            disallow_hash_routing: true,
            ..RoutingOptions::default()
        };
        assert_eq!(
            no_hash.resolve_hash(Some(Hash::Single)),
            Err(LocationError::RoutingModeDisallowed("hash routing"))
        );
    }
}
