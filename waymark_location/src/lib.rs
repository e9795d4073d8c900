// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waymark Location: the navigation engine of Waymark.
//!
//! ## Overview
//!
//! [`init`] attaches a [`Location`] to a [`Window`](waymark_history::Window) and returns a
//! [`RoutingContext`]. The location is the single source of truth for "current URL plus
//! state", kept in step with session history in both directions.
//!
//! Two routing strategies share one URL:
//!
//! - path routing, where the path (and optionally preserved query parameters) changes;
//! - hash routing, where the fragment changes. In [`HashMode::Multi`](waymark_state::HashMode)
//!   the fragment holds several independent universes, `id=path;id=path`, and navigating one
//!   leaves the others alone.
//!
//! ## Full mode
//!
//! With `full` set in [`RoutingOptions`], the location intercepts every push and replace on the
//! shared history, whoever makes it. Each one raises a [`BeforeNavigateEvent`] that handlers
//! may cancel; a cancelled navigation raises a [`NavigationCancelledEvent`] and writes
//! nothing.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use waymark_history::{HistoryApi, Window};
//! use waymark_location::{GoToOptions, NavigationOutcome, RoutingOptions, init};
//! use waymark_state::{Hash, HashMode};
//!
//! let window = Window::in_memory("https://app.test/")?;
//! let options = RoutingOptions::default()
//!     .with_hash_mode(HashMode::Multi)
//!     .with_default_hash("main")
//!     .full();
//! let context = init(&window, options)?;
//! let location = context.location();
//!
//! let _guard = location.on_before_navigate(|event| {
//!     if event.url.contains("admin") {
//!         event.cancel("forbidden");
//!     }
//! })?;
//!
//! location.go_to("/inbox", GoToOptions::default())?;
//! let side = GoToOptions { hash: Some(Hash::from("side")), ..GoToOptions::default() };
//! location.go_to("/help", side)?;
//! assert_eq!(location.url().fragment(), Some("main=/inbox;side=/help"));
//!
//! // Third-party code goes through the same pipeline.
//! window.history().push_state(json!({ "hash": {} }), "", Some("/admin"))?;
//! assert_eq!(location.path(), "/");
//!
//! let outcome = location.go_to("/admin", GoToOptions::default())?;
//! assert_eq!(outcome, NavigationOutcome::Cancelled);
//! context.teardown();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod context;
pub mod error;
pub mod events;
pub mod href;
pub mod intercept;
pub mod location;
pub mod mode;
pub mod options;

pub use context::{RoutingContext, init};
pub use error::LocationError;
pub use events::{
    BeforeNavigateEvent, EventKind, NavigationCancelledEvent, NavigationEvents,
    NavigationHandler, Unsubscribe,
};
pub use href::{calculate_href, with_fragment, with_universe};
pub use intercept::{NavigationInterceptor, NavigationOutcome};
pub use location::{GoToOptions, Location, NavigateOptions};
pub use mode::{HashModeSwitch, ROUTING_MODE_KEY};
pub use options::RoutingOptions;
