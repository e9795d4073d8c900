// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waymark History: the session-history boundary for client-side routers.
//!
//! ## Overview
//!
//! This crate is everything a router needs from its environment, expressed as Rust types.
//!
//! - [`LocationState`] is the shared `(url, state)` cell every component reads and writes.
//! - [`HistoryApi`] is the native history contract: push/replace, traversal, length, scroll
//!   restoration, and popstate notification.
//! - [`InMemoryHistory`] implements that contract as a stack, for hosts without a browser.
//! - [`History`] is the process-wide handle everyone navigates through. A single
//!   [`MutationHook`] may be installed on it to observe or veto push/replace calls from any
//!   caller.
//! - [`SessionStorage`] and [`Window`] round out the environment.
//!
//! ## Stack rules
//!
//! A push after going back discards the forward entries. Traversals that would leave the
//! stack are ignored. Every change to the current entry is mirrored into the history's
//! [`LocationState`].
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use waymark_history::{HistoryApi, Window};
//!
//! let window = Window::in_memory("https://app.test/")?;
//! let history = window.history();
//! for path in ["/a", "/b", "/c"] {
//!     history.push_state(json!(null), "", Some(path))?;
//! }
//! history.back();
//! history.push_state(json!(null), "", Some("/d"))?;
//!
//! let memory = window.memory_history().unwrap();
//! let paths: Vec<_> = memory.entries().iter().map(|e| e.url.path().to_owned()).collect();
//! assert_eq!(paths, ["/", "/a", "/b", "/d"]);
//! # Ok::<(), waymark_history::HistoryError>(())
//! ```

pub mod api;
pub mod error;
pub mod history;
pub mod listeners;
pub mod location;
pub mod memory;
pub mod storage;
pub mod window;

pub use api::{
    HistoryApi, Method, Mutation, NavigationOutcome, PopStateEvent, PopStateListener,
    ScrollRestoration,
};
pub use error::HistoryError;
pub use history::{History, HookId, MutationHook};
pub use listeners::{ListenerId, Listeners};
pub use location::{LocationSnapshot, LocationState};
pub use memory::{HistoryEntry, InMemoryHistory};
pub use storage::{MemoryStorage, SessionStorage};
pub use window::Window;
