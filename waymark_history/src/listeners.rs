// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered listener lists with stable ids.
//!
//! Listeners are kept in a map keyed by a monotonically increasing id, so dispatch order is
//! subscription order and removal never disturbs the order of the rest.
//! Dispatchers take a [`snapshot`](Listeners::snapshot) before invoking anything, which lets a
//! listener add or remove listeners while an event is being delivered.

use std::collections::BTreeMap;
use std::rc::Rc;

/// Handle of a registered listener.
///
/// Ids are never reused within one [`Listeners`] list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Numeric value, in registration order.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Listener list over callback type `F` (typically `dyn Fn(&Event)`).
pub struct Listeners<F: ?Sized> {
    next_id: u64,
    entries: BTreeMap<u64, Rc<F>>,
}

impl<F: ?Sized> core::fmt::Debug for Listeners<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Listeners")
            .field("next_id", &self.next_id)
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<F: ?Sized> Default for Listeners<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ?Sized> Listeners<F> {
    /// An empty list.
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: BTreeMap::new(),
        }
    }

    /// Register `listener` after every existing one.
    pub fn insert(&mut self, listener: Rc<F>) -> ListenerId {
        self.next_id += 1;
        self.entries.insert(self.next_id, listener);
        ListenerId(self.next_id)
    }

    /// Remove a listener. Returns false if `id` was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.entries.remove(&id.0).is_some()
    }

    /// True if `id` is registered.
    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.contains_key(&id.0)
    }

    /// Listeners in subscription order.
    pub fn snapshot(&self) -> Vec<Rc<F>> {
        self.entries.values().cloned().collect()
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every listener. Ids keep counting from where they were.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
