// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session-scoped key/value storage.
//!
//! Values survive a reload of the document but not the end of the session. Waymark stores one
//! key in it (the hash-routing mode); hosts back it with whatever their environment offers.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::error::HistoryError;

/// String key/value store scoped to the current session.
pub trait SessionStorage {
    /// Value stored under `key`, or `None` if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<String>, HistoryError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), HistoryError>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), HistoryError>;
}

/// [`SessionStorage`] held in process memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, HistoryError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), HistoryError> {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), HistoryError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
