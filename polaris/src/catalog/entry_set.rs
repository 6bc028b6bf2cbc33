// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Lazily loaded, lock-protected cache of catalog entries
//!
//! An [`EntrySet`] starts empty and unloaded. The first read takes the lock,
//! runs the loader and swaps the complete result in before releasing it, so
//! concurrent readers either wait for that load or see the finished map. A
//! failed load leaves the set unloaded and the next read retries.
//!
//! Names are compared case-insensitively. When a listing reports several
//! entries that only differ in case, the name is recorded as ambiguous and
//! lookups of it fail instead of picking one arbitrarily.

use super::error::{CatalogError, CatalogResult};
use super::traits::{CatalogEntry, EntryLoader};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Normalized lookup key for an entry name
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

struct EntrySetState<E> {
    entries: HashMap<String, Arc<E>>,
    ambiguous: HashSet<String>,
    loaded: bool,
}

impl<E> Default for EntrySetState<E> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            ambiguous: HashSet::new(),
            loaded: false,
        }
    }
}

/// Name-keyed cache whose contents come from an [`EntryLoader`]
pub struct EntrySet<L: EntryLoader> {
    loader: L,
    state: Mutex<EntrySetState<L::Entry>>,
}

impl<L: EntryLoader> EntrySet<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            state: Mutex::new(EntrySetState::default()),
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Run the loader if needed; the caller holds the lock
    fn ensure_loaded(&self, state: &mut EntrySetState<L::Entry>) -> CatalogResult<()> {
        if state.loaded {
            return Ok(());
        }

        log::debug!("Loading entries for {}", self.loader.describe());
        let fetched = self.loader.load_entries()?;

        let mut entries: HashMap<String, Arc<L::Entry>> = HashMap::with_capacity(fetched.len());
        let mut ambiguous = HashSet::new();
        for entry in fetched {
            let key = normalize_name(entry.name());
            if ambiguous.contains(&key) {
                continue;
            }
            if entries.remove(&key).is_some() {
                log::warn!(
                    "Name '{}' in {} matches several entries that differ only in case",
                    entry.name(),
                    self.loader.describe()
                );
                ambiguous.insert(key);
                continue;
            }
            entries.insert(key, Arc::new(entry));
        }

        // Entries created locally and not yet reported remotely survive the load.
        for (key, entry) in state.entries.drain() {
            if !ambiguous.contains(&key) {
                entries.entry(key).or_insert(entry);
            }
        }

        log::debug!(
            "Loaded {} entries for {}",
            entries.len(),
            self.loader.describe()
        );
        state.entries = entries;
        state.ambiguous = ambiguous;
        state.loaded = true;
        Ok(())
    }

    /// Look up an entry, loading the set on first use
    pub fn get_entry(&self, name: &str) -> CatalogResult<Option<Arc<L::Entry>>> {
        let mut state = self.state.lock();
        self.ensure_loaded(&mut state)?;

        let key = normalize_name(name);
        if state.ambiguous.contains(&key) {
            return Err(CatalogError::Ambiguous(format!(
                "'{}' matches more than one entry in {}",
                name,
                self.loader.describe()
            )));
        }
        Ok(state.entries.get(&key).cloned())
    }

    /// Insert an explicitly created entry without loading the set
    pub fn create_entry(&self, entry: L::Entry) -> CatalogResult<Arc<L::Entry>> {
        let mut state = self.state.lock();

        let key = normalize_name(entry.name());
        if state.entries.contains_key(&key) || state.ambiguous.contains(&key) {
            return Err(CatalogError::DuplicateEntry(format!(
                "{} '{}' already exists in {}",
                entry.kind(),
                entry.name(),
                self.loader.describe()
            )));
        }

        let entry = Arc::new(self.loader.on_create(entry)?);
        state.entries.insert(key, entry.clone());
        Ok(entry)
    }

    /// Visit every entry, loading the set on first use
    ///
    /// The callback runs on a snapshot taken under the lock, after the lock is
    /// released. Entries created or dropped while the scan runs are not
    /// reflected in it.
    pub fn scan<F>(&self, mut callback: F) -> CatalogResult<()>
    where
        F: FnMut(&Arc<L::Entry>),
    {
        for entry in self.entries()? {
            callback(&entry);
        }
        Ok(())
    }

    /// Snapshot of all entries, loading the set on first use
    pub fn entries(&self) -> CatalogResult<Vec<Arc<L::Entry>>> {
        let mut state = self.state.lock();
        self.ensure_loaded(&mut state)?;
        Ok(state.entries.values().cloned().collect())
    }

    /// Remove an entry, deleting it remotely first when the loader does so
    ///
    /// If the remote deletion fails the entry stays cached. The lock is held
    /// across the remote call, so readers of this set wait for it to finish
    /// and never observe an entry that is gone remotely.
    pub fn drop_entry(&self, name: &str) -> CatalogResult<Arc<L::Entry>> {
        let mut state = self.state.lock();
        self.ensure_loaded(&mut state)?;

        let key = normalize_name(name);
        if state.ambiguous.contains(&key) {
            return Err(CatalogError::Ambiguous(format!(
                "'{}' matches more than one entry in {}",
                name,
                self.loader.describe()
            )));
        }
        let entry = state.entries.get(&key).cloned().ok_or_else(|| {
            CatalogError::EntryNotFound(format!(
                "'{}' does not exist in {}",
                name,
                self.loader.describe()
            ))
        })?;

        self.loader.drop_remote(&entry)?;
        state.entries.remove(&key);
        Ok(entry)
    }

    /// Forget every entry; the next read loads again
    pub fn clear_entries(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.ambiguous.clear();
        state.loaded = false;
    }

    pub fn is_loaded(&self) -> bool {
        self.state.lock().loaded
    }

    /// Number of cached entries, without loading
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
