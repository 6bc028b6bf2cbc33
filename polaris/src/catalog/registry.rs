// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Registry of catalogs attached through one extension instance
//!
//! The registry only holds weak references. A catalog dropped by the host
//! (detached) disappears from it without explicit bookkeeping.

use super::error::{CatalogError, CatalogResult};
use super::manager::PolarisCatalog;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

#[derive(Default)]
pub struct CatalogRegistry {
    catalogs: RwLock<HashMap<String, Weak<PolarisCatalog>>>,
}

impl CatalogRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track an attached catalog under its attachment name
    ///
    /// # Returns
    /// * `Ok(())` if the name was free or its previous catalog is gone
    /// * `Err(CatalogError::DuplicateEntry)` if a live catalog uses the name
    pub fn register(&self, catalog: &Arc<PolarisCatalog>) -> CatalogResult<()> {
        let key = catalog.name().to_lowercase();
        let mut catalogs = self.catalogs.write();
        if let Some(existing) = catalogs.get(&key) {
            if existing.strong_count() > 0 {
                return Err(CatalogError::DuplicateEntry(format!(
                    "Catalog '{}' is already attached",
                    catalog.name()
                )));
            }
        }
        catalogs.insert(key, Arc::downgrade(catalog));
        log::info!(
            "Attached catalog '{}' (remote catalog '{}', {})",
            catalog.name(),
            catalog.internal_name(),
            catalog.access_mode()
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<PolarisCatalog>> {
        self.catalogs
            .read()
            .get(&name.to_lowercase())
            .and_then(Weak::upgrade)
    }

    /// Stop tracking a catalog; returns whether a live catalog was tracked
    pub fn detach(&self, name: &str) -> bool {
        let removed = self.catalogs.write().remove(&name.to_lowercase());
        let live = removed.map(|c| c.strong_count() > 0).unwrap_or(false);
        if live {
            log::info!("Detached catalog '{}'", name);
        }
        live
    }

    /// Live catalogs, pruning the ones the host already dropped
    pub fn attached(&self) -> Vec<Arc<PolarisCatalog>> {
        let mut catalogs = self.catalogs.write();
        catalogs.retain(|_, c| c.strong_count() > 0);
        catalogs.values().filter_map(Weak::upgrade).collect()
    }

    /// Clear the metadata cache of every live catalog
    pub fn clear_all_caches(&self) -> usize {
        let attached = self.attached();
        for catalog in &attached {
            catalog.clear_cache();
        }
        attached.len()
    }
}
