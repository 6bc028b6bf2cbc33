// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog entry and loader traits
//!
//! [`CatalogEntry`] is the capability every cached object exposes.
//! [`EntryLoader`] is what a cache scope supplies to the generic
//! [`EntrySet`](super::entry_set::EntrySet): how to list its entries remotely,
//! how to adjust an explicitly created entry and how to delete one remotely.

use super::error::CatalogResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a cached catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Schema,
    Table,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntryKind::Schema => "schema",
            EntryKind::Table => "table",
        };
        write!(f, "{}", s)
    }
}

/// Non-owning reference to the container of an entry
///
/// Resolved by name through the façade; it never keeps the parent alive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParentRef {
    pub catalog: String,
    /// Owning schema, `None` for entries that live directly in the catalog
    pub schema: Option<String>,
}

impl ParentRef {
    pub fn catalog(catalog: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            schema: None,
        }
    }

    pub fn schema(catalog: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            schema: Some(schema.into()),
        }
    }
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", self.catalog, schema),
            None => write!(f, "{}", self.catalog),
        }
    }
}

/// Named object cached by an entry set
pub trait CatalogEntry: Send + Sync {
    /// Name as reported by the catalog service (original case)
    fn name(&self) -> &str;

    fn kind(&self) -> EntryKind;

    /// Container the entry belongs to
    fn parent(&self) -> &ParentRef;
}

/// Scope-specific behaviour plugged into a generic entry set
///
/// `load_entries` is called with the owning set's lock held. It must not call
/// back into the same set.
pub trait EntryLoader: Send + Sync {
    type Entry: CatalogEntry;

    /// Fetch every entry of this scope from the remote service
    fn load_entries(&self) -> CatalogResult<Vec<Self::Entry>>;

    /// Adjust an explicitly created entry before it is inserted
    fn on_create(&self, entry: Self::Entry) -> CatalogResult<Self::Entry> {
        Ok(entry)
    }

    /// Delete an entry remotely before it is removed from the cache
    fn drop_remote(&self, _entry: &Self::Entry) -> CatalogResult<()> {
        Ok(())
    }

    /// Human-readable scope used in log lines
    fn describe(&self) -> String;
}
