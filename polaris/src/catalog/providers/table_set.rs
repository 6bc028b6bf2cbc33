// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Schema-scoped table cache

use crate::api::{CatalogApi, Credentials};
use crate::catalog::entry::TableEntry;
use crate::catalog::entry_set::EntrySet;
use crate::catalog::error::CatalogResult;
use crate::catalog::traits::{EntryLoader, ParentRef};
use std::sync::Arc;

/// Table cache of one schema
pub type TableSet = EntrySet<SchemaTableLoader>;

/// Lists the tables of one remote schema
pub struct SchemaTableLoader {
    catalog: String,
    schema: String,
    api: Arc<dyn CatalogApi>,
    credentials: Arc<Credentials>,
}

impl SchemaTableLoader {
    pub fn new(
        catalog: impl Into<String>,
        schema: impl Into<String>,
        api: Arc<dyn CatalogApi>,
        credentials: Arc<Credentials>,
    ) -> Self {
        Self {
            catalog: catalog.into(),
            schema: schema.into(),
            api,
            credentials,
        }
    }

    fn owner(&self) -> ParentRef {
        ParentRef::schema(self.catalog.clone(), self.schema.clone())
    }
}

impl EntryLoader for SchemaTableLoader {
    type Entry = TableEntry;

    fn load_entries(&self) -> CatalogResult<Vec<TableEntry>> {
        let tables = self
            .api
            .list_tables(&self.catalog, Some(&self.schema), &self.credentials)?;
        let owner = self.owner();
        Ok(tables
            .into_iter()
            .map(|table| TableEntry::from(table).with_parent(owner.clone()))
            .collect())
    }

    /// Tables created through this schema are owned by it
    fn on_create(&self, entry: TableEntry) -> CatalogResult<TableEntry> {
        let mut entry = entry.with_parent(self.owner());
        entry.catalog_name = self.catalog.clone();
        entry.schema_name = self.schema.clone();
        Ok(entry)
    }

    fn describe(&self) -> String {
        format!("schema '{}.{}'", self.catalog, self.schema)
    }
}
