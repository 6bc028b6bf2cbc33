// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog-scoped schema cache

use crate::api::{CatalogApi, Credentials};
use crate::catalog::entry::SchemaEntry;
use crate::catalog::entry_set::EntrySet;
use crate::catalog::error::CatalogResult;
use crate::catalog::traits::{CatalogEntry, EntryLoader};
use std::sync::Arc;

/// Schema cache of one attached catalog
pub type SchemaSet = EntrySet<CatalogSchemaLoader>;

/// Lists the schemas of a remote catalog
pub struct CatalogSchemaLoader {
    catalog: String,
    api: Arc<dyn CatalogApi>,
    credentials: Arc<Credentials>,
}

impl CatalogSchemaLoader {
    pub fn new(
        catalog: impl Into<String>,
        api: Arc<dyn CatalogApi>,
        credentials: Arc<Credentials>,
    ) -> Self {
        Self {
            catalog: catalog.into(),
            api,
            credentials,
        }
    }

    pub fn catalog(&self) -> &str {
        &self.catalog
    }

    /// Build an entry for a schema of this catalog
    pub fn schema_entry(&self, name: impl Into<String>) -> SchemaEntry {
        SchemaEntry::new(
            name,
            self.catalog.clone(),
            self.api.clone(),
            self.credentials.clone(),
        )
    }
}

impl EntryLoader for CatalogSchemaLoader {
    type Entry = SchemaEntry;

    fn load_entries(&self) -> CatalogResult<Vec<SchemaEntry>> {
        let schemas = self.api.list_schemas(&self.catalog, &self.credentials)?;
        Ok(schemas
            .into_iter()
            .map(|schema| self.schema_entry(schema.schema_name))
            .collect())
    }

    fn drop_remote(&self, entry: &SchemaEntry) -> CatalogResult<()> {
        self.api
            .drop_schema(&self.catalog, entry.name(), &self.credentials)
    }

    fn describe(&self) -> String {
        format!("catalog '{}'", self.catalog)
    }
}
