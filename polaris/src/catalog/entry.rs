// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Schema and table entries held by the metadata cache

use super::error::CatalogResult;
use super::providers::table_set::{SchemaTableLoader, TableSet};
use super::traits::{CatalogEntry, EntryKind, ParentRef};
use crate::api::{ApiColumnDefinition, ApiTable, CatalogApi, Credentials};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Column of a cached table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    /// Type as reported by the catalog service, e.g. `decimal(10,2)`
    pub type_text: String,
    pub precision: u32,
    pub scale: u32,
    /// Zero-based ordinal within the table
    pub position: u32,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, type_text: impl Into<String>, position: u32) -> Self {
        Self {
            name: name.into(),
            type_text: type_text.into(),
            precision: 0,
            scale: 0,
            position,
        }
    }
}

impl From<ApiColumnDefinition> for ColumnDefinition {
    fn from(column: ApiColumnDefinition) -> Self {
        Self {
            name: column.name,
            type_text: column.type_text,
            precision: column.precision,
            scale: column.scale,
            position: column.position,
        }
    }
}

impl From<&ColumnDefinition> for ApiColumnDefinition {
    fn from(column: &ColumnDefinition) -> Self {
        Self {
            name: column.name.clone(),
            type_text: column.type_text.clone(),
            precision: column.precision,
            scale: column.scale,
            position: column.position,
        }
    }
}

/// Cached descriptor of a remote table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    pub table_id: String,
    pub name: String,
    pub catalog_name: String,
    pub schema_name: String,
    pub table_type: String,
    pub data_source_format: String,
    pub storage_location: String,
    pub columns: Vec<ColumnDefinition>,
    parent: ParentRef,
}

impl TableEntry {
    pub fn new(
        name: impl Into<String>,
        catalog_name: impl Into<String>,
        schema_name: impl Into<String>,
    ) -> Self {
        let catalog_name = catalog_name.into();
        let schema_name = schema_name.into();
        Self {
            table_id: String::new(),
            name: name.into(),
            parent: ParentRef::schema(catalog_name.clone(), schema_name.clone()),
            catalog_name,
            schema_name,
            table_type: String::new(),
            data_source_format: String::new(),
            storage_location: String::new(),
            columns: Vec::new(),
        }
    }

    /// Re-home the entry under another owning schema
    pub fn with_parent(mut self, parent: ParentRef) -> Self {
        self.parent = parent;
        self
    }

    /// `catalog.schema.table`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}.{}", self.catalog_name, self.schema_name, self.name)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

impl From<ApiTable> for TableEntry {
    fn from(table: ApiTable) -> Self {
        let parent = ParentRef::schema(table.catalog_name.clone(), table.schema_name.clone());
        Self {
            table_id: table.table_id,
            name: table.name,
            catalog_name: table.catalog_name,
            schema_name: table.schema_name,
            table_type: table.table_type,
            data_source_format: table.data_source_format,
            storage_location: table.storage_location,
            columns: table.columns.into_iter().map(ColumnDefinition::from).collect(),
            parent,
        }
    }
}

impl CatalogEntry for TableEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> EntryKind {
        EntryKind::Table
    }

    fn parent(&self) -> &ParentRef {
        &self.parent
    }
}

/// Cached schema owning its own lazily loaded table cache
pub struct SchemaEntry {
    name: String,
    catalog_name: String,
    parent: ParentRef,
    tables: TableSet,
}

impl SchemaEntry {
    pub fn new(
        name: impl Into<String>,
        catalog_name: impl Into<String>,
        api: Arc<dyn CatalogApi>,
        credentials: Arc<Credentials>,
    ) -> Self {
        let name = name.into();
        let catalog_name = catalog_name.into();
        let loader = SchemaTableLoader::new(catalog_name.clone(), name.clone(), api, credentials);
        Self {
            parent: ParentRef::catalog(catalog_name.clone()),
            name,
            catalog_name,
            tables: TableSet::new(loader),
        }
    }

    pub fn catalog_name(&self) -> &str {
        &self.catalog_name
    }

    /// Look up a table, listing the schema's tables on first use
    pub fn get_table(&self, name: &str) -> CatalogResult<Option<Arc<TableEntry>>> {
        self.tables.get_entry(name)
    }

    /// Visit every table of the schema
    pub fn scan_tables<F>(&self, callback: F) -> CatalogResult<()>
    where
        F: FnMut(&Arc<TableEntry>),
    {
        self.tables.scan(callback)
    }

    /// Register a table created through this attachment
    pub fn create_table(&self, table: TableEntry) -> CatalogResult<Arc<TableEntry>> {
        self.tables.create_entry(table)
    }

    pub fn clear_tables(&self) {
        self.tables.clear_entries();
    }

    pub fn tables_loaded(&self) -> bool {
        self.tables.is_loaded()
    }
}

impl CatalogEntry for SchemaEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> EntryKind {
        EntryKind::Schema
    }

    fn parent(&self) -> &ParentRef {
        &self.parent
    }
}

impl fmt::Debug for SchemaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaEntry")
            .field("name", &self.name)
            .field("catalog_name", &self.catalog_name)
            .field("tables_loaded", &self.tables.is_loaded())
            .finish()
    }
}
