// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog façade - the object bound into one attachment
//!
//! [`PolarisCatalog`] is the only type a host engine talks to for metadata and
//! plan construction. It owns the catalog-scoped schema cache; every schema
//! in turn owns its table cache. Storage credentials are never cached: each
//! plan construction vends fresh ones and hands them over inside the
//! returned [`CredentialedPlan`].

use super::entry::{SchemaEntry, TableEntry};
use super::error::{CatalogError, CatalogResult};
use super::operations::{
    AccessMode, CreateIndexInfo, CreateSchemaInfo, CreateTableInfo, DatabaseSize, DropInfo,
    OnCreateConflict, OnEntryNotFound,
};
use super::providers::schema_set::{CatalogSchemaLoader, SchemaSet};
use super::traits::CatalogEntry;
use crate::api::{ApiColumnDefinition, ApiTableCreate, CatalogApi, Credentials};
use crate::plan::{CredentialedPlan, DataAccessKind, StorageAccess, TableIdentity};
use std::fmt;
use std::sync::Arc;

/// Catalog type reported to the host
pub const CATALOG_TYPE: &str = "polaris";

/// Remote-backed catalog of one attachment
pub struct PolarisCatalog {
    /// Name of the attachment in the host
    name: String,
    /// Name of the catalog on the remote service
    internal_name: String,
    access_mode: AccessMode,
    credentials: Arc<Credentials>,
    api: Arc<dyn CatalogApi>,
    schemas: SchemaSet,
}

impl PolarisCatalog {
    /// Create a catalog façade
    ///
    /// # Arguments
    /// * `name` - Attachment name used by the host
    /// * `internal_name` - Catalog name on the remote service
    /// * `access_mode` - Read-only attachments reject every write
    /// * `credentials` - Resolved credentials, immutable from here on
    /// * `api` - Remote catalog client
    pub fn new(
        name: impl Into<String>,
        internal_name: impl Into<String>,
        access_mode: AccessMode,
        credentials: Credentials,
        api: Arc<dyn CatalogApi>,
    ) -> Self {
        let internal_name = internal_name.into();
        let credentials = Arc::new(credentials);
        let loader = CatalogSchemaLoader::new(internal_name.clone(), api.clone(), credentials.clone());
        Self {
            name: name.into(),
            internal_name,
            access_mode,
            credentials,
            api,
            schemas: SchemaSet::new(loader),
        }
    }

    /// Nothing is fetched here; the schema listing happens on first access
    pub fn initialize(&self, load_builtin: bool) {
        log::debug!(
            "Initialized catalog '{}' for remote catalog '{}' (load_builtin: {})",
            self.name,
            self.internal_name,
            load_builtin
        );
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn internal_name(&self) -> &str {
        &self.internal_name
    }

    pub fn access_mode(&self) -> AccessMode {
        self.access_mode
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn catalog_type(&self) -> &'static str {
        CATALOG_TYPE
    }

    pub fn in_memory(&self) -> bool {
        false
    }

    pub fn db_path(&self) -> String {
        self.internal_name.clone()
    }

    pub fn get_database_size(&self) -> DatabaseSize {
        DatabaseSize::unknown()
    }

    fn check_writable(&self, action: &str) -> CatalogResult<()> {
        if self.access_mode.is_read_only() {
            return Err(CatalogError::ReadOnly(format!(
                "Cannot {} in read-only catalog '{}'",
                action, self.name
            )));
        }
        Ok(())
    }

    fn schema_not_found(&self, schema: &str) -> CatalogError {
        CatalogError::EntryNotFound(format!(
            "Schema '{}' does not exist in catalog '{}'",
            schema, self.name
        ))
    }

    // ==================== Schemas ====================

    /// Create a schema remotely and cache it without reloading the listing
    pub fn create_schema(&self, info: &CreateSchemaInfo) -> CatalogResult<Arc<SchemaEntry>> {
        self.check_writable("create schema")?;

        if info.on_conflict == OnCreateConflict::IgnoreOnConflict {
            if let Some(existing) = self.schemas.get_entry(&info.schema)? {
                return Ok(existing);
            }
        }

        let created = self
            .api
            .create_schema(&self.internal_name, &info.schema, &self.credentials)?;
        let entry = self.schemas.loader().schema_entry(created.schema_name);
        let entry = self.schemas.create_entry(entry)?;

        log::info!(
            "Created schema '{}' in catalog '{}'",
            entry.name(),
            self.internal_name
        );
        Ok(entry)
    }

    /// Look up a schema
    ///
    /// # Returns
    /// * `Ok(Some(schema))` if the schema exists
    /// * `Ok(None)` if it does not and the policy is `ReturnNull`
    /// * `Err(CatalogError::EntryNotFound)` if it does not and the policy is `ThrowException`
    /// * `Err(CatalogError::Ambiguous)` under either policy when the name is ambiguous
    pub fn get_schema(
        &self,
        name: &str,
        if_not_found: OnEntryNotFound,
    ) -> CatalogResult<Option<Arc<SchemaEntry>>> {
        match self.schemas.get_entry(name)? {
            Some(schema) => Ok(Some(schema)),
            None => match if_not_found {
                OnEntryNotFound::ReturnNull => Ok(None),
                OnEntryNotFound::ThrowException => Err(self.schema_not_found(name)),
            },
        }
    }

    pub fn scan_schemas<F>(&self, callback: F) -> CatalogResult<()>
    where
        F: FnMut(&Arc<SchemaEntry>),
    {
        self.schemas.scan(callback)
    }

    /// Drop a schema remotely, then forget it locally
    ///
    /// Remote failures leave the cached schema in place.
    pub fn drop_schema(&self, info: &DropInfo) -> CatalogResult<()> {
        self.check_writable("drop schema")?;

        if self.get_schema(&info.name, info.if_not_found)?.is_none() {
            log::debug!("Schema '{}' not found, nothing to drop", info.name);
            return Ok(());
        }

        let dropped = self.schemas.drop_entry(&info.name)?;
        log::info!(
            "Dropped schema '{}' from catalog '{}'{}",
            dropped.name(),
            self.internal_name,
            if info.cascade { " (cascade)" } else { "" }
        );
        Ok(())
    }

    // ==================== Tables ====================

    /// Look up a table by schema and name
    pub fn get_table(
        &self,
        schema: &str,
        table: &str,
        if_not_found: OnEntryNotFound,
    ) -> CatalogResult<Option<Arc<TableEntry>>> {
        // The schema cache lock is released before the table cache is touched.
        let schema_entry = match self.get_schema(schema, if_not_found)? {
            Some(entry) => entry,
            None => return Ok(None),
        };

        match schema_entry.get_table(table)? {
            Some(entry) => Ok(Some(entry)),
            None => match if_not_found {
                OnEntryNotFound::ReturnNull => Ok(None),
                OnEntryNotFound::ThrowException => Err(CatalogError::EntryNotFound(format!(
                    "Table '{}.{}' does not exist in catalog '{}'",
                    schema, table, self.name
                ))),
            },
        }
    }

    pub fn scan_tables<F>(&self, schema: &str, callback: F) -> CatalogResult<()>
    where
        F: FnMut(&Arc<TableEntry>),
    {
        let schema_entry = self
            .get_schema(schema, OnEntryNotFound::ThrowException)?
            .ok_or_else(|| self.schema_not_found(schema))?;
        schema_entry.scan_tables(callback)
    }

    /// Follow a table's back-reference to its owning schema
    pub fn resolve_schema(&self, table: &TableEntry) -> CatalogResult<Arc<SchemaEntry>> {
        let parent = table.parent();
        let schema = match &parent.schema {
            Some(schema) if parent.catalog == self.internal_name => schema,
            _ => {
                return Err(CatalogError::EntryNotFound(format!(
                    "Table '{}' does not belong to catalog '{}'",
                    table.qualified_name(),
                    self.internal_name
                )))
            }
        };
        self.get_schema(schema, OnEntryNotFound::ThrowException)?
            .ok_or_else(|| self.schema_not_found(schema))
    }

    // ==================== Plans ====================

    fn vend_storage(&self, schema: &str, table: &str, location: &str) -> CatalogResult<StorageAccess> {
        let credentials = self.api.get_table_credentials(
            &self.internal_name,
            schema,
            table,
            &self.credentials,
        )?;
        Ok(StorageAccess {
            location: location.to_string(),
            region: self.credentials.aws_region.clone(),
            credentials,
        })
    }

    fn credentialed_plan<P>(
        &self,
        kind: DataAccessKind,
        table: &TableEntry,
        input: P,
    ) -> CatalogResult<CredentialedPlan<P>> {
        if kind.is_write() {
            self.check_writable(&kind.to_string())?;
        }

        log::debug!(
            "Vending storage credentials for {} on '{}'",
            kind,
            table.qualified_name()
        );
        let storage = self.vend_storage(&table.schema_name, &table.name, &table.storage_location)?;

        Ok(CredentialedPlan {
            kind,
            table: TableIdentity::new(
                self.internal_name.clone(),
                table.schema_name.clone(),
                table.name.clone(),
            ),
            storage,
            input,
        })
    }

    /// Read path: credentials for scanning a table
    pub fn plan_scan<P>(&self, table: &TableEntry, input: P) -> CatalogResult<CredentialedPlan<P>> {
        self.credentialed_plan(DataAccessKind::Scan, table, input)
    }

    pub fn plan_insert<P>(&self, table: &TableEntry, input: P) -> CatalogResult<CredentialedPlan<P>> {
        self.credentialed_plan(DataAccessKind::Insert, table, input)
    }

    pub fn plan_delete<P>(&self, table: &TableEntry, input: P) -> CatalogResult<CredentialedPlan<P>> {
        self.credentialed_plan(DataAccessKind::Delete, table, input)
    }

    pub fn plan_update<P>(&self, table: &TableEntry, input: P) -> CatalogResult<CredentialedPlan<P>> {
        self.credentialed_plan(DataAccessKind::Update, table, input)
    }

    /// Stage the target of `CREATE TABLE ... AS` and vend credentials for it
    ///
    /// The table is staged on the remote service first; the staging response
    /// carries the write credentials and the assigned location. Only then is
    /// the table registered in the local cache. Fails with `DuplicateEntry`
    /// when the target is already known.
    pub fn plan_create_table_as<P>(
        &self,
        info: &CreateTableInfo,
        input: P,
    ) -> CatalogResult<CredentialedPlan<P>> {
        self.check_writable("create table")?;

        let schema = self
            .get_schema(&info.schema, OnEntryNotFound::ThrowException)?
            .ok_or_else(|| self.schema_not_found(&info.schema))?;
        if schema.get_table(&info.table)?.is_some() {
            return Err(CatalogError::DuplicateEntry(format!(
                "Table '{}.{}' already exists in catalog '{}'",
                info.schema, info.table, self.name
            )));
        }

        log::debug!(
            "Staging '{}.{}' and vending storage credentials for {}",
            schema.name(),
            info.table,
            DataAccessKind::CreateTableAs
        );
        let request = ApiTableCreate {
            name: info.table.clone(),
            columns: info.columns.iter().map(ApiColumnDefinition::from).collect(),
            storage_location: info.storage_location.clone(),
        };
        let staged = self.api.stage_create_table(
            &self.internal_name,
            schema.name(),
            &request,
            &self.credentials,
        )?;

        let mut entry = TableEntry::from(staged.table);
        if entry.columns.is_empty() {
            entry.columns = info.columns.clone();
        }
        if entry.data_source_format.is_empty() {
            entry.data_source_format = info.data_source_format.clone();
        }
        let storage = StorageAccess {
            location: entry.storage_location.clone(),
            region: self.credentials.aws_region.clone(),
            credentials: staged.credentials,
        };
        let entry = schema.create_table(entry)?;

        Ok(CredentialedPlan {
            kind: DataAccessKind::CreateTableAs,
            table: TableIdentity::new(
                self.internal_name.clone(),
                entry.schema_name.clone(),
                entry.name.clone(),
            ),
            storage,
            input,
        })
    }

    /// Indexes do not exist on the remote service
    pub fn bind_create_index<P>(&self, info: &CreateIndexInfo, _plan: P) -> CatalogResult<P> {
        Err(CatalogError::NotSupported(format!(
            "Cannot create index '{}' on '{}.{}': catalog '{}' does not support indexes",
            info.index_name, info.schema, info.table, self.name
        )))
    }

    // ==================== Maintenance ====================

    /// Forget every cached schema and, with them, every cached table
    pub fn clear_cache(&self) {
        self.schemas.clear_entries();
        log::info!("Cleared metadata cache of catalog '{}'", self.name);
    }

    /// Check that the remote service reports the attached catalog
    pub fn verify_remote_catalog(&self) -> CatalogResult<()> {
        let catalogs = self.api.list_catalogs(&self.internal_name, &self.credentials)?;
        if catalogs
            .iter()
            .any(|c| c.eq_ignore_ascii_case(&self.internal_name))
        {
            Ok(())
        } else {
            Err(CatalogError::EntryNotFound(format!(
                "Catalog '{}' is not available at '{}'",
                self.internal_name, self.credentials.endpoint
            )))
        }
    }

    pub fn schemas_loaded(&self) -> bool {
        self.schemas.is_loaded()
    }
}

impl fmt::Debug for PolarisCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolarisCatalog")
            .field("name", &self.name)
            .field("internal_name", &self.internal_name)
            .field("access_mode", &self.access_mode)
            .field("credentials", &self.credentials)
            .finish()
    }
}
