// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Remote catalog client
//!
//! The cache and façade only talk to the catalog service through the
//! [`CatalogApi`] trait. [`HttpCatalogApi`] implements it against the Polaris
//! REST endpoints; tests and embedders may supply their own implementation.

pub mod credentials;
pub mod http;
pub mod types;
mod wire;

pub use credentials::Credentials;
pub use http::{initialize_transport, HttpCatalogApi};
pub use types::{
    ApiColumnDefinition, ApiSchema, ApiTable, ApiTableCreate, StagedTable, TableCredentials,
};

use crate::catalog::error::{CatalogError, CatalogResult};

/// Stateless request/response contract of the remote catalog service
///
/// Every call is a blocking round trip. Implementations must not retry on their
/// own behalf and must surface failures using the catalog error taxonomy.
pub trait CatalogApi: Send + Sync {
    /// Exchange application credentials for a bearer token
    fn get_token(&self, client_id: &str, client_secret: &str, endpoint: &str)
        -> CatalogResult<String>;

    /// List the catalogs visible to these credentials
    fn list_catalogs(&self, catalog: &str, credentials: &Credentials) -> CatalogResult<Vec<String>>;

    /// List the schemas of `catalog`
    fn list_schemas(&self, catalog: &str, credentials: &Credentials)
        -> CatalogResult<Vec<ApiSchema>>;

    /// List tables of `catalog`, either catalog-wide or scoped to `schema`
    fn list_tables(
        &self,
        catalog: &str,
        schema: Option<&str>,
        credentials: &Credentials,
    ) -> CatalogResult<Vec<ApiTable>>;

    /// Vend storage credentials for exactly one table
    fn get_table_credentials(
        &self,
        catalog: &str,
        schema: &str,
        table: &str,
        credentials: &Credentials,
    ) -> CatalogResult<TableCredentials>;

    /// Stage a new table and vend credentials for writing it
    ///
    /// The table is not visible in listings until the host commits its first
    /// snapshot.
    fn stage_create_table(
        &self,
        catalog: &str,
        schema: &str,
        table: &ApiTableCreate,
        _credentials: &Credentials,
    ) -> CatalogResult<StagedTable> {
        Err(CatalogError::NotSupported(format!(
            "Creating table '{}.{}' in catalog '{}' is not supported by this catalog service",
            schema, table.name, catalog
        )))
    }

    /// Create a schema on the remote service
    fn create_schema(
        &self,
        catalog: &str,
        schema: &str,
        _credentials: &Credentials,
    ) -> CatalogResult<ApiSchema> {
        Err(CatalogError::NotSupported(format!(
            "Creating schema '{}' in catalog '{}' is not supported by this catalog service",
            schema, catalog
        )))
    }

    /// Delete a schema on the remote service
    fn drop_schema(&self, catalog: &str, schema: &str, _credentials: &Credentials) -> CatalogResult<()> {
        Err(CatalogError::NotSupported(format!(
            "Dropping schema '{}' in catalog '{}' is not supported by this catalog service",
            schema, catalog
        )))
    }
}
