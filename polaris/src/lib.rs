// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Polaris Catalog - remote catalog metadata cache and credential vending
//!
//! This crate lets a SQL engine attach an Apache Polaris (Iceberg REST)
//! catalog as if it were a local database. Schemas and tables are listed
//! remotely on first use and cached; short-lived storage credentials are
//! vended for every data-access plan and never cached.
//!
//! # Features
//!
//! - **Lazy metadata cache**: one remote listing per cache scope, shared by all callers
//! - **Case-insensitive names**: lookups and uniqueness use the lowercased name
//! - **Credential vending**: per-table object storage credentials attached to each plan
//! - **Secrets**: `polaris` secrets in memory or on disk, with token exchange at creation
//! - **Invalidation**: programmatic, through the `polaris_clear_cache` setting,
//!   or through the `polaris_clear_cache()` table function
//!
//! # Usage
//!
//! ```ignore
//! use polaris::{AccessMode, AttachInfo, PolarisConfig, PolarisExtension};
//!
//! let extension = PolarisExtension::load(PolarisConfig::default())?;
//! let catalog = extension.attach(
//!     &AttachInfo::new("lake", "main")
//!         .option("endpoint", "https://polaris.example")
//!         .option("client_id", "id")
//!         .option("client_secret", "secret"),
//!     AccessMode::ReadWrite,
//! )?;
//! catalog.scan_schemas(|schema| println!("{}", schema.name()))?;
//! ```

pub mod api;
pub mod catalog;
pub mod config;
pub mod extension;
pub mod plan;
pub mod secret;
pub mod txn;

pub use api::{CatalogApi, Credentials, HttpCatalogApi, TableCredentials};
pub use catalog::entry::{ColumnDefinition, SchemaEntry, TableEntry};
pub use catalog::error::{CatalogError, CatalogResult};
pub use catalog::manager::PolarisCatalog;
pub use catalog::operations::{
    AccessMode, CreateIndexInfo, CreateSchemaInfo, CreateTableInfo, DatabaseSize, DropInfo,
    OnCreateConflict, OnEntryNotFound,
};
pub use catalog::traits::{CatalogEntry, EntryKind, ParentRef};
pub use config::PolarisConfig;
pub use extension::{AttachInfo, PolarisExtension};
pub use plan::{CredentialedPlan, DataAccessKind, StorageAccess, TableIdentity};
pub use secret::{CreateSecretInput, PolarisSecret};
pub use txn::{PolarisTransaction, PolarisTransactionManager};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
