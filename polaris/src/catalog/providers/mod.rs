// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Entry loaders for the two cache scopes
//!
//! The catalog-scoped cache holds schemas and is filled by
//! [`CatalogSchemaLoader`]; every schema owns a schema-scoped cache of tables
//! filled by [`SchemaTableLoader`].

pub mod schema_set;
pub mod table_set;

pub use schema_set::{CatalogSchemaLoader, SchemaSet};
pub use table_set::{SchemaTableLoader, TableSet};
