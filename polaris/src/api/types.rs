// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Logical request/response types of the remote catalog contract

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column as reported by the catalog service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiColumnDefinition {
    pub name: String,
    pub type_text: String,
    pub precision: u32,
    pub scale: u32,
    pub position: u32,
}

/// Table descriptor returned by table listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiTable {
    pub table_id: String,
    pub name: String,
    pub catalog_name: String,
    pub schema_name: String,
    pub table_type: String,
    pub data_source_format: String,
    pub storage_location: String,
    pub columns: Vec<ApiColumnDefinition>,
}

/// Schema (namespace) descriptor returned by schema listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSchema {
    pub schema_name: String,
    pub catalog_name: String,
}

impl ApiSchema {
    pub fn new(schema_name: impl Into<String>, catalog_name: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name.into(),
            catalog_name: catalog_name.into(),
        }
    }
}

/// Request to stage a new table ahead of `CREATE TABLE ... AS`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiTableCreate {
    pub name: String,
    pub columns: Vec<ApiColumnDefinition>,
    /// Explicit location; empty lets the service assign one
    pub storage_location: String,
}

/// A table staged on the remote service together with the credentials to
/// write its first data files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedTable {
    pub table: ApiTable,
    pub credentials: TableCredentials,
}

/// Short-lived object storage credentials scoped to one table
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCredentials {
    pub key_id: String,
    pub secret: String,
    pub session_token: String,
}

impl fmt::Debug for TableCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableCredentials")
            .field("key_id", &self.key_id)
            .field("secret", &"redacted")
            .field("session_token", &"redacted")
            .finish()
    }
}
