// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Request types of the catalog façade
//!
//! These mirror what a host engine passes when it binds DDL against an
//! attached catalog: how to react to a missing entry, how to react to a
//! name clash, and the descriptors of the objects to create or drop.

use super::entry::ColumnDefinition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Access mode of an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessMode {
    ReadOnly,
    #[default]
    ReadWrite,
}

impl AccessMode {
    pub fn is_read_only(&self) -> bool {
        matches!(self, AccessMode::ReadOnly)
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessMode::ReadOnly => write!(f, "read_only"),
            AccessMode::ReadWrite => write!(f, "read_write"),
        }
    }
}

/// What a lookup does when the entry is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OnEntryNotFound {
    /// Return `Ok(None)`
    ReturnNull,
    /// Fail with `EntryNotFound`
    #[default]
    ThrowException,
}

/// What a create does when the name is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OnCreateConflict {
    #[default]
    ErrorOnConflict,
    IgnoreOnConflict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSchemaInfo {
    pub schema: String,
    pub on_conflict: OnCreateConflict,
}

impl CreateSchemaInfo {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            on_conflict: OnCreateConflict::default(),
        }
    }

    pub fn if_not_exists(mut self) -> Self {
        self.on_conflict = OnCreateConflict::IgnoreOnConflict;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropInfo {
    pub name: String,
    pub if_not_found: OnEntryNotFound,
    /// Requested `CASCADE`; the remote service decides whether a non-empty
    /// schema may be dropped
    pub cascade: bool,
}

impl DropInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            if_not_found: OnEntryNotFound::ThrowException,
            cascade: false,
        }
    }

    pub fn if_exists(mut self) -> Self {
        self.if_not_found = OnEntryNotFound::ReturnNull;
        self
    }

    pub fn cascade(mut self) -> Self {
        self.cascade = true;
        self
    }
}

/// Target of `CREATE TABLE ... AS SELECT`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTableInfo {
    pub schema: String,
    pub table: String,
    pub columns: Vec<ColumnDefinition>,
    pub data_source_format: String,
    /// Explicit location; the remote service assigns one when empty
    pub storage_location: String,
}

impl CreateTableInfo {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            columns: Vec::new(),
            data_source_format: "ICEBERG_V2".to_string(),
            storage_location: String::new(),
        }
    }

    pub fn with_columns(mut self, columns: Vec<ColumnDefinition>) -> Self {
        self.columns = columns;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIndexInfo {
    pub index_name: String,
    pub schema: String,
    pub table: String,
    pub columns: Vec<String>,
}

/// Storage footprint reported to the host
///
/// The remote service exposes no size metric, so every field is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatabaseSize {
    pub total_bytes: Option<u64>,
    pub used_bytes: Option<u64>,
    pub free_bytes: Option<u64>,
}

impl DatabaseSize {
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn is_unknown(&self) -> bool {
        self.total_bytes.is_none() && self.used_bytes.is_none() && self.free_bytes.is_none()
    }
}
