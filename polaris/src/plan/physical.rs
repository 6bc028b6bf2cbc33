// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Credential-carrying physical plan wrapper

use crate::api::TableCredentials;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of data access a plan performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataAccessKind {
    Scan,
    Insert,
    CreateTableAs,
    Delete,
    Update,
}

impl DataAccessKind {
    /// Whether the plan writes to the table
    pub fn is_write(&self) -> bool {
        !matches!(self, DataAccessKind::Scan)
    }
}

impl fmt::Display for DataAccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataAccessKind::Scan => "scan",
            DataAccessKind::Insert => "insert",
            DataAccessKind::CreateTableAs => "create_table_as",
            DataAccessKind::Delete => "delete",
            DataAccessKind::Update => "update",
        };
        write!(f, "{}", s)
    }
}

/// Fully qualified name of the table a plan targets
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableIdentity {
    pub catalog: String,
    pub schema: String,
    pub table: String,
}

impl TableIdentity {
    pub fn new(
        catalog: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            catalog: catalog.into(),
            schema: schema.into(),
            table: table.into(),
        }
    }
}

impl fmt::Display for TableIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.catalog, self.schema, self.table)
    }
}

/// Everything the data-access operator needs to reach object storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageAccess {
    /// Table root, used as the credential scope
    pub location: String,
    pub region: String,
    pub credentials: TableCredentials,
}

impl StorageAccess {
    /// Object-storage settings in the `s3` key convention
    pub fn settings(&self) -> BTreeMap<String, String> {
        let mut settings = BTreeMap::new();
        settings.insert("key_id".to_string(), self.credentials.key_id.clone());
        settings.insert("secret".to_string(), self.credentials.secret.clone());
        if !self.credentials.session_token.is_empty() {
            settings.insert(
                "session_token".to_string(),
                self.credentials.session_token.clone(),
            );
        }
        if !self.region.is_empty() {
            settings.insert("region".to_string(), self.region.clone());
        }
        if !self.location.is_empty() {
            settings.insert("scope".to_string(), self.location.clone());
        }
        settings
    }
}

/// A host operator preceded by a storage-credential fetch
///
/// Credentials are fetched once per plan construction and live only here.
#[derive(Debug, Clone)]
pub struct CredentialedPlan<P> {
    pub kind: DataAccessKind,
    pub table: TableIdentity,
    pub storage: StorageAccess,
    pub input: P,
}

impl<P> CredentialedPlan<P> {
    /// Transform the wrapped operator, keeping the credentials
    pub fn map_input<Q, F>(self, f: F) -> CredentialedPlan<Q>
    where
        F: FnOnce(P) -> Q,
    {
        CredentialedPlan {
            kind: self.kind,
            table: self.table,
            storage: self.storage,
            input: f(self.input),
        }
    }

    pub fn into_input(self) -> P {
        self.input
    }
}
