// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for the remote catalog cache

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Remote catalog service error: {0}")]
    RemoteServiceError(String),

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Schema not empty: {0}")]
    SchemaNotEmpty(String),

    #[error("Ambiguous name: {0}")]
    Ambiguous(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Catalog is read-only: {0}")]
    ReadOnly(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl CatalogError {
    /// Whether this error came from the remote catalog service or its transport
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            CatalogError::AuthenticationFailed(_)
                | CatalogError::RemoteServiceError(_)
                | CatalogError::NotAuthorized(_)
                | CatalogError::SchemaNotEmpty(_)
        )
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::RemoteServiceError(format!("Malformed JSON: {}", err))
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::RemoteServiceError(err.to_string())
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
