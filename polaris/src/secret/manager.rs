// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Secret manager combining the memory and local-file stores

use super::store::{LocalFileSecretStore, MemorySecretStore, SecretStore};
use super::{create_polaris_secret, CreateSecretInput, PolarisSecret};
use crate::api::CatalogApi;
use crate::catalog::error::{CatalogError, CatalogResult};
use crate::catalog::operations::OnCreateConflict;

pub struct SecretManager {
    memory: MemorySecretStore,
    local_file: Option<LocalFileSecretStore>,
}

impl SecretManager {
    /// Manager with only the memory store
    pub fn new() -> Self {
        Self {
            memory: MemorySecretStore::new(),
            local_file: None,
        }
    }

    pub fn with_local_file_store(local_file: LocalFileSecretStore) -> Self {
        Self {
            memory: MemorySecretStore::new(),
            local_file: Some(local_file),
        }
    }

    fn stores(&self) -> impl Iterator<Item = &dyn SecretStore> {
        std::iter::once(&self.memory as &dyn SecretStore)
            .chain(self.local_file.as_ref().map(|s| s as &dyn SecretStore))
    }

    /// Create and store a secret
    ///
    /// # Returns
    /// * `Ok(secret)` with the stored (or, under `IgnoreOnConflict`, the existing) secret
    /// * `Err(CatalogError::DuplicateEntry)` if the name is taken and neither
    ///   replace nor ignore was requested
    /// * `Err(CatalogError::InvalidParameters)` for unknown parameters or a
    ///   persistent secret without a local-file store
    pub fn create_secret(
        &self,
        api: &dyn CatalogApi,
        input: &CreateSecretInput,
    ) -> CatalogResult<PolarisSecret> {
        let target: &dyn SecretStore = if input.persistent {
            self.local_file.as_ref().ok_or_else(|| {
                CatalogError::InvalidParameters(
                    "Persistent secrets require a secret directory".to_string(),
                )
            })?
        } else {
            &self.memory
        };

        if !input.replace {
            if let Some(existing) = target.get(&input.name)? {
                return match input.on_conflict {
                    OnCreateConflict::IgnoreOnConflict => Ok(existing),
                    OnCreateConflict::ErrorOnConflict => Err(CatalogError::DuplicateEntry(format!(
                        "Secret '{}' already exists in the {} store",
                        input.name,
                        target.name()
                    ))),
                };
            }
        }

        let secret = create_polaris_secret(api, input)?;
        target.put(secret.clone())?;
        log::info!("Created secret '{}' in the {} store", secret.name, target.name());
        Ok(secret)
    }

    /// Look a secret up in the memory store, then the local-file store
    pub fn get_secret_by_name(&self, name: &str) -> CatalogResult<Option<PolarisSecret>> {
        for store in self.stores() {
            if let Some(secret) = store.get(name)? {
                log::debug!("Found secret '{}' in the {} store", name, store.name());
                return Ok(Some(secret));
            }
        }
        Ok(None)
    }

    /// Remove a secret from every store holding it
    pub fn drop_secret(&self, name: &str) -> CatalogResult<bool> {
        let mut removed = false;
        for store in self.stores() {
            removed |= store.remove(name)?;
        }
        Ok(removed)
    }

    /// `(store, name)` pairs of every stored secret
    pub fn list_secrets(&self) -> CatalogResult<Vec<(String, String)>> {
        let mut secrets = Vec::new();
        for store in self.stores() {
            for name in store.list()? {
                secrets.push((store.name().to_string(), name));
            }
        }
        Ok(secrets)
    }
}

impl Default for SecretManager {
    fn default() -> Self {
        Self::new()
    }
}
