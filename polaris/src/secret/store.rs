// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Secret storage backends
//!
//! Lookups consult the memory store first and the local-file store second.

use super::PolarisSecret;
use crate::catalog::error::{CatalogError, CatalogResult};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

static SECRET_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_\-]+$").expect("valid secret name pattern"));

/// Backend holding secrets by case-insensitive name
pub trait SecretStore: Send + Sync {
    /// Store name as shown to users (`memory`, `local_file`)
    fn name(&self) -> &'static str;

    fn get(&self, name: &str) -> CatalogResult<Option<PolarisSecret>>;

    /// Insert or overwrite a secret
    fn put(&self, secret: PolarisSecret) -> CatalogResult<()>;

    /// Returns whether a secret was removed
    fn remove(&self, name: &str) -> CatalogResult<bool>;

    /// Secret names, sorted
    fn list(&self) -> CatalogResult<Vec<String>>;
}

/// Secrets living for the lifetime of the process
#[derive(Default)]
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<String, PolarisSecret>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for MemorySecretStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, name: &str) -> CatalogResult<Option<PolarisSecret>> {
        Ok(self.secrets.read().get(&name.to_lowercase()).cloned())
    }

    fn put(&self, secret: PolarisSecret) -> CatalogResult<()> {
        self.secrets
            .write()
            .insert(secret.name.to_lowercase(), secret);
        Ok(())
    }

    fn remove(&self, name: &str) -> CatalogResult<bool> {
        Ok(self.secrets.write().remove(&name.to_lowercase()).is_some())
    }

    fn list(&self) -> CatalogResult<Vec<String>> {
        let mut names: Vec<String> = self.secrets.read().values().map(|s| s.name.clone()).collect();
        names.sort();
        Ok(names)
    }
}

/// One JSON file per secret under a directory
pub struct LocalFileSecretStore {
    directory: PathBuf,
}

impl LocalFileSecretStore {
    /// Open a store, creating its directory if needed
    pub fn new(directory: impl Into<PathBuf>) -> CatalogResult<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(|e| {
            CatalogError::IoError(format!(
                "Failed to create secret directory {}: {}",
                directory.display(),
                e
            ))
        })?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File of a secret; `None` for names that cannot be stored on disk
    fn file_for(&self, name: &str) -> Option<PathBuf> {
        SECRET_NAME
            .is_match(name)
            .then(|| self.directory.join(format!("{}.json", name.to_lowercase())))
    }
}

impl SecretStore for LocalFileSecretStore {
    fn name(&self) -> &'static str {
        "local_file"
    }

    fn get(&self, name: &str) -> CatalogResult<Option<PolarisSecret>> {
        let path = match self.file_for(name) {
            Some(path) => path,
            None => return Ok(None),
        };
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        let secret = serde_json::from_str(&contents).map_err(|e| {
            CatalogError::IoError(format!("Corrupt secret file {}: {}", path.display(), e))
        })?;
        Ok(Some(secret))
    }

    fn put(&self, secret: PolarisSecret) -> CatalogResult<()> {
        let path = self.file_for(&secret.name).ok_or_else(|| {
            CatalogError::InvalidParameters(format!(
                "Invalid secret name '{}': only letters, digits, '_' and '-' are allowed",
                secret.name
            ))
        })?;
        let contents = serde_json::to_string_pretty(&secret).map_err(|e| {
            CatalogError::IoError(format!("Failed to serialize secret '{}': {}", secret.name, e))
        })?;
        fs::write(&path, contents)?;
        log::debug!("Persisted secret '{}' to {}", secret.name, path.display());
        Ok(())
    }

    fn remove(&self, name: &str) -> CatalogResult<bool> {
        let path = match self.file_for(name) {
            Some(path) => path,
            None => return Ok(false),
        };
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        Ok(true)
    }

    fn list(&self) -> CatalogResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if let Some(secret) = self.get(stem)? {
                    names.push(secret.name);
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn secret(name: &str) -> PolarisSecret {
        let mut secret = PolarisSecret::new(name);
        secret.set("endpoint", "https://cat.example");
        secret.set("token", "tok");
        secret
    }

    #[test]
    fn test_memory_store_is_case_insensitive() {
        let store = MemorySecretStore::new();
        store.put(secret("Prod")).unwrap();

        assert_eq!(store.get("PROD").unwrap().unwrap().name, "Prod");
        assert_eq!(store.list().unwrap(), vec!["Prod".to_string()]);
        assert!(store.remove("prod").unwrap());
        assert!(store.get("prod").unwrap().is_none());
    }

    #[test]
    fn test_local_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = LocalFileSecretStore::new(dir.path().join("secrets")).unwrap();
        store.put(secret("prod")).unwrap();

        let reopened = LocalFileSecretStore::new(dir.path().join("secrets")).unwrap();
        let loaded = reopened.get("prod").unwrap().unwrap();
        assert_eq!(loaded, secret("prod"));
        assert_eq!(reopened.list().unwrap(), vec!["prod".to_string()]);

        assert!(reopened.remove("prod").unwrap());
        assert!(!reopened.remove("prod").unwrap());
    }

    #[test]
    fn test_local_file_store_rejects_path_like_names() {
        let dir = TempDir::new().unwrap();
        let store = LocalFileSecretStore::new(dir.path()).unwrap();
        let err = store.put(secret("../etc/passwd")).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidParameters(_)));

        assert!(store.get("../etc/passwd").unwrap().is_none());
        assert!(store.get("prod.lake").unwrap().is_none());
        assert!(!store.remove("prod.lake").unwrap());
        assert!(store.list().unwrap().is_empty());
    }
}
