// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! `polaris` secrets
//!
//! A secret is a named key/value record holding the connection settings of a
//! catalog service: `endpoint`, `client_id`, `client_secret`, `aws_region` and
//! a bearer `token`. Creating one without a token exchanges the client
//! credentials for it right away, so ATTACH never has to.

pub mod manager;
pub mod store;

pub use manager::SecretManager;
pub use store::{LocalFileSecretStore, MemorySecretStore, SecretStore};

use crate::api::credentials::normalize_endpoint;
use crate::api::{CatalogApi, Credentials};
use crate::catalog::error::{CatalogError, CatalogResult};
use crate::catalog::operations::OnCreateConflict;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const SECRET_TYPE: &str = "polaris";
pub const SECRET_PROVIDER: &str = "config";

/// Named parameters accepted when creating a `polaris` secret
pub const SECRET_PARAMETERS: [&str; 5] =
    ["client_id", "client_secret", "endpoint", "aws_region", "token"];

/// Keys never shown in rendered secrets
pub const REDACT_KEYS: [&str; 3] = ["token", "client_id", "client_secret"];

/// Key/value secret of type `polaris`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolarisSecret {
    pub name: String,
    pub secret_type: String,
    pub provider: String,
    values: BTreeMap<String, String>,
    redact_keys: Vec<String>,
}

impl PolarisSecret {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secret_type: SECRET_TYPE.to_string(),
            provider: SECRET_PROVIDER.to_string(),
            values: BTreeMap::new(),
            redact_keys: REDACT_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_lowercase(), value.into());
    }

    /// Values with the sensitive ones replaced by `redacted`
    pub fn redacted(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .map(|(key, value)| {
                if self.redact_keys.iter().any(|k| k == key) {
                    (key.clone(), "redacted".to_string())
                } else {
                    (key.clone(), value.clone())
                }
            })
            .collect()
    }

    /// Connection credentials described by this secret
    ///
    /// Each field is resolved on its own; a missing value becomes empty.
    pub fn to_credentials(&self) -> Credentials {
        Credentials::new(
            self.get("endpoint").unwrap_or_default(),
            self.get("client_id").unwrap_or_default(),
            self.get("client_secret").unwrap_or_default(),
            self.get("aws_region").unwrap_or_default(),
            self.get("token").unwrap_or_default(),
        )
    }
}

impl fmt::Debug for PolarisSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolarisSecret")
            .field("name", &self.name)
            .field("secret_type", &self.secret_type)
            .field("provider", &self.provider)
            .field("values", &self.redacted())
            .finish()
    }
}

impl fmt::Display for PolarisSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "name={};type={};provider={}",
            self.name, self.secret_type, self.provider
        )?;
        for (key, value) in self.redacted() {
            write!(f, ";{}={}", key, value)?;
        }
        Ok(())
    }
}

/// Arguments of `CREATE SECRET ... (TYPE polaris, ...)`
#[derive(Debug, Clone, Default)]
pub struct CreateSecretInput {
    pub name: String,
    /// Named parameters in the order given
    pub options: Vec<(String, String)>,
    /// Store in the local-file store instead of memory
    pub persistent: bool,
    pub on_conflict: OnCreateConflict,
    /// `CREATE OR REPLACE SECRET`
    pub replace: bool,
}

impl CreateSecretInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((key.into(), value.into()));
        self
    }

    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    pub fn if_not_exists(mut self) -> Self {
        self.on_conflict = OnCreateConflict::IgnoreOnConflict;
        self
    }

    pub fn or_replace(mut self) -> Self {
        self.replace = true;
        self
    }
}

/// Build a `polaris` secret, exchanging a token when none was given
pub fn create_polaris_secret(
    api: &dyn CatalogApi,
    input: &CreateSecretInput,
) -> CatalogResult<PolarisSecret> {
    let mut secret = PolarisSecret::new(input.name.clone());

    for (key, value) in &input.options {
        let lower = key.to_lowercase();
        if !SECRET_PARAMETERS.contains(&lower.as_str()) {
            return Err(CatalogError::InvalidParameters(format!(
                "Unknown named parameter '{}' for secret type '{}'",
                key, SECRET_TYPE
            )));
        }
        if lower == "endpoint" {
            secret.set(&lower, normalize_endpoint(value));
        } else {
            secret.set(&lower, value.clone());
        }
    }

    let has_token = secret.get("token").map(|t| !t.is_empty()).unwrap_or(false);
    if !has_token {
        let credentials = secret.to_credentials();
        if !credentials.can_exchange() {
            return Err(CatalogError::MissingCredentials(format!(
                "Secret '{}' needs either a token or client_id and client_secret",
                input.name
            )));
        }
        log::debug!("Exchanging client credentials for secret '{}'", input.name);
        let token = api.get_token(
            &credentials.client_id,
            &credentials.client_secret,
            &credentials.endpoint,
        )?;
        secret.set("token", token);
    }

    Ok(secret)
}
