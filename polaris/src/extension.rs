// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Extension entry point
//!
//! [`PolarisExtension`] is what a host loads once per database instance. It
//! owns the remote client, the secret stores, the runtime settings and the
//! registry of attached catalogs, and it turns ATTACH requests into
//! [`PolarisCatalog`] instances.

use crate::api::{initialize_transport, CatalogApi, Credentials, HttpCatalogApi};
use crate::catalog::error::{CatalogError, CatalogResult};
use crate::catalog::manager::{PolarisCatalog, CATALOG_TYPE};
use crate::catalog::operations::AccessMode;
use crate::catalog::registry::CatalogRegistry;
use crate::catalog::system_procedures::{clear_cache_on_setting, ProcedureResult, SystemProcedures};
use crate::config::{PolarisConfig, Settings, CLEAR_CACHE_SETTING};
use crate::secret::{CreateSecretInput, LocalFileSecretStore, PolarisSecret, SecretManager};
use crate::txn::PolarisTransactionManager;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

pub const EXTENSION_NAME: &str = "polaris";

/// Options accepted by `ATTACH ... (TYPE polaris, ...)`
pub const ATTACH_OPTIONS: [&str; 8] = [
    "type",
    "read_only",
    "secret",
    "endpoint",
    "client_id",
    "client_secret",
    "aws_region",
    "token",
];

const CREDENTIAL_OPTIONS: [&str; 5] = ["endpoint", "client_id", "client_secret", "aws_region", "token"];

/// An ATTACH request
#[derive(Debug, Clone, Default)]
pub struct AttachInfo {
    /// Name of the attachment in the host
    pub name: String,
    /// Catalog name on the remote service
    pub path: String,
    pub options: Vec<(String, String)>,
}

impl AttachInfo {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            options: Vec::new(),
        }
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((key.into(), value.into()));
        self
    }
}

/// Options of an ATTACH request after validation
#[derive(Debug, Default)]
struct ParsedAttachOptions {
    secret: Option<String>,
    read_only: Option<bool>,
    credentials: HashMap<String, String>,
}

fn parse_bool(key: &str, value: &str) -> CatalogResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "" | "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(CatalogError::InvalidParameters(format!(
            "Option '{}' expects a boolean, got '{}'",
            key, value
        ))),
    }
}

fn parse_attach_options(info: &AttachInfo) -> CatalogResult<ParsedAttachOptions> {
    let mut parsed = ParsedAttachOptions::default();

    for (key, value) in &info.options {
        let lower = key.to_lowercase();
        match lower.as_str() {
            "type" => {
                if !value.eq_ignore_ascii_case(CATALOG_TYPE) {
                    return Err(CatalogError::InvalidParameters(format!(
                        "Cannot attach catalog of type '{}' with the {} extension",
                        value, EXTENSION_NAME
                    )));
                }
            }
            "read_only" => parsed.read_only = Some(parse_bool(key, value)?),
            "secret" => parsed.secret = Some(value.clone()),
            other if CREDENTIAL_OPTIONS.contains(&other) => {
                parsed.credentials.insert(lower.clone(), value.clone());
            }
            _ => {
                return Err(CatalogError::InvalidParameters(format!(
                    "Unrecognized option for polaris attach: {}",
                    key
                )))
            }
        }
    }

    Ok(parsed)
}

/// Loaded extension state of one host database instance
pub struct PolarisExtension {
    config: PolarisConfig,
    api: Arc<dyn CatalogApi>,
    secrets: SecretManager,
    settings: Settings,
    registry: Arc<CatalogRegistry>,
    procedures: SystemProcedures,
}

impl PolarisExtension {
    /// Load the extension against the Polaris REST API
    ///
    /// Sets up the process-wide HTTP transport on first use.
    pub fn load(config: PolarisConfig) -> CatalogResult<Self> {
        initialize_transport(&config.transport)?;
        let api = Arc::new(HttpCatalogApi::new(&config.transport)?);
        Self::with_api(config, api)
    }

    /// Load the extension with a caller-supplied catalog client
    pub fn with_api(config: PolarisConfig, api: Arc<dyn CatalogApi>) -> CatalogResult<Self> {
        let secrets = match &config.secret_directory {
            Some(dir) => SecretManager::with_local_file_store(LocalFileSecretStore::new(dir)?),
            None => SecretManager::new(),
        };

        let registry = Arc::new(CatalogRegistry::new());
        let settings = Settings::new();
        settings.register(
            CLEAR_CACHE_SETTING,
            "Clears the metadata cache of every attached polaris catalog when set",
            json!(false),
            Some(clear_cache_on_setting(registry.clone())),
        );

        log::info!("Loaded {} extension {}", EXTENSION_NAME, crate::VERSION);
        Ok(Self {
            config,
            api,
            secrets,
            settings,
            procedures: SystemProcedures::new(registry.clone()),
            registry,
        })
    }

    pub fn name(&self) -> &'static str {
        EXTENSION_NAME
    }

    pub fn version(&self) -> &'static str {
        crate::VERSION
    }

    pub fn config(&self) -> &PolarisConfig {
        &self.config
    }

    pub fn api(&self) -> &Arc<dyn CatalogApi> {
        &self.api
    }

    pub fn secrets(&self) -> &SecretManager {
        &self.secrets
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &Arc<CatalogRegistry> {
        &self.registry
    }

    /// `CREATE SECRET ... (TYPE polaris, ...)`
    pub fn create_secret(&self, input: &CreateSecretInput) -> CatalogResult<PolarisSecret> {
        self.secrets.create_secret(self.api.as_ref(), input)
    }

    /// Resolve the credentials of an ATTACH request
    ///
    /// Options given directly override the values of the secret. The secret
    /// named by `secret`, or else the default secret, supplies the rest. A
    /// missing default secret with no direct options yields empty credentials,
    /// which fail on first remote use.
    pub fn resolve_credentials(&self, info: &AttachInfo) -> CatalogResult<Credentials> {
        let options = parse_attach_options(info)?;
        self.resolve_from_options(&options)
    }

    fn resolve_from_options(&self, options: &ParsedAttachOptions) -> CatalogResult<Credentials> {
        let explicit = options.secret.is_some();
        let secret_name = options
            .secret
            .clone()
            .unwrap_or_else(|| self.config.default_secret_name.clone());

        let secret = self.secrets.get_secret_by_name(&secret_name)?;
        if secret.is_none() && explicit {
            return Err(CatalogError::MissingCredentials(format!(
                "Secret with name \"{}\" not found",
                secret_name
            )));
        }
        if secret.is_none() && options.credentials.is_empty() {
            log::debug!(
                "No credentials given and no secret '{}' found, attaching without credentials",
                secret_name
            );
            return Ok(Credentials::empty());
        }

        let pick = |key: &str| -> String {
            options
                .credentials
                .get(key)
                .map(String::as_str)
                .or_else(|| secret.as_ref().and_then(|s| s.get(key)))
                .unwrap_or_default()
                .to_string()
        };
        let credentials = Credentials::new(
            pick("endpoint"),
            pick("client_id"),
            pick("client_secret"),
            pick("aws_region"),
            pick("token"),
        );

        if credentials.has_token() {
            return Ok(credentials);
        }
        if !credentials.can_exchange() {
            return Err(CatalogError::MissingCredentials(
                "Token is blank and no client_id/client_secret were given to obtain one".to_string(),
            ));
        }

        log::debug!("Exchanging client credentials at '{}'", credentials.endpoint);
        let token = self
            .api
            .get_token(
                &credentials.client_id,
                &credentials.client_secret,
                &credentials.endpoint,
            )
            .map_err(|e| match e {
                CatalogError::AuthenticationFailed(msg) => CatalogError::AuthenticationFailed(msg),
                other => CatalogError::AuthenticationFailed(other.to_string()),
            })?;
        Ok(credentials.with_token(token))
    }

    /// Attach a remote catalog
    ///
    /// # Arguments
    /// * `info` - Attachment name, remote catalog name and options
    /// * `access_mode` - Mode requested by the host; a truthy `read_only`
    ///   option forces read-only
    pub fn attach(&self, info: &AttachInfo, access_mode: AccessMode) -> CatalogResult<Arc<PolarisCatalog>> {
        let options = parse_attach_options(info)?;
        let access_mode = match options.read_only {
            Some(true) => AccessMode::ReadOnly,
            Some(false) | None => access_mode,
        };
        let credentials = self.resolve_from_options(&options)?;

        let catalog = Arc::new(PolarisCatalog::new(
            info.name.clone(),
            info.path.clone(),
            access_mode,
            credentials,
            self.api.clone(),
        ));
        catalog.initialize(false);
        self.registry.register(&catalog)?;
        Ok(catalog)
    }

    pub fn detach(&self, name: &str) -> bool {
        self.registry.detach(name)
    }

    pub fn create_transaction_manager(&self, catalog: &PolarisCatalog) -> PolarisTransactionManager {
        PolarisTransactionManager::new(catalog.name(), catalog.access_mode())
    }

    /// `SET name = value`
    pub fn set_setting(&self, name: &str, value: Value) -> CatalogResult<()> {
        self.settings.set(name, value)
    }

    /// Run a table function such as `polaris_clear_cache()`
    pub fn call_function(&self, name: &str, args: Vec<Value>) -> CatalogResult<ProcedureResult> {
        self.procedures.execute_procedure(name, args)
    }

    /// Clear every attached catalog; returns how many were cleared
    pub fn clear_cache(&self) -> usize {
        self.registry.clear_all_caches()
    }
}
