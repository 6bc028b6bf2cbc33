// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Extension configuration and runtime settings

use crate::catalog::error::{CatalogError, CatalogResult};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Name of the secret consulted when ATTACH names none
pub const DEFAULT_SECRET_NAME: &str = "__default_polaris";

/// Setting whose assignment invalidates every attached catalog
pub const CLEAR_CACHE_SETTING: &str = "polaris_clear_cache";

/// Extension-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolarisConfig {
    /// HTTP transport configuration
    pub transport: TransportConfig,

    /// Secret looked up when ATTACH does not name one
    pub default_secret_name: String,

    /// Directory of the persistent secret store; `None` disables it
    pub secret_directory: Option<std::path::PathBuf>,
}

/// Configuration of the HTTP transport used by [`crate::api::HttpCatalogApi`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Per-request timeout; expiry surfaces as a remote service error
    pub request_timeout: Duration,

    /// Connection establishment timeout
    pub connect_timeout: Duration,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// OAuth scope requested during the client-credentials exchange
    pub token_scope: String,

    /// Value of the `X-Iceberg-Access-Delegation` header when vending credentials
    pub access_delegation: String,
}

impl Default for PolarisConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            default_secret_name: DEFAULT_SECRET_NAME.to_string(),
            secret_directory: None,
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("polaris-catalog/{}", crate::VERSION),
            token_scope: "PRINCIPAL_ROLE:ALL".to_string(),
            access_delegation: "vended-credentials".to_string(),
        }
    }
}

impl PolarisConfig {
    pub fn with_secret_directory(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.secret_directory = Some(dir.into());
        self
    }
}

/// Callback invoked when a setting is assigned
pub type SettingCallback = Arc<dyn Fn(&Value) -> CatalogResult<()> + Send + Sync>;

struct SettingDefinition {
    description: String,
    callback: Option<SettingCallback>,
}

/// Named runtime settings with change callbacks
///
/// A callback runs before the value is stored; if it fails the previous value
/// is kept.
#[derive(Default)]
pub struct Settings {
    definitions: RwLock<HashMap<String, SettingDefinition>>,
    values: RwLock<HashMap<String, Value>>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a setting with its default value
    pub fn register(
        &self,
        name: &str,
        description: &str,
        default: Value,
        callback: Option<SettingCallback>,
    ) {
        let key = name.to_lowercase();
        self.definitions.write().insert(
            key.clone(),
            SettingDefinition {
                description: description.to_string(),
                callback,
            },
        );
        self.values.write().insert(key, default);
        log::debug!("Registered setting '{}'", name);
    }

    /// Assign a setting, running its callback first
    pub fn set(&self, name: &str, value: Value) -> CatalogResult<()> {
        let key = name.to_lowercase();
        let callback = {
            let definitions = self.definitions.read();
            let definition = definitions.get(&key).ok_or_else(|| {
                CatalogError::InvalidParameters(format!("Unrecognized setting '{}'", name))
            })?;
            definition.callback.clone()
        };

        // Run outside the definitions lock so callbacks may read settings.
        if let Some(callback) = callback {
            callback(&value)?;
        }

        self.values.write().insert(key, value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.values.read().get(&name.to_lowercase()).cloned()
    }

    pub fn description(&self, name: &str) -> Option<String> {
        self.definitions
            .read()
            .get(&name.to_lowercase())
            .map(|d| d.description.clone())
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.definitions.read().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_default_config() {
        let config = PolarisConfig::default();
        assert_eq!(config.default_secret_name, DEFAULT_SECRET_NAME);
        assert_eq!(config.transport.token_scope, "PRINCIPAL_ROLE:ALL");
        assert!(config.secret_directory.is_none());
    }

    #[test]
    fn test_setting_callback_runs_on_assignment() {
        let settings = Settings::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        settings.register(
            "Some_Setting",
            "counts assignments",
            json!(false),
            Some(Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })),
        );

        settings.set("some_setting", json!(true)).unwrap();
        settings.set("SOME_SETTING", json!(false)).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(settings.get("some_setting"), Some(json!(false)));
        assert_eq!(settings.names(), vec!["some_setting".to_string()]);
    }

    #[test]
    fn test_failing_callback_keeps_previous_value() {
        let settings = Settings::new();
        settings.register(
            "strict",
            "rejects everything",
            json!(1),
            Some(Arc::new(|_| {
                Err(CatalogError::InvalidParameters("rejected".to_string()))
            })),
        );

        assert!(settings.set("strict", json!(2)).is_err());
        assert_eq!(settings.get("strict"), Some(json!(1)));
    }

    #[test]
    fn test_unknown_setting_rejected() {
        let settings = Settings::new();
        let err = settings.set("nope", json!(true)).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidParameters(_)));
    }
}
