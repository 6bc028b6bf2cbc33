// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Table functions exposed by the extension
//!
//! - `polaris_clear_cache()` YIELD success, cleared_catalogs
//!
//! The same invalidation is reachable through the `polaris_clear_cache`
//! setting; see [`clear_cache_on_setting`].

use super::error::{CatalogError, CatalogResult};
use super::registry::CatalogRegistry;
use crate::config::SettingCallback;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Name of the cache invalidation table function
pub const CLEAR_CACHE_FUNCTION: &str = "polaris_clear_cache";

/// Rows produced by a table function
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureResult {
    pub columns: Vec<String>,
    pub rows: Vec<HashMap<String, Value>>,
}

pub struct SystemProcedures {
    registry: Arc<CatalogRegistry>,
}

impl SystemProcedures {
    pub fn new(registry: Arc<CatalogRegistry>) -> Self {
        Self { registry }
    }

    /// Execute a table function by name
    pub fn execute_procedure(&self, name: &str, args: Vec<Value>) -> CatalogResult<ProcedureResult> {
        match name.to_lowercase().as_str() {
            CLEAR_CACHE_FUNCTION => self.clear_cache(args),
            _ => Err(CatalogError::NotSupported(format!(
                "Table function not found: {}. Available table functions: {}",
                name, CLEAR_CACHE_FUNCTION
            ))),
        }
    }

    pub fn is_valid_procedure(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(CLEAR_CACHE_FUNCTION)
    }

    fn clear_cache(&self, args: Vec<Value>) -> CatalogResult<ProcedureResult> {
        if !args.is_empty() {
            return Err(CatalogError::InvalidParameters(format!(
                "{}() takes no arguments, got {}",
                CLEAR_CACHE_FUNCTION,
                args.len()
            )));
        }

        let cleared = self.registry.clear_all_caches();

        let mut row = HashMap::new();
        row.insert("success".to_string(), json!(true));
        row.insert("cleared_catalogs".to_string(), json!(cleared));

        Ok(ProcedureResult {
            columns: vec!["success".to_string(), "cleared_catalogs".to_string()],
            rows: vec![row],
        })
    }
}

/// Setting callback clearing every attached catalog on assignment
///
/// The assigned value itself is ignored.
pub fn clear_cache_on_setting(registry: Arc<CatalogRegistry>) -> SettingCallback {
    Arc::new(move |_value: &Value| {
        let cleared = registry.clear_all_caches();
        log::debug!("Setting assignment cleared {} catalog caches", cleared);
        Ok(())
    })
}
