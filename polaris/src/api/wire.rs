// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! JSON bodies of the Polaris / Iceberg REST endpoints

use super::types::{ApiColumnDefinition, ApiTable, ApiTableCreate, TableCredentials};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

static DECIMAL_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^decimal\s*\(\s*(\d+)\s*,\s*(\d+)\s*\)$").expect("valid decimal type pattern")
});

pub(crate) const KEY_ID_CONFIG: &str = "s3.access-key-id";
pub(crate) const SECRET_CONFIG: &str = "s3.secret-access-key";
pub(crate) const SESSION_TOKEN_CONFIG: &str = "s3.session-token";

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogsResponse {
    #[serde(default)]
    pub catalogs: Vec<CatalogSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogSummary {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NamespacesResponse {
    #[serde(default)]
    pub namespaces: Vec<Vec<String>>,
    #[serde(rename = "next-page-token", default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CreateNamespaceRequest {
    pub namespace: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateNamespaceResponse {
    pub namespace: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TablesResponse {
    #[serde(default)]
    pub identifiers: Vec<TableIdentifier>,
    #[serde(rename = "next-page-token", default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TableIdentifier {
    pub namespace: Vec<String>,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateTableRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub schema: CreateTableSchema,
    #[serde(rename = "stage-create")]
    pub stage_create: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateTableSchema {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "schema-id")]
    pub schema_id: i64,
    pub fields: Vec<CreateTableField>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateTableField {
    pub id: u32,
    pub name: String,
    pub required: bool,
    #[serde(rename = "type")]
    pub field_type: String,
}

impl CreateTableRequest {
    /// Staged create; field ids are assigned from column positions
    pub(crate) fn staged(table: &ApiTableCreate) -> Self {
        let mut columns: Vec<&ApiColumnDefinition> = table.columns.iter().collect();
        columns.sort_by_key(|c| c.position);
        Self {
            name: table.name.clone(),
            location: Some(table.storage_location.clone()).filter(|l| !l.is_empty()),
            schema: CreateTableSchema {
                kind: "struct",
                schema_id: 0,
                fields: columns
                    .into_iter()
                    .enumerate()
                    .map(|(i, c)| CreateTableField {
                        id: i as u32 + 1,
                        name: c.name.clone(),
                        required: false,
                        field_type: c.type_text.to_lowercase(),
                    })
                    .collect(),
            },
            stage_create: true,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoadTableResponse {
    pub metadata: TableMetadata,
    #[serde(default)]
    pub config: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TableMetadata {
    #[serde(rename = "format-version", default)]
    pub format_version: u32,
    #[serde(rename = "table-uuid", default)]
    pub table_uuid: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "current-schema-id", default)]
    pub current_schema_id: i64,
    #[serde(default)]
    pub schemas: Vec<TableSchema>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TableSchema {
    #[serde(rename = "schema-id", default)]
    pub schema_id: i64,
    #[serde(default)]
    pub fields: Vec<SchemaField>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: Value,
}

/// Error envelope used by the Iceberg REST specification
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorBody {
    Model {
        message: String,
        #[serde(rename = "type", default)]
        kind: String,
    },
    /// OAuth endpoints report `{"error": "invalid_client", "error_description": ...}`
    Code(String),
}

/// Schema name for a (possibly multi-level) namespace
pub(crate) fn namespace_name(parts: &[String]) -> String {
    parts.join(".")
}

/// Namespace path segment for a schema name; nested levels use the unit separator
pub(crate) fn namespace_segment(schema: &str) -> String {
    schema.split('.').collect::<Vec<_>>().join("\u{1f}")
}

/// Extract a human-readable message from an error body, falling back to the raw text
pub(crate) fn error_message(body: &str) -> (String, String) {
    if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) {
        return match parsed.error {
            ErrorBody::Model { message, kind } => (message, kind),
            ErrorBody::Code(code) => {
                let description = serde_json::from_str::<Value>(body)
                    .ok()
                    .and_then(|v| {
                        v.get("error_description")
                            .and_then(|d| d.as_str())
                            .map(str::to_string)
                    })
                    .unwrap_or_else(|| code.clone());
                (description, code)
            }
        };
    }
    (body.trim().to_string(), String::new())
}

fn type_text(field_type: &Value) -> String {
    match field_type {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("type")
            .and_then(|t| t.as_str())
            .unwrap_or("unknown")
            .to_string(),
        other => other.to_string(),
    }
}

fn precision_and_scale(type_text: &str) -> (u32, u32) {
    DECIMAL_TYPE
        .captures(&type_text.to_lowercase())
        .and_then(|caps| {
            let precision = caps.get(1)?.as_str().parse().ok()?;
            let scale = caps.get(2)?.as_str().parse().ok()?;
            Some((precision, scale))
        })
        .unwrap_or((0, 0))
}

impl LoadTableResponse {
    /// Convert into the logical table descriptor
    pub(crate) fn into_table(self, catalog: &str, schema: &str, name: &str) -> ApiTable {
        let metadata = self.metadata;
        let current = metadata
            .schemas
            .iter()
            .find(|s| s.schema_id == metadata.current_schema_id)
            .or_else(|| metadata.schemas.last());

        let columns = current
            .map(|s| {
                s.fields
                    .iter()
                    .enumerate()
                    .map(|(i, field)| {
                        let type_text = type_text(&field.field_type);
                        let (precision, scale) = precision_and_scale(&type_text);
                        ApiColumnDefinition {
                            name: field.name.clone(),
                            type_text,
                            precision,
                            scale,
                            position: i as u32,
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        ApiTable {
            table_id: metadata.table_uuid,
            name: name.to_string(),
            catalog_name: catalog.to_string(),
            schema_name: schema.to_string(),
            table_type: "MANAGED".to_string(),
            data_source_format: format!("ICEBERG_V{}", metadata.format_version.max(1)),
            storage_location: metadata.location,
            columns,
        }
    }

    /// Storage credentials from the vended `config` map
    pub(crate) fn credentials(&self) -> Option<TableCredentials> {
        let key_id = self.config.get(KEY_ID_CONFIG)?;
        let secret = self.config.get(SECRET_CONFIG)?;
        Some(TableCredentials {
            key_id: key_id.clone(),
            secret: secret.clone(),
            session_token: self
                .config
                .get(SESSION_TOKEN_CONFIG)
                .cloned()
                .unwrap_or_default(),
        })
    }
}
