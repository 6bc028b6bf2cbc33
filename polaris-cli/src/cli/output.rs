// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Listing formatting for CLI output

use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use serde_json::json;

use super::commands::OutputFormat;

const SECRET_SETTINGS: [&str; 2] = ["secret", "session_token"];

pub struct SchemaRow {
    pub name: String,
    pub catalog: String,
}

pub struct TableRow {
    pub name: String,
    pub format: String,
    pub location: String,
    pub columns: Vec<String>,
}

pub struct CredentialRow {
    pub key: String,
    pub value: String,
}

impl CredentialRow {
    pub fn new(key: String, value: String, show_secrets: bool) -> Self {
        let value = if !show_secrets && SECRET_SETTINGS.contains(&key.as_str()) {
            "********".to_string()
        } else {
            value
        };
        Self { key, value }
    }
}

/// Formatter for catalog listings
pub struct CatalogFormatter;

impl CatalogFormatter {
    pub fn format_catalogs(catalogs: &[String], format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => Self::to_json(json!({ "catalogs": catalogs })),
            OutputFormat::Table => {
                let rows: Vec<Vec<String>> = catalogs.iter().map(|c| vec![c.clone()]).collect();
                Self::table("Catalogs", &["name"], rows)
            }
        }
    }

    pub fn format_schemas(schemas: &[SchemaRow], format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => Self::to_json(json!({
                "schemas": schemas
                    .iter()
                    .map(|s| json!({ "name": s.name, "catalog": s.catalog }))
                    .collect::<Vec<_>>()
            })),
            OutputFormat::Table => {
                let rows = schemas
                    .iter()
                    .map(|s| vec![s.name.clone(), s.catalog.clone()])
                    .collect();
                Self::table("Schemas", &["name", "catalog"], rows)
            }
        }
    }

    pub fn format_tables(tables: &[TableRow], format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => Self::to_json(json!({
                "tables": tables
                    .iter()
                    .map(|t| json!({
                        "name": t.name,
                        "format": t.format,
                        "location": t.location,
                        "columns": t.columns,
                    }))
                    .collect::<Vec<_>>()
            })),
            OutputFormat::Table => {
                let rows = tables
                    .iter()
                    .map(|t| {
                        vec![
                            t.name.clone(),
                            t.format.clone(),
                            t.location.clone(),
                            t.columns.join("\n"),
                        ]
                    })
                    .collect();
                Self::table("Tables", &["name", "format", "location", "columns"], rows)
            }
        }
    }

    pub fn format_credentials(rows: &[CredentialRow]) -> String {
        let rows = rows
            .iter()
            .map(|r| vec![r.key.clone(), r.value.clone()])
            .collect();
        Self::table("Storage settings", &["setting", "value"], rows)
    }

    fn table(title: &str, header: &[&str], rows: Vec<Vec<String>>) -> String {
        if rows.is_empty() {
            return format!("{}\n", "No results found".yellow());
        }

        let mut output = String::new();
        output.push_str(&format!("{} ({})\n", title.bold().green(), rows.len()));

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(
            header
                .iter()
                .map(|h| Cell::new(h).fg(Color::Green))
                .collect::<Vec<_>>(),
        );
        for row in rows {
            table.add_row(row);
        }

        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    fn to_json(value: serde_json::Value) -> String {
        let mut text = serde_json::to_string_pretty(&value)
            .unwrap_or_else(|_| "{\"status\": \"error\"}".to_string());
        text.push('\n');
        text
    }
}
