// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers

use colored::Colorize;
use std::sync::Arc;

use super::commands::{ConnectionArgs, OutputFormat};
use super::output::{CatalogFormatter, CredentialRow, SchemaRow, TableRow};
use polaris::{AccessMode, AttachInfo, CatalogEntry, PolarisCatalog, PolarisConfig, PolarisExtension};

type CliResult = Result<(), Box<dyn std::error::Error>>;

const ATTACH_NAME: &str = "cli";

/// Turn the connection flags into ATTACH options
///
/// Prompts for the client secret when a client id is given without one and
/// no token was supplied.
fn attach_info(connection: &ConnectionArgs, catalog: &str) -> Result<AttachInfo, Box<dyn std::error::Error>> {
    let mut info = AttachInfo::new(ATTACH_NAME, catalog).option("endpoint", connection.endpoint.clone());

    if let Some(token) = &connection.token {
        info = info.option("token", token.clone());
    }
    if let Some(client_id) = &connection.client_id {
        info = info.option("client_id", client_id.clone());
        let secret = match (&connection.client_secret, &connection.token) {
            (Some(secret), _) => Some(secret.clone()),
            (None, Some(_)) => None,
            (None, None) => {
                print!("Client secret: ");
                std::io::Write::flush(&mut std::io::stdout())?;
                Some(rpassword::read_password()?)
            }
        };
        if let Some(secret) = secret {
            info = info.option("client_secret", secret);
        }
    }
    if let Some(region) = &connection.aws_region {
        info = info.option("aws_region", region.clone());
    }
    Ok(info)
}

fn load_extension() -> Result<PolarisExtension, Box<dyn std::error::Error>> {
    PolarisExtension::load(PolarisConfig::default())
        .map_err(|e| format!("Failed to load extension: {}", e).into())
}

fn attach(
    extension: &PolarisExtension,
    connection: &ConnectionArgs,
    catalog: &str,
    access_mode: AccessMode,
) -> Result<Arc<PolarisCatalog>, Box<dyn std::error::Error>> {
    let info = attach_info(connection, catalog)?;
    let attached = extension
        .attach(&info, access_mode)
        .map_err(|e| format!("Failed to attach catalog '{}': {}", catalog, e))?;
    attached.verify_remote_catalog()?;
    Ok(attached)
}

/// Handle the token command
pub fn handle_token(connection: ConnectionArgs) -> CliResult {
    if connection.client_id.is_none() {
        return Err("--client-id is required to request a token".into());
    }
    let extension = load_extension()?;
    let info = attach_info(&connection, "")?;
    let credentials = extension.resolve_credentials(&info)?;

    println!("{}", credentials.token);
    Ok(())
}

/// Handle the catalogs command
pub fn handle_catalogs(connection: ConnectionArgs, format: OutputFormat) -> CliResult {
    let extension = load_extension()?;
    let info = attach_info(&connection, "")?;
    let credentials = extension.resolve_credentials(&info)?;

    let mut catalogs = extension.api().list_catalogs("", &credentials)?;
    catalogs.sort_by_key(|name| name.to_lowercase());
    print!("{}", CatalogFormatter::format_catalogs(&catalogs, format));
    Ok(())
}

/// Handle the schemas command
pub fn handle_schemas(connection: ConnectionArgs, catalog: String, format: OutputFormat) -> CliResult {
    let extension = load_extension()?;
    let attached = attach(&extension, &connection, &catalog, AccessMode::ReadOnly)?;

    let mut rows = Vec::new();
    attached.scan_schemas(|schema| {
        rows.push(SchemaRow {
            name: schema.name().to_string(),
            catalog: schema.catalog_name().to_string(),
        })
    })?;
    rows.sort_by_key(|row| row.name.to_lowercase());

    print!("{}", CatalogFormatter::format_schemas(&rows, format));
    Ok(())
}

/// Handle the tables command
pub fn handle_tables(
    connection: ConnectionArgs,
    catalog: String,
    schema: String,
    format: OutputFormat,
) -> CliResult {
    let extension = load_extension()?;
    let attached = attach(&extension, &connection, &catalog, AccessMode::ReadOnly)?;

    let mut rows = Vec::new();
    attached.scan_tables(&schema, |table| {
        rows.push(TableRow {
            name: table.name.clone(),
            format: table.data_source_format.clone(),
            location: table.storage_location.clone(),
            columns: table
                .columns
                .iter()
                .map(|c| format!("{} {}", c.name, c.type_text))
                .collect(),
        })
    })?;
    rows.sort_by_key(|row| row.name.to_lowercase());

    print!("{}", CatalogFormatter::format_tables(&rows, format));
    Ok(())
}

/// Handle the credentials command
pub fn handle_credentials(
    connection: ConnectionArgs,
    catalog: String,
    schema: String,
    table: String,
    write: bool,
    show_secrets: bool,
) -> CliResult {
    let extension = load_extension()?;
    let access_mode = if write { AccessMode::ReadWrite } else { AccessMode::ReadOnly };
    let attached = attach(&extension, &connection, &catalog, access_mode)?;

    let entry = attached
        .get_table(&schema, &table, polaris::OnEntryNotFound::ThrowException)?
        .ok_or_else(|| format!("Table '{}.{}' not found", schema, table))?;
    let plan = if write {
        attached.plan_insert(&entry, ())?
    } else {
        attached.plan_scan(&entry, ())?
    };

    println!(
        "{}",
        format!("Credentials for {} ({})", plan.table, plan.kind).bold().green()
    );
    let rows: Vec<CredentialRow> = plan
        .storage
        .settings()
        .into_iter()
        .map(|(key, value)| CredentialRow::new(key, value, show_secrets))
        .collect();
    print!("{}", CatalogFormatter::format_credentials(&rows));
    Ok(())
}
