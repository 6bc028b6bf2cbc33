// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! HTTP implementation of the remote catalog contract
//!
//! Talks to the Polaris management API (catalog listing) and the Iceberg REST
//! catalog API (namespaces, tables, vended credentials). All requests are
//! blocking; failures are mapped onto the catalog error taxonomy and never
//! retried here.

use super::credentials::Credentials;
use super::types::{ApiSchema, ApiTable, ApiTableCreate, StagedTable, TableCredentials};
use super::wire::{
    error_message, namespace_name, namespace_segment, CatalogsResponse, CreateNamespaceRequest,
    CreateNamespaceResponse, CreateTableRequest, LoadTableResponse, NamespacesResponse,
    TablesResponse, TokenResponse,
};
use super::CatalogApi;
use crate::catalog::error::{CatalogError, CatalogResult};
use crate::config::TransportConfig;
use once_cell::sync::OnceCell;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::fmt;

const ACCESS_DELEGATION_HEADER: &str = "X-Iceberg-Access-Delegation";

/// Process-wide HTTP client, built once when the extension loads
static TRANSPORT: OnceCell<Client> = OnceCell::new();

/// Build the shared HTTP client
///
/// Must be called once before any [`HttpCatalogApi`] is created. Later calls
/// are no-ops and do not apply a different configuration.
pub fn initialize_transport(config: &TransportConfig) -> CatalogResult<()> {
    TRANSPORT.get_or_try_init(|| {
        log::debug!(
            "Initializing catalog transport (timeout {:?}, user agent '{}')",
            config.request_timeout,
            config.user_agent
        );
        Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(CatalogError::from)
    })?;
    Ok(())
}

fn transport() -> CatalogResult<Client> {
    TRANSPORT.get().cloned().ok_or_else(|| {
        CatalogError::RemoteServiceError(
            "Catalog transport is not initialized; load the extension first".to_string(),
        )
    })
}

/// [`CatalogApi`] over the Polaris REST endpoints
pub struct HttpCatalogApi {
    client: Client,
    token_scope: String,
    access_delegation: String,
}

impl HttpCatalogApi {
    /// Create a client on top of the shared transport
    pub fn new(config: &TransportConfig) -> CatalogResult<Self> {
        Ok(Self {
            client: transport()?,
            token_scope: config.token_scope.clone(),
            access_delegation: config.access_delegation.clone(),
        })
    }

    fn url(endpoint: &str, segments: &[&str]) -> CatalogResult<Url> {
        if endpoint.is_empty() {
            return Err(CatalogError::MissingCredentials(
                "No catalog endpoint configured".to_string(),
            ));
        }
        let mut url = Url::parse(endpoint).map_err(|e| {
            CatalogError::InvalidParameters(format!("Invalid endpoint '{}': {}", endpoint, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                CatalogError::InvalidParameters(format!("Endpoint '{}' cannot be a base URL", endpoint))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn catalog_url(credentials: &Credentials, catalog: &str, rest: &[&str]) -> CatalogResult<Url> {
        let mut segments = vec!["api", "catalog", "v1", catalog];
        segments.extend_from_slice(rest);
        Self::url(&credentials.endpoint, &segments)
    }

    fn get(&self, url: Url, credentials: &Credentials) -> RequestBuilder {
        self.client.get(url).bearer_auth(&credentials.token)
    }

    fn send(request: RequestBuilder, context: &str) -> CatalogResult<Response> {
        let response = request.send().map_err(|e| {
            CatalogError::RemoteServiceError(format!("{}: {}", context, e))
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(status_error(status, response.text(), context))
    }

    fn json<T: DeserializeOwned>(response: Response, context: &str) -> CatalogResult<T> {
        let body = response.text().map_err(|e| {
            CatalogError::RemoteServiceError(format!("{}: {}", context, e))
        })?;
        serde_json::from_str(&body).map_err(|e| {
            CatalogError::RemoteServiceError(format!("{}: malformed response: {}", context, e))
        })
    }

    fn list_namespaces(&self, catalog: &str, credentials: &Credentials) -> CatalogResult<Vec<String>> {
        let context = format!("Listing schemas of catalog '{}'", catalog);
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut url = Self::catalog_url(credentials, catalog, &["namespaces"])?;
            if let Some(token) = &page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }
            let response = Self::send(self.get(url, credentials), &context)?;
            let page: NamespacesResponse = Self::json(response, &context)?;
            names.extend(page.namespaces.iter().map(|ns| namespace_name(ns)));
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(names)
    }

    fn list_table_names(
        &self,
        catalog: &str,
        schema: &str,
        credentials: &Credentials,
    ) -> CatalogResult<Vec<String>> {
        let context = format!("Listing tables of schema '{}.{}'", catalog, schema);
        let namespace = namespace_segment(schema);
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut url =
                Self::catalog_url(credentials, catalog, &["namespaces", &namespace, "tables"])?;
            if let Some(token) = &page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }
            let response = Self::send(self.get(url, credentials), &context)?;
            let page: TablesResponse = Self::json(response, &context)?;
            names.extend(page.identifiers.into_iter().map(|id| id.name));
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(names)
    }

    fn load_table(
        &self,
        catalog: &str,
        schema: &str,
        table: &str,
        credentials: &Credentials,
        vend_credentials: bool,
    ) -> CatalogResult<LoadTableResponse> {
        let context = format!("Loading table '{}.{}.{}'", catalog, schema, table);
        let namespace = namespace_segment(schema);
        let url = Self::catalog_url(
            credentials,
            catalog,
            &["namespaces", &namespace, "tables", table],
        )?;
        let mut request = self.get(url, credentials);
        if vend_credentials {
            request = request.header(ACCESS_DELEGATION_HEADER, self.access_delegation.as_str());
        }
        let response = Self::send(request, &context)?;
        Self::json(response, &context)
    }

    fn tables_in_schema(
        &self,
        catalog: &str,
        schema: &str,
        credentials: &Credentials,
    ) -> CatalogResult<Vec<ApiTable>> {
        self.list_table_names(catalog, schema, credentials)?
            .into_iter()
            .map(|name| {
                self.load_table(catalog, schema, &name, credentials, false)
                    .map(|loaded| loaded.into_table(catalog, schema, &name))
            })
            .collect()
    }
}

/// Map a failed response, keeping the reason when its body could not be read
fn status_error<E: fmt::Display>(
    status: StatusCode,
    body: Result<String, E>,
    context: &str,
) -> CatalogError {
    match body {
        Ok(body) => map_status(status, &body, context),
        Err(e) => map_status(
            status,
            "",
            &format!("{} (error body unreadable: {})", context, e),
        ),
    }
}

/// Map a non-success HTTP status onto the catalog error taxonomy
pub(crate) fn map_status(status: StatusCode, body: &str, context: &str) -> CatalogError {
    let (message, kind) = error_message(body);
    let detail = if message.is_empty() {
        format!("{} (HTTP {})", context, status.as_u16())
    } else {
        format!("{}: {}", context, message)
    };
    match status {
        StatusCode::UNAUTHORIZED => CatalogError::AuthenticationFailed(detail),
        StatusCode::FORBIDDEN => CatalogError::NotAuthorized(detail),
        StatusCode::NOT_FOUND => CatalogError::EntryNotFound(detail),
        StatusCode::CONFLICT if kind.contains("NotEmpty") => CatalogError::SchemaNotEmpty(detail),
        StatusCode::CONFLICT => CatalogError::DuplicateEntry(detail),
        _ => CatalogError::RemoteServiceError(format!("{} (HTTP {})", detail, status.as_u16())),
    }
}

impl CatalogApi for HttpCatalogApi {
    fn get_token(&self, client_id: &str, client_secret: &str, endpoint: &str) -> CatalogResult<String> {
        let endpoint = super::credentials::normalize_endpoint(endpoint);
        let url = Self::url(&endpoint, &["api", "catalog", "v1", "oauth", "tokens"])
            .map_err(|e| CatalogError::AuthenticationFailed(e.to_string()))?;
        log::debug!("Requesting bearer token from {}", url);

        let request = self.client.post(url).form(&[
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("scope", self.token_scope.as_str()),
        ]);
        let context = "Token exchange";
        let token = Self::send(request, context)
            .and_then(|response| Self::json::<TokenResponse>(response, context))
            .map_err(|e| match e {
                CatalogError::AuthenticationFailed(msg) => CatalogError::AuthenticationFailed(msg),
                other => CatalogError::AuthenticationFailed(other.to_string()),
            })?;

        if token.access_token.is_empty() {
            return Err(CatalogError::AuthenticationFailed(
                "Token exchange returned an empty token".to_string(),
            ));
        }
        Ok(token.access_token)
    }

    fn list_catalogs(&self, catalog: &str, credentials: &Credentials) -> CatalogResult<Vec<String>> {
        log::debug!("Listing catalogs visible while resolving '{}'", catalog);
        let context = "Listing catalogs";
        let url = Self::url(&credentials.endpoint, &["api", "management", "v1", "catalogs"])?;
        let response = Self::send(self.get(url, credentials), context)?;
        let catalogs: CatalogsResponse = Self::json(response, context)?;
        Ok(catalogs.catalogs.into_iter().map(|c| c.name).collect())
    }

    fn list_schemas(&self, catalog: &str, credentials: &Credentials) -> CatalogResult<Vec<ApiSchema>> {
        let schemas = self
            .list_namespaces(catalog, credentials)?
            .into_iter()
            .map(|name| ApiSchema::new(name, catalog))
            .collect();
        Ok(schemas)
    }

    fn list_tables(
        &self,
        catalog: &str,
        schema: Option<&str>,
        credentials: &Credentials,
    ) -> CatalogResult<Vec<ApiTable>> {
        match schema {
            Some(schema) => self.tables_in_schema(catalog, schema, credentials),
            None => {
                let mut tables = Vec::new();
                for schema in self.list_namespaces(catalog, credentials)? {
                    tables.extend(self.tables_in_schema(catalog, &schema, credentials)?);
                }
                Ok(tables)
            }
        }
    }

    fn get_table_credentials(
        &self,
        catalog: &str,
        schema: &str,
        table: &str,
        credentials: &Credentials,
    ) -> CatalogResult<TableCredentials> {
        let loaded = self.load_table(catalog, schema, table, credentials, true)?;
        loaded.credentials().ok_or_else(|| {
            CatalogError::NotAuthorized(format!(
                "No storage credentials were vended for table '{}.{}.{}'",
                catalog, schema, table
            ))
        })
    }

    fn stage_create_table(
        &self,
        catalog: &str,
        schema: &str,
        table: &ApiTableCreate,
        credentials: &Credentials,
    ) -> CatalogResult<StagedTable> {
        let context = format!("Staging table '{}.{}.{}'", catalog, schema, table.name);
        let namespace = namespace_segment(schema);
        let url = Self::catalog_url(credentials, catalog, &["namespaces", &namespace, "tables"])?;
        let request = self
            .client
            .post(url)
            .bearer_auth(&credentials.token)
            .header(ACCESS_DELEGATION_HEADER, self.access_delegation.as_str())
            .json(&CreateTableRequest::staged(table));

        let response = Self::send(request, &context)?;
        let loaded: LoadTableResponse = Self::json(response, &context)?;
        let vended = loaded.credentials().ok_or_else(|| {
            CatalogError::NotAuthorized(format!(
                "No storage credentials were vended for staged table '{}.{}.{}'",
                catalog, schema, table.name
            ))
        })?;
        Ok(StagedTable {
            table: loaded.into_table(catalog, schema, &table.name),
            credentials: vended,
        })
    }

    fn create_schema(
        &self,
        catalog: &str,
        schema: &str,
        credentials: &Credentials,
    ) -> CatalogResult<ApiSchema> {
        let context = format!("Creating schema '{}.{}'", catalog, schema);
        let url = Self::catalog_url(credentials, catalog, &["namespaces"])?;
        let body = CreateNamespaceRequest {
            namespace: schema.split('.').map(str::to_string).collect(),
        };
        let request = self
            .client
            .post(url)
            .bearer_auth(&credentials.token)
            .json(&body);
        let response = Self::send(request, &context)?;
        let created: CreateNamespaceResponse = Self::json(response, &context)?;
        Ok(ApiSchema::new(namespace_name(&created.namespace), catalog))
    }

    fn drop_schema(&self, catalog: &str, schema: &str, credentials: &Credentials) -> CatalogResult<()> {
        let context = format!("Dropping schema '{}.{}'", catalog, schema);
        let namespace = namespace_segment(schema);
        let url = Self::catalog_url(credentials, catalog, &["namespaces", &namespace])?;
        let request = self.client.delete(url).bearer_auth(&credentials.token);
        Self::send(request, &context).map_err(|e| match e {
            // The only conflict a namespace delete reports is a non-empty namespace
            CatalogError::DuplicateEntry(msg) => CatalogError::SchemaNotEmpty(msg),
            other => other,
        })?;
        Ok(())
    }
}
