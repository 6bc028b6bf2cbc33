//! In-memory stand-in for the remote catalog service

use parking_lot::Mutex;
use polaris::api::{
    ApiColumnDefinition, ApiSchema, ApiTable, ApiTableCreate, CatalogApi, Credentials, StagedTable,
    TableCredentials,
};
use polaris::{CatalogError, CatalogResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

#[derive(Default)]
struct MockState {
    catalogs: Vec<String>,
    /// Schemas in listing order
    schemas: Vec<String>,
    tables: HashMap<String, Vec<ApiTable>>,
    failing_listings: usize,
    reject_tokens: bool,
    supports_create: bool,
    last_token: Option<String>,
    delay: Option<Duration>,
}

/// Catalog service double counting every call it receives
pub struct MockCatalogApi {
    state: Mutex<MockState>,
    pub token_calls: AtomicUsize,
    pub catalog_calls: AtomicUsize,
    pub schema_calls: AtomicUsize,
    pub table_calls: AtomicUsize,
    pub credential_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub stage_calls: AtomicUsize,
    pub drop_calls: AtomicUsize,
}

impl MockCatalogApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                catalogs: vec!["main".to_string()],
                supports_create: true,
                ..Default::default()
            }),
            token_calls: AtomicUsize::new(0),
            catalog_calls: AtomicUsize::new(0),
            schema_calls: AtomicUsize::new(0),
            table_calls: AtomicUsize::new(0),
            credential_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            stage_calls: AtomicUsize::new(0),
            drop_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_schema(self, schema: &str) -> Self {
        {
            let mut state = self.state.lock();
            state.schemas.push(schema.to_string());
            state.tables.entry(schema.to_string()).or_default();
        }
        self
    }

    pub fn with_table(self, schema: &str, table: &str) -> Self {
        {
            let mut state = self.state.lock();
            if !state.schemas.iter().any(|s| s == schema) {
                state.schemas.push(schema.to_string());
            }
            let tables = state.tables.entry(schema.to_string()).or_default();
            tables.push(api_table("main", schema, table));
        }
        self
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        self.state.lock().delay = Some(delay);
        self
    }

    pub fn without_schema_creation(self) -> Self {
        self.state.lock().supports_create = false;
        self
    }

    /// Make the next `n` listing calls fail with a remote error
    pub fn fail_next_listings(&self, n: usize) {
        self.state.lock().failing_listings = n;
    }

    pub fn reject_tokens(&self) {
        self.state.lock().reject_tokens = true;
    }

    pub fn add_table(&self, schema: &str, table: &str) {
        let mut state = self.state.lock();
        state
            .tables
            .entry(schema.to_string())
            .or_default()
            .push(api_table("main", schema, table));
    }

    /// Token carried by the most recent metadata or vending call
    pub fn last_token(&self) -> Option<String> {
        self.state.lock().last_token.clone()
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn enter_listing(&self, credentials: &Credentials) -> CatalogResult<Option<Duration>> {
        let mut state = self.state.lock();
        state.last_token = Some(credentials.token.clone());
        if state.failing_listings > 0 {
            state.failing_listings -= 1;
            return Err(CatalogError::RemoteServiceError(
                "Listing: service unavailable (HTTP 503)".to_string(),
            ));
        }
        Ok(state.delay)
    }
}

pub fn api_table(catalog: &str, schema: &str, table: &str) -> ApiTable {
    ApiTable {
        table_id: format!("{}-{}-id", schema, table),
        name: table.to_string(),
        catalog_name: catalog.to_string(),
        schema_name: schema.to_string(),
        table_type: "MANAGED".to_string(),
        data_source_format: "ICEBERG_V2".to_string(),
        storage_location: format!("s3://warehouse/{}/{}", schema, table),
        columns: vec![
            ApiColumnDefinition {
                name: "id".to_string(),
                type_text: "long".to_string(),
                precision: 0,
                scale: 0,
                position: 0,
            },
            ApiColumnDefinition {
                name: "amount".to_string(),
                type_text: "decimal(10,2)".to_string(),
                precision: 10,
                scale: 2,
                position: 1,
            },
        ],
    }
}

impl CatalogApi for MockCatalogApi {
    fn get_token(&self, client_id: &str, client_secret: &str, endpoint: &str) -> CatalogResult<String> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.lock().reject_tokens || client_secret.is_empty() || endpoint.is_empty() {
            return Err(CatalogError::AuthenticationFailed(
                "invalid_client: bad client credentials".to_string(),
            ));
        }
        Ok(format!("token-{}", client_id))
    }

    fn list_catalogs(&self, _catalog: &str, credentials: &Credentials) -> CatalogResult<Vec<String>> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock();
        state.last_token = Some(credentials.token.clone());
        Ok(state.catalogs.clone())
    }

    fn list_schemas(&self, catalog: &str, credentials: &Credentials) -> CatalogResult<Vec<ApiSchema>> {
        self.schema_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.enter_listing(credentials)? {
            thread::sleep(delay);
        }
        let state = self.state.lock();
        Ok(state
            .schemas
            .iter()
            .map(|s| ApiSchema::new(s.clone(), catalog))
            .collect())
    }

    fn list_tables(
        &self,
        _catalog: &str,
        schema: Option<&str>,
        credentials: &Credentials,
    ) -> CatalogResult<Vec<ApiTable>> {
        self.table_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.enter_listing(credentials)? {
            thread::sleep(delay);
        }
        let state = self.state.lock();
        Ok(match schema {
            Some(schema) => state.tables.get(schema).cloned().unwrap_or_default(),
            None => state.tables.values().flatten().cloned().collect(),
        })
    }

    fn get_table_credentials(
        &self,
        _catalog: &str,
        schema: &str,
        table: &str,
        credentials: &Credentials,
    ) -> CatalogResult<TableCredentials> {
        let n = self.credential_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state.lock();
        state.last_token = Some(credentials.token.clone());
        if credentials.token.is_empty() {
            return Err(CatalogError::NotAuthorized(format!(
                "No token to vend credentials for {}.{}",
                schema, table
            )));
        }
        Ok(TableCredentials {
            key_id: format!("key-{}", n),
            secret: format!("secret-{}", n),
            session_token: format!("session-{}", n),
        })
    }

    fn stage_create_table(
        &self,
        catalog: &str,
        schema: &str,
        table: &ApiTableCreate,
        credentials: &Credentials,
    ) -> CatalogResult<StagedTable> {
        let n = self.stage_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state.lock();
        state.last_token = Some(credentials.token.clone());
        if credentials.token.is_empty() {
            return Err(CatalogError::NotAuthorized(format!(
                "No token to stage {}.{}",
                schema, table.name
            )));
        }
        let tables = state.tables.get(schema).ok_or_else(|| {
            CatalogError::EntryNotFound(format!("Namespace does not exist: {}", schema))
        })?;
        if tables.iter().any(|t| t.name.eq_ignore_ascii_case(&table.name)) {
            return Err(CatalogError::DuplicateEntry(format!(
                "Table already exists: {}.{}",
                schema, table.name
            )));
        }

        let location = if table.storage_location.is_empty() {
            format!("s3://warehouse/{}/{}", schema, table.name)
        } else {
            table.storage_location.clone()
        };
        // Staged tables stay out of listings until committed
        Ok(StagedTable {
            table: ApiTable {
                table_id: format!("{}-{}-staged", schema, table.name),
                name: table.name.clone(),
                catalog_name: catalog.to_string(),
                schema_name: schema.to_string(),
                table_type: "MANAGED".to_string(),
                data_source_format: "ICEBERG_V2".to_string(),
                storage_location: location,
                columns: table.columns.clone(),
            },
            credentials: TableCredentials {
                key_id: format!("staged-key-{}", n),
                secret: format!("staged-secret-{}", n),
                session_token: format!("staged-session-{}", n),
            },
        })
    }

    fn create_schema(&self, catalog: &str, schema: &str, _credentials: &Credentials) -> CatalogResult<ApiSchema> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock();
        if !state.supports_create {
            return Err(CatalogError::NotSupported("schema creation disabled".to_string()));
        }
        if state.schemas.iter().any(|s| s.eq_ignore_ascii_case(schema)) {
            return Err(CatalogError::DuplicateEntry(format!(
                "Creating: Namespace already exists: {} (HTTP 409)",
                schema
            )));
        }
        state.schemas.push(schema.to_string());
        state.tables.entry(schema.to_string()).or_default();
        Ok(ApiSchema::new(schema, catalog))
    }

    fn drop_schema(&self, _catalog: &str, schema: &str, _credentials: &Credentials) -> CatalogResult<()> {
        self.drop_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock();
        let position = state
            .schemas
            .iter()
            .position(|s| s.eq_ignore_ascii_case(schema))
            .ok_or_else(|| {
                CatalogError::EntryNotFound(format!("Namespace does not exist: {}", schema))
            })?;
        let name = state.schemas[position].clone();
        if state.tables.get(&name).map(|t| !t.is_empty()).unwrap_or(false) {
            return Err(CatalogError::SchemaNotEmpty(format!(
                "Namespace {} is not empty",
                name
            )));
        }
        state.schemas.remove(position);
        state.tables.remove(&name);
        Ok(())
    }
}
