//! Catalog façade operations: schema DDL, not-found policies, plan
//! construction with vended credentials and the host-facing properties

#[path = "testutils/mod.rs"]
mod testutils;

use polaris::{
    AccessMode, AttachInfo, CatalogEntry, CatalogError, ColumnDefinition, CreateIndexInfo,
    CreateSchemaInfo, CreateTableInfo, DataAccessKind, DropInfo, OnEntryNotFound,
};
use std::sync::Arc;
use testutils::fixtures::{attach, extension, sales_api, ENDPOINT};
use testutils::mock_api::MockCatalogApi;

#[test]
fn test_attach_with_client_credentials_then_scan() {
    let api = Arc::new(MockCatalogApi::new().with_schema("sales"));
    let ext = extension(&api);

    let info = AttachInfo::new("lake", "main")
        .option("endpoint", ENDPOINT)
        .option("client_id", "a")
        .option("client_secret", "b");
    let catalog = ext.attach(&info, AccessMode::ReadWrite).unwrap();
    assert_eq!(MockCatalogApi::calls(&api.token_calls), 1);
    assert_eq!(catalog.credentials().token, "token-a");

    let mut schemas = Vec::new();
    catalog
        .scan_schemas(|s| schemas.push((s.name().to_string(), s.catalog_name().to_string())))
        .unwrap();
    assert_eq!(schemas, vec![("sales".to_string(), "main".to_string())]);
    assert_eq!(api.last_token().as_deref(), Some("token-a"));
}

#[test]
fn test_attach_fails_when_token_exchange_fails() {
    let api = Arc::new(MockCatalogApi::new().with_schema("sales"));
    api.reject_tokens();
    let ext = extension(&api);

    let info = AttachInfo::new("lake", "main")
        .option("endpoint", ENDPOINT)
        .option("client_id", "a")
        .option("client_secret", "b");
    let err = ext.attach(&info, AccessMode::ReadWrite).unwrap_err();
    assert!(matches!(err, CatalogError::AuthenticationFailed(_)));
    assert!(ext.registry().get("lake").is_none());
}

#[test]
fn test_get_schema_not_found_policy() {
    let api = sales_api();
    let ext = extension(&api);
    let catalog = attach(&ext, "lake", AccessMode::ReadWrite);

    assert!(catalog
        .get_schema("missing", OnEntryNotFound::ReturnNull)
        .unwrap()
        .is_none());
    let err = catalog
        .get_schema("missing", OnEntryNotFound::ThrowException)
        .unwrap_err();
    assert!(matches!(err, CatalogError::EntryNotFound(_)));

    assert!(catalog
        .get_table("sales", "missing", OnEntryNotFound::ReturnNull)
        .unwrap()
        .is_none());
    assert!(catalog
        .get_table("missing", "orders", OnEntryNotFound::ReturnNull)
        .unwrap()
        .is_none());
    let err = catalog
        .get_table("sales", "missing", OnEntryNotFound::ThrowException)
        .unwrap_err();
    assert!(matches!(err, CatalogError::EntryNotFound(_)));
}

#[test]
fn test_drop_non_empty_schema_keeps_cache_entry() {
    let api = sales_api();
    let ext = extension(&api);
    let catalog = attach(&ext, "lake", AccessMode::ReadWrite);

    let err = catalog.drop_schema(&DropInfo::new("sales")).unwrap_err();
    assert!(matches!(err, CatalogError::SchemaNotEmpty(_)));
    assert_eq!(MockCatalogApi::calls(&api.drop_calls), 1);

    assert!(catalog
        .get_schema("sales", OnEntryNotFound::ThrowException)
        .unwrap()
        .is_some());
}

#[test]
fn test_drop_schema() {
    let api = sales_api();
    let ext = extension(&api);
    let catalog = attach(&ext, "lake", AccessMode::ReadWrite);

    catalog.drop_schema(&DropInfo::new("HR")).unwrap();
    assert!(catalog
        .get_schema("hr", OnEntryNotFound::ReturnNull)
        .unwrap()
        .is_none());

    let err = catalog.drop_schema(&DropInfo::new("hr")).unwrap_err();
    assert!(matches!(err, CatalogError::EntryNotFound(_)));

    catalog.drop_schema(&DropInfo::new("hr").if_exists()).unwrap();
    assert_eq!(MockCatalogApi::calls(&api.drop_calls), 1);
}

#[test]
fn test_create_schema_if_not_exists_returns_cached_entry() {
    let api = sales_api();
    let ext = extension(&api);
    let catalog = attach(&ext, "lake", AccessMode::ReadWrite);

    let schema = catalog
        .create_schema(&CreateSchemaInfo::new("SALES").if_not_exists())
        .unwrap();
    assert_eq!(schema.name(), "sales");
    assert_eq!(MockCatalogApi::calls(&api.create_calls), 0);
}

#[test]
fn test_failed_remote_create_leaves_cache_unchanged() {
    let api = Arc::new(MockCatalogApi::new().with_schema("sales").without_schema_creation());
    let ext = extension(&api);
    let catalog = attach(&ext, "lake", AccessMode::ReadWrite);

    let err = catalog
        .create_schema(&CreateSchemaInfo::new("staging"))
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotSupported(_)));
    assert!(catalog
        .get_schema("staging", OnEntryNotFound::ReturnNull)
        .unwrap()
        .is_none());
}

#[test]
fn test_read_only_attachment_rejects_writes() {
    let api = sales_api();
    let ext = extension(&api);
    let catalog = attach(&ext, "lake", AccessMode::ReadOnly);

    let err = catalog.create_schema(&CreateSchemaInfo::new("x")).unwrap_err();
    assert!(matches!(err, CatalogError::ReadOnly(_)));
    let err = catalog.drop_schema(&DropInfo::new("hr")).unwrap_err();
    assert!(matches!(err, CatalogError::ReadOnly(_)));

    let table = catalog
        .get_table("sales", "orders", OnEntryNotFound::ThrowException)
        .unwrap()
        .unwrap();
    let err = catalog.plan_insert(&table, ()).unwrap_err();
    assert!(matches!(err, CatalogError::ReadOnly(_)));

    // Reads still vend credentials
    let plan = catalog.plan_scan(&table, ()).unwrap();
    assert_eq!(plan.kind, DataAccessKind::Scan);
    assert_eq!(MockCatalogApi::calls(&api.credential_calls), 1);
}

#[test]
fn test_each_plan_vends_fresh_credentials() {
    let api = sales_api();
    let ext = extension(&api);
    let catalog = attach(&ext, "lake", AccessMode::ReadWrite);

    let table = catalog
        .get_table("sales", "orders", OnEntryNotFound::ThrowException)
        .unwrap()
        .unwrap();
    let schema_calls = MockCatalogApi::calls(&api.schema_calls);
    let table_calls = MockCatalogApi::calls(&api.table_calls);

    let first = catalog.plan_insert(&table, "insert-op").unwrap();
    let second = catalog.plan_insert(&table, "insert-op").unwrap();

    assert_eq!(MockCatalogApi::calls(&api.credential_calls), 2);
    assert_ne!(first.storage.credentials, second.storage.credentials);
    assert_eq!(first.storage.credentials.key_id, "key-1");
    assert_eq!(second.storage.credentials.key_id, "key-2");
    assert_eq!(first.storage.region, "us-east-1");
    assert_eq!(first.storage.location, "s3://warehouse/sales/orders");
    assert_eq!(first.table.to_string(), "main.sales.orders");
    assert_eq!(first.input, "insert-op");

    // The caches were neither reloaded nor changed
    assert_eq!(MockCatalogApi::calls(&api.schema_calls), schema_calls);
    assert_eq!(MockCatalogApi::calls(&api.table_calls), table_calls);
    let cached = catalog
        .get_table("sales", "orders", OnEntryNotFound::ThrowException)
        .unwrap()
        .unwrap();
    assert_eq!(*cached, *table);
}

#[test]
fn test_delete_and_update_plans() {
    let api = sales_api();
    let ext = extension(&api);
    let catalog = attach(&ext, "lake", AccessMode::ReadWrite);
    let table = catalog
        .get_table("sales", "customers", OnEntryNotFound::ThrowException)
        .unwrap()
        .unwrap();

    let delete = catalog.plan_delete(&table, 1u8).unwrap();
    let update = catalog.plan_update(&table, 2u8).unwrap();
    assert_eq!(delete.kind, DataAccessKind::Delete);
    assert_eq!(update.kind, DataAccessKind::Update);
    assert_eq!(update.map_input(|n| n * 10).into_input(), 20);
}

#[test]
fn test_create_table_as_registers_table() {
    let api = sales_api();
    let ext = extension(&api);
    let catalog = attach(&ext, "lake", AccessMode::ReadWrite);

    let info = CreateTableInfo::new("sales", "summary")
        .with_columns(vec![ColumnDefinition::new("total", "double", 0)]);
    let plan = catalog.plan_create_table_as(&info, "ctas-op").unwrap();
    assert_eq!(plan.kind, DataAccessKind::CreateTableAs);
    assert_eq!(plan.storage.credentials.key_id, "staged-key-1");
    assert_eq!(plan.storage.location, "s3://warehouse/sales/summary");
    assert_eq!(plan.table.to_string(), "main.sales.summary");
    assert_eq!(MockCatalogApi::calls(&api.stage_calls), 1);

    let table = catalog
        .get_table("sales", "SUMMARY", OnEntryNotFound::ThrowException)
        .unwrap()
        .unwrap();
    assert_eq!(table.parent().schema.as_deref(), Some("sales"));
    assert_eq!(table.columns[0].name, "total");

    let err = catalog.plan_create_table_as(&info, "ctas-op").unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateEntry(_)));
    let err = catalog
        .plan_create_table_as(&CreateTableInfo::new("sales", "Orders"), ())
        .unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateEntry(_)));
    assert_eq!(MockCatalogApi::calls(&api.stage_calls), 1);
    assert_eq!(MockCatalogApi::calls(&api.credential_calls), 0);
}

#[test]
fn test_create_index_not_supported() {
    let api = sales_api();
    let ext = extension(&api);
    let catalog = attach(&ext, "lake", AccessMode::ReadWrite);

    let info = CreateIndexInfo {
        index_name: "idx_orders_id".to_string(),
        schema: "sales".to_string(),
        table: "orders".to_string(),
        columns: vec!["id".to_string()],
    };
    let err = catalog.bind_create_index(&info, ()).unwrap_err();
    assert!(matches!(err, CatalogError::NotSupported(_)));
}

#[test]
fn test_host_facing_properties() {
    let api = sales_api();
    let ext = extension(&api);
    let catalog = attach(&ext, "lake", AccessMode::ReadWrite);

    assert_eq!(catalog.catalog_type(), "polaris");
    assert!(!catalog.in_memory());
    assert_eq!(catalog.db_path(), "main");
    assert_eq!(catalog.name(), "lake");
    assert!(catalog.get_database_size().is_unknown());
    assert_eq!(catalog.credentials().endpoint, ENDPOINT);

    catalog.verify_remote_catalog().unwrap();
    assert_eq!(MockCatalogApi::calls(&api.catalog_calls), 1);
}

#[test]
fn test_verify_unknown_remote_catalog() {
    let api = sales_api();
    let ext = extension(&api);
    let info = testutils::fixtures::token_attach("other");
    let info = polaris::AttachInfo { path: "warehouse".to_string(), ..info };
    let catalog = ext.attach(&info, AccessMode::ReadWrite).unwrap();

    let err = catalog.verify_remote_catalog().unwrap_err();
    assert!(matches!(err, CatalogError::EntryNotFound(_)));
}

#[test]
fn test_scan_tables() {
    let api = sales_api();
    let ext = extension(&api);
    let catalog = attach(&ext, "lake", AccessMode::ReadWrite);

    let mut tables = Vec::new();
    catalog
        .scan_tables("sales", |t| tables.push(t.name.clone()))
        .unwrap();
    tables.sort();
    assert_eq!(tables, vec!["customers", "orders"]);

    let err = catalog.scan_tables("missing", |_| {}).unwrap_err();
    assert!(matches!(err, CatalogError::EntryNotFound(_)));
}
