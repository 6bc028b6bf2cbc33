//! Extension and attachment helpers over [`MockCatalogApi`]

use super::mock_api::MockCatalogApi;
use polaris::{AccessMode, AttachInfo, PolarisCatalog, PolarisConfig, PolarisExtension};
use std::sync::Arc;

pub const ENDPOINT: &str = "https://cat.example";

/// Extension backed by `api`, memory secrets only
pub fn extension(api: &Arc<MockCatalogApi>) -> PolarisExtension {
    PolarisExtension::with_api(PolarisConfig::default(), api.clone()).expect("extension loads")
}

/// Extension with a local-file secret store under `dir`
pub fn extension_with_secret_dir(api: &Arc<MockCatalogApi>, dir: &std::path::Path) -> PolarisExtension {
    let config = PolarisConfig::default().with_secret_directory(dir);
    PolarisExtension::with_api(config, api.clone()).expect("extension loads")
}

/// ATTACH request carrying a ready token
pub fn token_attach(name: &str) -> AttachInfo {
    AttachInfo::new(name, "main")
        .option("TYPE", "polaris")
        .option("endpoint", format!("{}/", ENDPOINT))
        .option("token", "preissued")
        .option("aws_region", "us-east-1")
}

/// Attach `main` as `name` with a ready token
pub fn attach(extension: &PolarisExtension, name: &str, access_mode: AccessMode) -> Arc<PolarisCatalog> {
    extension
        .attach(&token_attach(name), access_mode)
        .expect("attach succeeds")
}

/// Mock with two schemas; `sales` holds `orders` and `customers`
pub fn sales_api() -> Arc<MockCatalogApi> {
    Arc::new(
        MockCatalogApi::new()
            .with_table("sales", "orders")
            .with_table("sales", "customers")
            .with_schema("hr"),
    )
}
