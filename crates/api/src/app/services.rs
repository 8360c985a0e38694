//! Infrastructure wiring for the HTTP layer.

use std::sync::Arc;

use anyhow::Context;

use catalog_infra::{AppConfig, InMemoryProductStore, PostgresProductStore, ProductStore};

/// Collaborators shared by every request.
#[derive(Clone)]
pub struct AppServices {
    products: Arc<dyn ProductStore>,
}

impl AppServices {
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryProductStore::new()))
    }

    pub fn products(&self) -> &Arc<dyn ProductStore> {
        &self.products
    }
}

/// Pick the product store from configuration: Postgres when `DATABASE_URL`
/// is set, in-memory otherwise.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match &config.database_url {
        Some(url) => {
            let store = PostgresProductStore::connect(url)
                .await
                .context("failed to connect to Postgres")?;
            tracing::info!("using Postgres product store");
            Ok(AppServices::new(Arc::new(store)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory product store");
            Ok(AppServices::in_memory())
        }
    }
}
