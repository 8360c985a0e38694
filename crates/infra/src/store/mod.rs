//! Product persistence.
//!
//! Handlers only see [`ProductStore`]; which backend sits behind it is decided
//! at startup (`DATABASE_URL` set or not).

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use catalog_core::DomainError;
use catalog_products::{NewProduct, Product, ProductId, ProductPatch};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;

/// Storage operation error.
///
/// These are **infrastructure errors**; the HTTP layer does not distinguish
/// between variants and surfaces the `Display` text as-is.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Free-form backend failure.
    #[error("{0}")]
    Backend(String),

    #[error("database error in {operation}: {message}")]
    Database { operation: &'static str, message: String },

    #[error("failed to decode product document: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        DomainError::storage(err.to_string())
    }
}

/// Document store for products.
///
/// Lookups by id return `Ok(None)` when no document matches; `Err` is reserved
/// for backend failures. Implementations own their concurrency safety.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Insert a new document and return it with its assigned id.
    async fn create(&self, product: NewProduct) -> Result<Product, StoreError>;

    /// Every stored document, oldest first.
    async fn find_all(&self) -> Result<Vec<Product>, StoreError>;

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError>;

    /// Replace the fields present in `patch` and return the updated document.
    async fn update_by_id(&self, id: &ProductId, patch: ProductPatch) -> Result<Option<Product>, StoreError>;

    /// Remove a document and return what was removed.
    async fn delete_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn create(&self, product: NewProduct) -> Result<Product, StoreError> {
        (**self).create(product).await
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        (**self).find_all().await
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn update_by_id(&self, id: &ProductId, patch: ProductPatch) -> Result<Option<Product>, StoreError> {
        (**self).update_by_id(id, patch).await
    }

    async fn delete_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        (**self).delete_by_id(id).await
    }
}
