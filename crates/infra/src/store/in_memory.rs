use std::sync::RwLock;

use async_trait::async_trait;

use catalog_core::Entity;
use catalog_products::{NewProduct, Product, ProductId, ProductPatch};

use super::{ProductStore, StoreError};

/// In-memory product store for tests/dev.
///
/// Documents are kept in insertion order, which is the listing order.
#[derive(Debug)]
pub struct InMemoryProductStore {
    inner: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::backend("in-memory product store lock poisoned")
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn create(&self, product: NewProduct) -> Result<Product, StoreError> {
        let stored = Product::new(ProductId::generate(), product);
        let mut docs = self.inner.write().map_err(|_| poisoned())?;
        docs.push(stored.clone());
        Ok(stored)
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let docs = self.inner.read().map_err(|_| poisoned())?;
        Ok(docs.clone())
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let docs = self.inner.read().map_err(|_| poisoned())?;
        Ok(docs.iter().find(|p| p.id() == id).cloned())
    }

    async fn update_by_id(&self, id: &ProductId, patch: ProductPatch) -> Result<Option<Product>, StoreError> {
        let mut docs = self.inner.write().map_err(|_| poisoned())?;
        Ok(docs.iter_mut().find(|p| p.id() == id).map(|product| {
            product.apply_patch(patch);
            product.clone()
        }))
    }

    async fn delete_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let mut docs = self.inner.write().map_err(|_| poisoned())?;
        let index = docs.iter().position(|p| p.id() == id);
        Ok(index.map(|i| docs.remove(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Number;

    fn new_product(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price: Number::from(10),
            category: "Test Category".to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_find_round_trips_fields() {
        let store = InMemoryProductStore::new();
        let created = store.create(new_product("Test Product")).await.unwrap();

        let found = store.find_by_id(&created.id_typed()).await.unwrap().unwrap();
        assert_eq!(found.name(), "Test Product");
        assert_eq!(found.price(), &Number::from(10));
        assert_eq!(found.category(), "Test Category");
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn find_all_lists_in_creation_order() {
        let store = InMemoryProductStore::new();
        for name in ["first", "second", "third"] {
            store.create(new_product(name)).await.unwrap();
        }

        let names: Vec<String> = store
            .find_all()
            .await
            .unwrap()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn update_replaces_supplied_fields_and_returns_document() {
        let store = InMemoryProductStore::new();
        let created = store.create(new_product("Test Product")).await.unwrap();

        let patch = ProductPatch {
            category: Some("Books".to_string()),
            ..Default::default()
        };
        let updated = store.update_by_id(&created.id_typed(), patch).await.unwrap().unwrap();

        assert_eq!(updated.id_typed(), created.id_typed());
        assert_eq!(updated.name(), "Test Product");
        assert_eq!(updated.category(), "Books");
        assert_eq!(store.find_by_id(&created.id_typed()).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn missing_ids_yield_none() {
        let store = InMemoryProductStore::new();
        let id = ProductId::parse("5f7777777777777777777777").unwrap();

        assert!(store.find_by_id(&id).await.unwrap().is_none());
        assert!(store.update_by_id(&id, ProductPatch::default()).await.unwrap().is_none());
        assert!(store.delete_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_once() {
        let store = InMemoryProductStore::new();
        let created = store.create(new_product("Test Product")).await.unwrap();

        let deleted = store.delete_by_id(&created.id_typed()).await.unwrap();
        assert_eq!(deleted, Some(created.clone()));
        assert!(store.delete_by_id(&created.id_typed()).await.unwrap().is_none());
        assert!(store.is_empty());
    }
}
