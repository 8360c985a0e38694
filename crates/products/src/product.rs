use serde::{Deserialize, Serialize};
use serde_json::Number;

use catalog_core::{DocumentId, DomainError, Entity};

/// Product identifier, assigned by the store at creation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub DocumentId);

impl ProductId {
    pub fn new(id: DocumentId) -> Self {
        Self(id)
    }

    pub fn generate() -> Self {
        Self(DocumentId::generate())
    }

    /// Parse a raw path segment. The error detail echoes the raw input.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        DocumentId::parse(raw)
            .map(Self)
            .map_err(|_| DomainError::invalid_id(format!("Product Id = {raw} is invalid !")))
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A stored product document.
///
/// Serialized with the store's `_id` key so clients see the same shape the
/// document store holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    id: ProductId,
    name: String,
    price: Number,
    category: String,
}

impl Product {
    pub fn new(id: ProductId, fields: NewProduct) -> Self {
        Self {
            id,
            name: fields.name,
            price: fields.price,
            category: fields.category,
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> &Number {
        &self.price
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Replace every field the patch supplies; absent fields are left alone.
    pub fn apply_patch(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Fields of a product about to be created. Every field is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Number,
    pub category: String,
}

/// Fields supplied to an update. Only present fields are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Product {
        Product::new(
            ProductId::parse("5f7777777777777777777777").unwrap(),
            NewProduct {
                name: "Test Product".to_string(),
                price: Number::from(10),
                category: "Test Category".to_string(),
            },
        )
    }

    #[test]
    fn serializes_with_store_id_key() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "_id": "5f7777777777777777777777",
                "name": "Test Product",
                "price": 10,
                "category": "Test Category",
            })
        );
    }

    #[test]
    fn parse_error_echoes_the_raw_id() {
        let err = ProductId::parse("5f77777777777777777777k").unwrap_err();
        assert_eq!(err.to_string(), "Product Id = 5f77777777777777777777k is invalid !");
    }

    #[test]
    fn patch_replaces_only_supplied_fields() {
        let mut product = sample();
        product.apply_patch(ProductPatch {
            name: Some("Updated Product".to_string()),
            ..Default::default()
        });

        assert_eq!(product.name(), "Updated Product");
        assert_eq!(product.price(), &Number::from(10));
        assert_eq!(product.category(), "Test Category");
        assert_eq!(product.id().to_string(), "5f7777777777777777777777");
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = ProductPatch {
            price: Some(Number::from(12)),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "price": 12 }));
        assert_eq!(serde_json::to_value(ProductPatch::default()).unwrap(), json!({}));
    }
}
