//! Postgres-backed product store.
//!
//! Products are kept as JSONB documents in a single table keyed by the
//! 24-hex document id:
//!
//! ```sql
//! CREATE TABLE products (
//!     id         CHAR(24)    PRIMARY KEY,
//!     doc        JSONB       NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! ```
//!
//! Updates merge the supplied fields into the stored document (`doc || patch`),
//! so fields absent from the patch keep their value.
//!
//! ## Error Mapping
//!
//! Every `sqlx` failure becomes `StoreError::Database` tagged with the
//! operation name; document decode failures become `StoreError::Decode`.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::types::Json;
use sqlx::Row;
use tracing::instrument;

use catalog_core::DocumentId;
use catalog_products::{NewProduct, Product, ProductId, ProductPatch};

use super::{ProductStore, StoreError};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id         CHAR(24)    PRIMARY KEY,
        doc        JSONB       NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

/// Postgres-backed document store for products.
///
/// Uses the SQLx connection pool, which is cheap to clone and safe to share.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and make sure the table exists.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip(self, product), err)]
    async fn create(&self, product: NewProduct) -> Result<Product, StoreError> {
        let id = ProductId::generate();
        let row = sqlx::query(
            r#"
            INSERT INTO products (id, doc)
            VALUES ($1, $2)
            RETURNING id, doc
            "#,
        )
        .bind(id.to_string())
        .bind(Json(&product))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create", e))?;

        product_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, doc
            FROM products
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_all", e))?;

        rows.iter().map(product_from_row).collect()
    }

    #[instrument(skip(self, id), fields(id = %id), err)]
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query("SELECT id, doc FROM products WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self, id, patch), fields(id = %id), err)]
    async fn update_by_id(&self, id: &ProductId, patch: ProductPatch) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE products
            SET doc = doc || $2
            WHERE id = $1
            RETURNING id, doc
            "#,
        )
        .bind(id.to_string())
        .bind(Json(&patch))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_by_id", e))?;

        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self, id), fields(id = %id), err)]
    async fn delete_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query("DELETE FROM products WHERE id = $1 RETURNING id, doc")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_by_id", e))?;

        row.as_ref().map(product_from_row).transpose()
    }
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    let raw_id: String = row
        .try_get("id")
        .map_err(|e| map_sqlx_error("decode_row", e))?;
    let id = DocumentId::parse(raw_id.trim())
        .map_err(|e| StoreError::backend(format!("stored product has a malformed id: {e}")))?;

    let doc: serde_json::Value = row
        .try_get("doc")
        .map_err(|e| map_sqlx_error("decode_row", e))?;
    let fields: NewProduct = serde_json::from_value(doc)?;

    Ok(Product::new(ProductId::new(id), fields))
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    let message = match err {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        sqlx::Error::PoolClosed => "connection pool closed".to_string(),
        other => other.to_string(),
    };
    StoreError::Database { operation, message }
}
