//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Primary-key CRUD with full-record upsert on `update`
//! - SKU lookup (unique business key)
//!
//! ## Write-Time Invariants
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  sku uniqueness   → UNIQUE index, surfaced as DuplicateKey          │
//! │  quantity >= 0    → CHECK constraint + validation before the write  │
//! │  price >= 0       → CHECK constraint + validation before the write  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use stockroom_core::validation::validate_product;
use stockroom_core::Product;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = store.products();
///
/// let product = repo.add(&product).await?;
/// let found = repo.get(&product.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Adds a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - the record, persisted unchanged
    /// * `Err(StoreError::DuplicateKey)` - id or SKU already exists; the
    ///   store is left untouched
    pub async fn add(&self, product: &Product) -> StoreResult<Product> {
        validate_product(product)?;

        debug!(sku = %product.sku, "Adding product");

        sqlx::query(
            r#"
            INSERT INTO products (id, sku, name, description, quantity, price_cents, image_ref)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.quantity)
        .bind(product.price_cents)
        .bind(&product.image_ref)
        .execute(&self.pool)
        .await
        .map_err(|e| match StoreError::from(e) {
            // Fill in the colliding value, which sqlite's message lacks.
            StoreError::DuplicateKey { field, .. } => {
                let value = if field.ends_with("sku") {
                    product.sku.clone()
                } else {
                    product.id.clone()
                };
                StoreError::duplicate(field, value)
            }
            other => other,
        })?;

        Ok(product.clone())
    }

    /// Gets a product by its id. A miss is `Ok(None)`, not an error.
    pub async fn get(&self, id: &str) -> StoreResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, sku, name, description, quantity, price_cents, image_ref
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its SKU (e.g., "A1").
    pub async fn get_by_sku(&self, sku: &str) -> StoreResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, sku, name, description, quantity, price_cents, image_ref
            FROM products
            WHERE sku = ?1
            "#,
        )
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists all products. No ordering guarantee; callers sort as needed.
    pub async fn list(&self) -> StoreResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, sku, name, description, quantity, price_cents, image_ref
            FROM products
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Full-record replace keyed by id, with upsert semantics: a record with
    /// an unknown id is created.
    pub async fn update(&self, product: &Product) -> StoreResult<Product> {
        validate_product(product)?;

        debug!(id = %product.id, "Upserting product");

        sqlx::query(
            r#"
            INSERT INTO products (id, sku, name, description, quantity, price_cents, image_ref)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                sku = excluded.sku,
                name = excluded.name,
                description = excluded.description,
                quantity = excluded.quantity,
                price_cents = excluded.price_cents,
                image_ref = excluded.image_ref
            "#,
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.quantity)
        .bind(product.price_cents)
        .bind(&product.image_ref)
        .execute(&self.pool)
        .await
        .map_err(|e| match StoreError::from(e) {
            // The upsert can still trip the sku UNIQUE index against
            // another row.
            StoreError::DuplicateKey { field, .. } => {
                StoreError::duplicate(field, product.sku.clone())
            }
            other => other,
        })?;

        Ok(product.clone())
    }

    /// Deletes a product unconditionally.
    ///
    /// Referential integrity is NOT checked here - compose
    /// [`crate::guard::IntegrityGuard`] before calling.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
