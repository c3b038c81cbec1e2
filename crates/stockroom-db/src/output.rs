//! # Output Coordinator
//!
//! The one genuinely atomic operation in the system: decrement product stock
//! and append an audit log entry as a single unit.
//!
//! ## Record-Output Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      record_output(product, person, qty)            │
//! │                                                                     │
//! │  1. validate qty > 0                          (no I/O yet)          │
//! │  2. load Product, Person snapshots            → NotFound on miss    │
//! │  3. check qty <= product.quantity             → InsufficientStock,  │
//! │                                                 state untouched     │
//! │  4. build OutputLog: fresh id, now(),                               │
//! │     product_name/person_name frozen from the snapshots              │
//! │  5. BEGIN ──► replace product (qty − Q)                             │
//! │           ──► insert log                                            │
//! │     COMMIT: the single point of observable effect                   │
//! │                                                                     │
//! │  Any failure inside the transaction rolls back: stock is never      │
//! │  decremented without a log, and no log ever exists without the      │
//! │  matching stock change.                                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use stockroom_core::validation::validate_output_quantity;
use stockroom_core::{OutputLog, Person, Product};

/// Coordinator for the atomic record-output operation spanning the
/// products and output_logs tables.
#[derive(Debug, Clone)]
pub struct OutputCoordinator {
    pool: SqlitePool,
}

impl OutputCoordinator {
    /// Creates a new OutputCoordinator.
    pub fn new(pool: SqlitePool) -> Self {
        OutputCoordinator { pool }
    }

    /// Records a stock-removal event.
    ///
    /// ## Returns
    /// * `Ok(OutputLog)` - the committed log entry
    /// * `Err(StoreError::NotFound)` - product or person is absent
    /// * `Err(StoreError::InsufficientStock)` - requested quantity exceeds
    ///   stock; nothing was touched
    /// * `Err(StoreError::TransactionAborted)` - a write or the commit
    ///   failed; the store was rolled back to its pre-transaction state
    pub async fn record_output(
        &self,
        product_id: &str,
        person_id: &str,
        quantity: i64,
    ) -> StoreResult<OutputLog> {
        validate_output_quantity(quantity)?;

        debug!(product_id = %product_id, person_id = %person_id, quantity = %quantity, "Recording output");

        let product = self
            .load_product(product_id)
            .await?
            .ok_or_else(|| StoreError::not_found("Product", product_id))?;
        let person = self
            .load_person(person_id)
            .await?
            .ok_or_else(|| StoreError::not_found("Person", person_id))?;

        if !product.has_stock(quantity) {
            return Err(StoreError::InsufficientStock {
                sku: product.sku,
                available: product.quantity,
                requested: quantity,
            });
        }

        // Name snapshots frozen from the just-loaded records: the log is a
        // fact about this moment and must not track later renames.
        let log = OutputLog {
            id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            person_id: person.id.clone(),
            person_name: person.name.clone(),
            quantity,
            timestamp: Utc::now(),
        };

        let new_quantity = product.quantity - quantity;

        let mut tx = self.pool.begin().await?;

        // Full-record replace of the product with the decremented quantity.
        // A dropped tx rolls back, so every early return below is safe.
        let result = sqlx::query(
            r#"
            UPDATE products SET
                sku = ?2,
                name = ?3,
                description = ?4,
                quantity = ?5,
                price_cents = ?6,
                image_ref = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(new_quantity)
        .bind(product.price_cents)
        .bind(&product.image_ref)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::TransactionAborted(e.to_string()))?;

        if result.rows_affected() == 0 {
            // Product vanished between the snapshot load and the write.
            return Err(StoreError::not_found("Product", product_id));
        }

        sqlx::query(
            r#"
            INSERT INTO output_logs (id, product_id, product_name, person_id, person_name, quantity, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&log.id)
        .bind(&log.product_id)
        .bind(&log.product_name)
        .bind(&log.person_id)
        .bind(&log.person_name)
        .bind(log.quantity)
        .bind(log.timestamp)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::TransactionAborted(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::TransactionAborted(e.to_string()))?;

        info!(
            log_id = %log.id,
            product_id = %log.product_id,
            quantity = %quantity,
            remaining = %new_quantity,
            "Output recorded"
        );

        Ok(log)
    }

    async fn load_product(&self, id: &str) -> StoreResult<Option<Product>> {
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

    async fn load_person(&self, id: &str) -> StoreResult<Option<Person>> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            SELECT id, name, contact_info
            FROM people
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(person)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};

    async fn seeded_store() -> Store {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();

        store
            .products()
            .add(&Product {
                id: "p1".to_string(),
                sku: "A1".to_string(),
                name: "Widget".to_string(),
                description: String::new(),
                quantity: 10,
                price_cents: 250,
                image_ref: None,
            })
            .await
            .unwrap();
        store
            .people()
            .add(&Person {
                id: "x1".to_string(),
                name: "Ana".to_string(),
                contact_info: None,
            })
            .await
            .unwrap();

        store
    }

    #[tokio::test]
    async fn test_record_output_decrements_stock_and_appends_log() {
        let store = seeded_store().await;

        let log = store.outputs().record_output("p1", "x1", 3).await.unwrap();

        assert_eq!(log.quantity, 3);
        assert_eq!(log.product_name, "Widget");
        assert_eq!(log.person_name, "Ana");

        let product = store.products().get("p1").await.unwrap().unwrap();
        assert_eq!(product.quantity, 7);

        let logs = store.output_logs().list().await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0], log);
    }

    #[tokio::test]
    async fn test_insufficient_stock_leaves_everything_unchanged() {
        let store = seeded_store().await;

        store.outputs().record_output("p1", "x1", 3).await.unwrap();

        // 7 left; asking for 8 must fail and change nothing.
        let err = store
            .outputs()
            .record_output("p1", "x1", 8)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::InsufficientStock {
                ref sku,
                available: 7,
                requested: 8,
            } if sku == "A1"
        ));

        let product = store.products().get("p1").await.unwrap().unwrap();
        assert_eq!(product.quantity, 7);
        assert_eq!(store.output_logs().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_draining_stock_exactly_is_allowed() {
        let store = seeded_store().await;

        store.outputs().record_output("p1", "x1", 10).await.unwrap();

        let product = store.products().get("p1").await.unwrap().unwrap();
        assert_eq!(product.quantity, 0);
    }

    #[tokio::test]
    async fn test_missing_references_are_not_found() {
        let store = seeded_store().await;

        let err = store
            .outputs()
            .record_output("ghost", "x1", 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound { ref entity, .. } if entity == "Product"
        ));

        let err = store
            .outputs()
            .record_output("p1", "ghost", 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound { ref entity, .. } if entity == "Person"
        ));

        // No side effects from the failed attempts.
        assert_eq!(store.output_logs().count().await.unwrap(), 0);
        let product = store.products().get("p1").await.unwrap().unwrap();
        assert_eq!(product.quantity, 10);
    }

    #[tokio::test]
    async fn test_non_positive_quantity_is_rejected_before_io() {
        let store = seeded_store().await;

        for qty in [0, -1] {
            let err = store
                .outputs()
                .record_output("p1", "x1", qty)
                .await
                .unwrap_err();
            assert!(matches!(err, StoreError::Validation(_)));
        }

        assert_eq!(store.output_logs().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_write_failure_mid_transaction_rolls_back_stock() {
        let store = seeded_store().await;

        // Drop the log table so the insert fails after the product update
        // already succeeded inside the transaction.
        sqlx::query("DROP TABLE output_logs")
            .execute(store.pool())
            .await
            .unwrap();

        let err = store
            .outputs()
            .record_output("p1", "x1", 3)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::TransactionAborted(_)));

        // The stock decrement must not survive the aborted transaction.
        let product = store.products().get("p1").await.unwrap().unwrap();
        assert_eq!(product.quantity, 10);
    }

    #[tokio::test]
    async fn test_name_snapshots_do_not_track_renames() {
        let store = seeded_store().await;

        let first = store.outputs().record_output("p1", "x1", 1).await.unwrap();

        // Rename both entities after the first output.
        let mut product = store.products().get("p1").await.unwrap().unwrap();
        product.name = "Widget v2".to_string();
        store.products().update(&product).await.unwrap();

        let mut person = store.people().get("x1").await.unwrap().unwrap();
        person.name = "Ana Maria".to_string();
        store.people().update(&person).await.unwrap();

        let second = store.outputs().record_output("p1", "x1", 1).await.unwrap();

        // The old log keeps its frozen names; the new one sees the renames.
        let old = store.output_logs().get(&first.id).await.unwrap().unwrap();
        assert_eq!(old.product_name, "Widget");
        assert_eq!(old.person_name, "Ana");
        assert_eq!(second.product_name, "Widget v2");
        assert_eq!(second.person_name, "Ana Maria");
    }
}
