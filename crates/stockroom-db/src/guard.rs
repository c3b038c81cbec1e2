//! # Integrity Guard
//!
//! Pre-delete referential-integrity checks: a Product or Person that any
//! output log still references must not be deleted, or the audit history
//! would be orphaned.
//!
//! ## Composition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   Check-Then-Delete Sequence                        │
//! │                                                                     │
//! │  caller                                                             │
//! │    │  store.integrity().check_product(id)                           │
//! │    │        │                                                       │
//! │    │        ├── Err(ReferencedByLog) → refuse, surface to the user  │
//! │    │        │                                                       │
//! │    │        └── Ok(()) ──► store.products().delete(id)              │
//! │    ▼                                                                │
//! │                                                                     │
//! │  The check and the delete are two separate operations. Under the    │
//! │  single-writer assumption the window between them is harmless;      │
//! │  it is a documented limitation, not silently "fixed" here.          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The scans are read-only and index-backed (product_id/person_id indexes on
//! output_logs), fine at the expected single-user scale.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Pre-delete referential-integrity checks over the output log.
#[derive(Debug, Clone)]
pub struct IntegrityGuard {
    pool: SqlitePool,
}

impl IntegrityGuard {
    /// Creates a new IntegrityGuard.
    pub fn new(pool: SqlitePool) -> Self {
        IntegrityGuard { pool }
    }

    /// Returns false iff any output log references the product.
    pub async fn can_delete_product(&self, id: &str) -> StoreResult<bool> {
        let referenced: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM output_logs WHERE product_id = ?1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        debug!(id = %id, referenced = referenced, "Product delete check");
        Ok(!referenced)
    }

    /// Returns false iff any output log references the person.
    pub async fn can_delete_person(&self, id: &str) -> StoreResult<bool> {
        let referenced: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM output_logs WHERE person_id = ?1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        debug!(id = %id, referenced = referenced, "Person delete check");
        Ok(!referenced)
    }

    /// Convenience form of [`can_delete_product`](Self::can_delete_product)
    /// that surfaces the refusal as an error for `?`-style composition.
    pub async fn check_product(&self, id: &str) -> StoreResult<()> {
        if self.can_delete_product(id).await? {
            Ok(())
        } else {
            Err(StoreError::referenced("Product", id))
        }
    }

    /// Convenience form of [`can_delete_person`](Self::can_delete_person).
    pub async fn check_person(&self, id: &str) -> StoreResult<()> {
        if self.can_delete_person(id).await? {
            Ok(())
        } else {
            Err(StoreError::referenced("Person", id))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
