//! # Output Log Repository
//!
//! Read access to the append-only output log.
//!
//! ## Append-Only Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Output logs are immutable audit facts:                             │
//! │                                                                     │
//! │  • Created ONLY through OutputCoordinator's atomic transaction      │
//! │    (the `add` here exists for that coordinator and for tests)       │
//! │  • Never updated - no method exists                                 │
//! │  • Never deleted by this core - no method exists                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;
use stockroom_core::OutputLog;

/// Repository for output log reads (and the coordinator's insert).
#[derive(Debug, Clone)]
pub struct OutputLogRepository {
    pool: SqlitePool,
}

impl OutputLogRepository {
    /// Creates a new OutputLogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OutputLogRepository { pool }
    }

    /// Inserts a log entry outside the record-output transaction.
    ///
    /// Prefer [`crate::output::OutputCoordinator::record_output`]: inserting
    /// here does NOT touch product stock. Exposed for seeding and tests.
    pub async fn add(&self, log: &OutputLog) -> StoreResult<OutputLog> {
        debug!(product_id = %log.product_id, person_id = %log.person_id, "Inserting output log");

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
        .execute(&self.pool)
        .await?;

        Ok(log.clone())
    }

    /// Gets a log entry by id. A miss is `Ok(None)`, not an error.
    pub async fn get(&self, id: &str) -> StoreResult<Option<OutputLog>> {
        let log = sqlx::query_as::<_, OutputLog>(
            r#"
            SELECT id, product_id, product_name, person_id, person_name, quantity, timestamp
            FROM output_logs
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(log)
    }

    /// Lists all log entries. No ordering guarantee.
    pub async fn list(&self) -> StoreResult<Vec<OutputLog>> {
        let logs = sqlx::query_as::<_, OutputLog>(
            r#"
            SELECT id, product_id, product_name, person_id, person_name, quantity, timestamp
            FROM output_logs
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    /// Lists all log entries most recent first - the ordering the history
    /// views want.
    pub async fn list_recent_first(&self) -> StoreResult<Vec<OutputLog>> {
        let logs = sqlx::query_as::<_, OutputLog>(
            r#"
            SELECT id, product_id, product_name, person_id, person_name, quantity, timestamp
            FROM output_logs
            ORDER BY timestamp DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    /// Counts log entries (for diagnostics).
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM output_logs")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};
    use chrono::{Duration, Utc};

    async fn store() -> Store {
        Store::open(StoreConfig::in_memory()).await.unwrap()
    }

    fn log(id: &str, age_minutes: i64) -> OutputLog {
        OutputLog {
            id: id.to_string(),
            product_id: "p1".to_string(),
            product_name: "Widget".to_string(),
            person_id: "x1".to_string(),
            person_name: "Ana".to_string(),
            quantity: 1,
            timestamp: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[tokio::test]
    async fn test_add_get_roundtrip() {
        let repo = store().await.output_logs();

        let entry = log("l1", 0);
        repo.add(&entry).await.unwrap();

        let found = repo.get("l1").await.unwrap().unwrap();
        assert_eq!(found, entry);
        assert!(repo.get("l2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_recent_first() {
        let repo = store().await.output_logs();

        repo.add(&log("old", 60)).await.unwrap();
        repo.add(&log("new", 0)).await.unwrap();
        repo.add(&log("mid", 30)).await.unwrap();

        let logs = repo.list_recent_first().await.unwrap();
        let ids: Vec<&str> = logs.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);

        assert_eq!(repo.count().await.unwrap(), 3);
    }
}
