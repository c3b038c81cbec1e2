//! # Person Repository
//!
//! Database operations for people. Same contract as the product repository
//! minus the unique business key: the only key on a person is its id.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use stockroom_core::validation::validate_person;
use stockroom_core::Person;

/// Repository for person database operations.
#[derive(Debug, Clone)]
pub struct PersonRepository {
    pool: SqlitePool,
}

impl PersonRepository {
    /// Creates a new PersonRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PersonRepository { pool }
    }

    /// Adds a new person. Fails with DuplicateKey if the id already exists.
    pub async fn add(&self, person: &Person) -> StoreResult<Person> {
        validate_person(person)?;

        debug!(name = %person.name, "Adding person");

        sqlx::query(
            r#"
            INSERT INTO people (id, name, contact_info)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&person.id)
        .bind(&person.name)
        .bind(&person.contact_info)
        .execute(&self.pool)
        .await
        .map_err(|e| match StoreError::from(e) {
            StoreError::DuplicateKey { field, .. } => {
                StoreError::duplicate(field, person.id.clone())
            }
            other => other,
        })?;

        Ok(person.clone())
    }

    /// Gets a person by id. A miss is `Ok(None)`, not an error.
    pub async fn get(&self, id: &str) -> StoreResult<Option<Person>> {
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

    /// Lists all people. No ordering guarantee.
    pub async fn list(&self) -> StoreResult<Vec<Person>> {
        let people = sqlx::query_as::<_, Person>(
            r#"
            SELECT id, name, contact_info
            FROM people
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(people)
    }

    /// Full-record replace keyed by id, with upsert semantics.
    pub async fn update(&self, person: &Person) -> StoreResult<Person> {
        validate_person(person)?;

        debug!(id = %person.id, "Upserting person");

        sqlx::query(
            r#"
            INSERT INTO people (id, name, contact_info)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                contact_info = excluded.contact_info
            "#,
        )
        .bind(&person.id)
        .bind(&person.name)
        .bind(&person.contact_info)
        .execute(&self.pool)
        .await?;

        Ok(person.clone())
    }

    /// Deletes a person unconditionally.
    ///
    /// Referential integrity is NOT checked here - compose
    /// [`crate::guard::IntegrityGuard`] before calling.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        debug!(id = %id, "Deleting person");

        let result = sqlx::query("DELETE FROM people WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Person", id));
        }

        Ok(())
    }

    /// Counts people (for diagnostics).
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM people")
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

    async fn store() -> Store {
        Store::open(StoreConfig::in_memory()).await.unwrap()
    }

    fn person(id: &str, name: &str) -> Person {
        Person {
            id: id.to_string(),
            name: name.to_string(),
            contact_info: Some("room 12".to_string()),
        }
    }

    #[tokio::test]
    async fn test_crud_roundtrip() {
        let repo = store().await.people();

        repo.add(&person("x1", "Ana")).await.unwrap();
        assert_eq!(repo.get("x1").await.unwrap().unwrap().name, "Ana");

        let mut renamed = person("x1", "Ana Maria");
        renamed.contact_info = None;
        repo.update(&renamed).await.unwrap();
        assert_eq!(repo.get("x1").await.unwrap().unwrap(), renamed);

        repo.delete("x1").await.unwrap();
        assert!(repo.get("x1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_duplicate_id() {
        let repo = store().await.people();

        repo.add(&person("x1", "Ana")).await.unwrap();
        let err = repo.add(&person("x1", "Other")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { .. }));
    }

    #[tokio::test]
    async fn test_update_creates_missing_record() {
        let repo = store().await.people();

        repo.update(&person("ghost", "Ghost")).await.unwrap();
        assert!(repo.get("ghost").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let repo = store().await.people();

        let err = repo.delete("nobody").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
