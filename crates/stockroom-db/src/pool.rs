//! # Store Handle
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Design: An Explicit Handle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Store Lifecycle                                  │
//! │                                                                     │
//! │  App startup                                                        │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  StoreConfig::new(path) ← configure pool settings                   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Store::open(config).await ← create pool + apply schema             │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  store.products() / store.people() / store.outputs() / ...          │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  store.close().await on shutdown                                    │
//! │                                                                     │
//! │  There is no implicit global: the handle is constructed once,       │
//! │  cloned freely (it is a pool reference), and passed explicitly.     │
//! │  An operation against a store whose schema was never applied        │
//! │  fails with StoreError::NotInitialized.                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled for:
//! - Better concurrent read performance
//! - Readers don't block writers
//! - Better crash recovery

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::guard::IntegrityGuard;
use crate::migrations;
use crate::output::OutputCoordinator;
use crate::repository::output_log::OutputLogRepository;
use crate::repository::person::PersonRepository;
use crate::repository::product::ProductRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("/path/to/stockroom.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5 (sufficient for a single-user local app)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to apply migrations on open.
    /// Default: true
    pub run_migrations: bool,
}

impl StoreConfig {
    /// Creates a new store configuration with the given path.
    /// The file will be created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to apply migrations on open.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory store configuration (for testing).
    ///
    /// ```rust,ignore
    /// let store = Store::open(StoreConfig::in_memory()).await?;
    /// // Store is isolated, perfect for tests
    /// ```
    pub fn in_memory() -> Self {
        StoreConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// Main store handle providing repository access.
///
/// Cloning is cheap (the pool is reference-counted), and all clones observe
/// the same underlying database. The handle is read-only state once
/// constructed: configuration cannot change after `open`.
#[derive(Debug, Clone)]
pub struct Store {
    /// The SQLite connection pool.
    pool: SqlitePool,
}

impl Store {
    /// Opens the store: creates the pool and establishes the schema.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite:
    ///    - WAL mode for concurrent reads
    ///    - NORMAL synchronous (balance of safety/speed)
    ///    - Foreign keys enabled
    /// 3. Creates the connection pool
    /// 4. Applies embedded migrations (if enabled); a migration failure
    ///    fails `open` - no partially initialized handle is returned
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening store"
        );

        // sqlite://path with mode=rwc creates the file if not exists
        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Store pool created"
        );

        let store = Store { pool };

        if config.run_migrations {
            store.run_migrations().await?;
        }

        Ok(store)
    }

    /// Applies pending migrations.
    ///
    /// Called automatically by `open` unless disabled in the config;
    /// idempotent across repeated calls.
    pub async fn run_migrations(&self) -> StoreResult<()> {
        info!("Running store migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    ///
    /// For advanced queries not covered by repositories.
    /// Prefer using repository methods when available.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the product repository.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Returns the person repository.
    pub fn people(&self) -> PersonRepository {
        PersonRepository::new(self.pool.clone())
    }

    /// Returns the output log repository (append-only).
    pub fn output_logs(&self) -> OutputLogRepository {
        OutputLogRepository::new(self.pool.clone())
    }

    /// Returns the referential-integrity guard for pre-delete checks.
    pub fn integrity(&self) -> IntegrityGuard {
        IntegrityGuard::new(self.pool.clone())
    }

    /// Returns the coordinator for the atomic record-output operation.
    pub fn outputs(&self) -> OutputCoordinator {
        OutputCoordinator::new(self.pool.clone())
    }

    /// Closes the connection pool.
    ///
    /// Call on application shutdown. Afterwards all repository operations
    /// fail.
    pub async fn close(&self) {
        info!("Closing store connection pool");
        self.pool.close().await;
    }

    /// Checks if the store is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();

        assert!(store.health_check().await);
    }

    #[tokio::test]
    async fn test_open_is_idempotent_for_migrations() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();

        // Re-running schema setup on an already-initialized store is a no-op.
        store.run_migrations().await.unwrap();
        store.run_migrations().await.unwrap();

        let (total, applied) = crate::migrations::migration_status(store.pool())
            .await
            .unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_operation_before_schema_fails_not_initialized() {
        let config = StoreConfig::in_memory().run_migrations(false);
        let store = Store::open(config).await.unwrap();

        let err = store.products().list().await.unwrap_err();
        assert!(matches!(err, StoreError::NotInitialized));
    }

    #[test]
    fn test_config_builder() {
        let config = StoreConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
    }
}
