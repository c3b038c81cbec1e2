//! # Store Error Types
//!
//! Error taxonomy for storage operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                │
//! │                                                                     │
//! │  SQLite Error (sqlx::Error)                                         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  StoreError (this module) ← adds context and categorization         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Presentation layer renders a human-readable message                │
//! │                                                                     │
//! │  Errors are returned to the immediate caller and never retried      │
//! │  automatically - local storage failure is not transient.            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use stockroom_core::ValidationError;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Operation issued before the schema was established.
    ///
    /// ## When This Occurs
    /// - `Store::open` was called with migrations disabled and the schema
    ///   was never applied
    /// - The database file predates the schema and has no tables
    #[error("store not initialized: open the store with migrations before issuing operations")]
    NotInitialized,

    /// Entity not found.
    ///
    /// ## When This Occurs
    /// - `delete` on an id that does not exist
    /// - A record-output reference target is missing
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Primary-key or unique-secondary-key collision on add.
    ///
    /// ## When This Occurs
    /// - Adding a product whose SKU already exists
    /// - Adding a record whose id already exists
    #[error("duplicate {field}: '{value}' already exists")]
    DuplicateKey { field: String, value: String },

    /// Requested output quantity exceeds available stock.
    #[error("insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// Delete refused because an output log still references the entity.
    #[error("{entity} {id} is still referenced by the output log")]
    ReferencedByLog { entity: String, id: String },

    /// The atomic record-output transaction failed and was rolled back.
    /// Guaranteed: no partial mutation is observable.
    #[error("transaction aborted: {0}")]
    TransactionAborted(String),

    /// A record failed business-rule validation before reaching storage.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Database connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed. Fatal for `Store::open`.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Internal store error.
    #[error("internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a DuplicateKey error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        StoreError::DuplicateKey {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a ReferencedByLog error.
    pub fn referenced(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::ReferencedByLog {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound        → StoreError::NotFound
/// "UNIQUE constraint failed: ..." → StoreError::DuplicateKey
/// "no such table: ..."            → StoreError::NotInitialized
/// sqlx::Error::PoolTimedOut       → StoreError::PoolExhausted
/// Other                           → StoreError::Internal
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite error messages for the cases we categorize:
                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>"
                // Missing schema:    "no such table: <table>"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    StoreError::DuplicateKey {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("no such table") {
                    StoreError::NotInitialized
                } else {
                    StoreError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,

            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("pool is closed".to_string()),

            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
