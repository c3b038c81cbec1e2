//! # stockroom-db: Database Layer for Stockroom
//!
//! This crate provides database access for the Stockroom inventory tracker.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Stockroom Data Flow                            │
//! │                                                                     │
//! │  Presentation layer (external)                                      │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                 stockroom-db (THIS CRATE)                     │ │
//! │  │                                                               │ │
//! │  │  ┌────────────┐  ┌──────────────┐  ┌───────────────────────┐ │ │
//! │  │  │   Store    │  │ Repositories │  │ OutputCoordinator     │ │ │
//! │  │  │ (pool.rs)  │  │ product.rs   │  │ (output.rs)           │ │ │
//! │  │  │            │  │ person.rs    │  │ one atomic tx over    │ │ │
//! │  │  │ SqlitePool │◄─│ output_log.rs│  │ products + output_logs│ │ │
//! │  │  │ Migrations │  │              │  │                       │ │ │
//! │  │  └────────────┘  └──────────────┘  │ IntegrityGuard        │ │ │
//! │  │                                    │ (guard.rs)            │ │ │
//! │  │                                    └───────────────────────┘ │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database file (or :memory: in tests)                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Store handle: connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Store error taxonomy
//! - [`repository`] - Per-entity repositories (product, person, output log)
//! - [`guard`] - Pre-delete referential-integrity checks
//! - [`output`] - The atomic record-output operation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_db::{Store, StoreConfig};
//!
//! let store = Store::open(StoreConfig::new("path/to/stockroom.db")).await?;
//!
//! let product = store.products().add(&product).await?;
//! let log = store.outputs().record_output(&product.id, &person.id, 3).await?;
//! ```
//!
//! ## Concurrency Model
//!
//! A single logical writer is assumed. Repository calls are async and each
//! fully succeeds or fully fails; the only multi-table atomicity in the system
//! is [`output::OutputCoordinator::record_output`]. The guard's check and a
//! subsequent delete are two separate operations - the race window between
//! them is a documented limitation of the single-writer design, not a bug to
//! paper over here.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod guard;
pub mod migrations;
pub mod output;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use guard::IntegrityGuard;
pub use output::OutputCoordinator;
pub use pool::{Store, StoreConfig};

// Repository re-exports for convenience
pub use repository::output_log::OutputLogRepository;
pub use repository::person::PersonRepository;
pub use repository::product::ProductRepository;
