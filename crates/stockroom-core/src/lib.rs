//! # stockroom-core: Pure Business Logic for Stockroom
//!
//! This crate is the **heart** of the Stockroom inventory tracker. It contains
//! all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Stockroom Architecture                          │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │              Presentation Layer (external)                    │ │
//! │  │    Product UI ──► Person UI ──► Output UI ──► Dashboard       │ │
//! │  └───────────────────────────────┬───────────────────────────────┘ │
//! │                                  │                                  │
//! │  ┌───────────────────────────────▼───────────────────────────────┐ │
//! │  │            ★ stockroom-core (THIS CRATE) ★                    │ │
//! │  │                                                               │ │
//! │  │   ┌──────────┐ ┌──────────┐ ┌────────────┐ ┌──────────────┐  │ │
//! │  │   │  types   │ │  money   │ │ validation │ │    report    │  │ │
//! │  │   │ Product  │ │  Money   │ │   rules    │ │  aggregation │  │ │
//! │  │   │  Person  │ │  cents   │ │   checks   │ │  CSV columns │  │ │
//! │  │   └──────────┘ └──────────┘ └────────────┘ └──────────────┘  │ │
//! │  │                                                               │ │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │ │
//! │  └───────────────────────────────┬───────────────────────────────┘ │
//! │                                  │                                  │
//! │  ┌───────────────────────────────▼───────────────────────────────┐ │
//! │  │               stockroom-db (Database Layer)                   │ │
//! │  │        SQLite queries, migrations, repositories, tx           │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Person, OutputLog)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Validation error types
//! - [`validation`] - Business rule validation
//! - [`report`] - Read-side report aggregation over loaded snapshots
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: report math takes `now` as a parameter - same input,
//!    same output
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are in cents (i64) to avoid
//!    float errors
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::Money;
pub use report::{InventoryReport, Period, ReportExport, ReportFilter};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock level below which a product is flagged for replenishment.
///
/// A product with `0 < quantity < LOW_STOCK_THRESHOLD` appears on the
/// low-stock list; at or below half of this it is flagged critical.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Placeholder rendered in report exports when a referenced record
/// no longer exists.
pub const MISSING_RECORD_PLACEHOLDER: &str = "N/A";

/// Placeholder rendered for a missing person contact in report exports.
pub const MISSING_CONTACT_PLACEHOLDER: &str = "-";
