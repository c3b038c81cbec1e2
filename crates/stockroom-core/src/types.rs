//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────┐  │
//! │  │    Product      │   │     Person      │   │    OutputLog     │  │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────  │  │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)       │  │
//! │  │  sku (business) │   │  name           │   │  product_id      │  │
//! │  │  name           │   │  contact_info   │   │  product_name ★  │  │
//! │  │  quantity       │   └─────────────────┘   │  person_id       │  │
//! │  │  price_cents    │                         │  person_name  ★  │  │
//! │  │  image_ref      │   ★ = snapshot frozen   │  quantity        │  │
//! │  └─────────────────┘       at write time     │  timestamp       │  │
//! │                                              └──────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! A product has:
//! - `id`: UUID v4 - immutable, used for references
//! - `sku`: business ID - human-readable, globally unique, potentially mutable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product tracked in inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - globally unique business identifier.
    pub sku: String,

    /// Display name.
    pub name: String,

    /// Free-form description.
    pub description: String,

    /// Units currently in stock. Never negative.
    pub quantity: i64,

    /// Unit price in cents (smallest currency unit). Never negative.
    pub price_cents: i64,

    /// Opaque reference to an attached image, if any.
    /// Attachment handling lives outside this core.
    pub image_ref: Option<String>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Total value of this product's stock (quantity × price).
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.price() * self.quantity
    }

    /// Checks whether `quantity` units can be removed from stock.
    #[inline]
    pub fn has_stock(&self, quantity: i64) -> bool {
        self.quantity >= quantity
    }
}

// =============================================================================
// Person
// =============================================================================

/// A person stock can be handed out to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Person {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Optional contact details (phone, e-mail, department).
    pub contact_info: Option<String>,
}

// =============================================================================
// Output Log
// =============================================================================

/// An immutable audit record of one stock-removal event.
///
/// ## Snapshot Pattern
/// `product_name` and `person_name` are copied from the referenced records at
/// creation time. This preserves the audit history even if a product or person
/// is renamed later - the log entry is a fact about what happened, not a view
/// of current state.
///
/// OutputLog is append-only: this core defines no update or delete for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OutputLog {
    /// Unique identifier (UUID v4), generated at creation, never reused.
    pub id: String,

    /// Product the stock was removed from.
    pub product_id: String,

    /// Product name at the time of the output (frozen).
    pub product_name: String,

    /// Person the stock was handed to.
    pub person_id: String,

    /// Person name at the time of the output (frozen).
    pub person_name: String,

    /// Units removed. Always positive.
    pub quantity: i64,

    /// When the output was recorded. Immutable.
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
