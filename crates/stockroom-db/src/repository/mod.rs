//! # Repository Module
//!
//! Per-entity repository implementations for Stockroom.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                     │
//! │                                                                     │
//! │  The Repository pattern abstracts database access behind a clean    │
//! │  API. Every repository exposes the same contract over its record    │
//! │  type and primary key:                                              │
//! │                                                                     │
//! │    add(record)    → DuplicateKey on id or unique-key clash          │
//! │    get(id)        → Option (a miss is not an error)                 │
//! │    list()         → unordered; ordering is the caller's job         │
//! │    update(record) → full-record upsert keyed by id                  │
//! │    delete(id)     → unconditional removal, NotFound when absent     │
//! │                                                                     │
//! │  NOTE: the add/update asymmetry (add rejects duplicates, update     │
//! │  creates missing records) is inherited behavior, preserved          │
//! │  as-specified pending product-owner review.                         │
//! │                                                                     │
//! │  Referential integrity on delete is NOT enforced here - callers     │
//! │  compose the IntegrityGuard check before invoking delete.           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD and SKU lookup
//! - [`person::PersonRepository`] - Person CRUD
//! - [`output_log::OutputLogRepository`] - Append-only output log reads

pub mod output_log;
pub mod person;
pub mod product;
