//! Repository implementations for billing entities
//!
//! This module provides concrete repository implementations that handle
//! database access for each table. Repositories encapsulate SQL queries and
//! map result sets onto plain row structs; translating rows into domain
//! types is left to the adapters.
//!
//! # Architecture
//!
//! Each repository follows these principles:
//! - Runtime-checked queries with `sqlx::query_as` and `FromRow` rows
//! - Deterministic ordering on every list query
//! - Batched lookups via `= ANY($1)` to avoid one query per parent

pub mod school;
pub mod student;
pub mod invoice;
pub mod payment;

pub use school::{SchoolRepository, SchoolRow};
pub use student::{StudentRepository, StudentRow};
pub use invoice::{InvoiceRepository, InvoiceRow};
pub use payment::{PaymentRepository, PaymentRow};
