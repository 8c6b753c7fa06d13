//! Domain Adapters
//!
//! This module provides adapter implementations for domain ports,
//! connecting domain interfaces to the PostgreSQL database layer.
//!
//! # Architecture
//!
//! The billing adapter:
//! - Implements the school, student, invoice and payment port traits
//! - Translates between domain models and database row types
//! - Uses the repository layer for database operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresBillingAdapter;
//! use domain_billing::StudentPort;
//!
//! let adapter = PostgresBillingAdapter::new(pool);
//! let student = adapter.get_student(student_id).await?;
//! ```

pub mod billing;

pub use billing::PostgresBillingAdapter;
