//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL persistence for the school billing
//! ledger using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern, providing data access abstractions
//! that hide the database implementation details from the domain layer.
//! Repositories work on plain row structs; `PostgresBillingAdapter` maps them
//! onto domain entities and implements the billing ports.
//!
//! # Money
//!
//! Amounts are stored as `NUMERIC(12,2)` and read back as exact decimals.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresBillingAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/school_billing")).await?;
//! run_migrations(&pool).await?;
//! let adapter = PostgresBillingAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;
pub mod seed;

pub use pool::{DatabasePool, create_pool, run_migrations, DatabaseConfig, MIGRATOR};
pub use error::DatabaseError;
pub use adapters::PostgresBillingAdapter;
pub use seed::seed_demo_data;
