//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! school billing test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for common entities
//! - `builders`: Builder patterns and a store seeder
//! - `assertions`: Custom assertion helpers for statements
//! - `generators`: Property-based test data generators
//! - `database`: PostgreSQL test container and pools

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;
pub mod database;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
