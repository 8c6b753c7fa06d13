//! Request handlers
//!
//! Reads are public; every write takes an [`AdminUser`](crate::auth::AdminUser).

pub mod auth;
pub mod health;
pub mod metrics;
pub mod invoices;
pub mod payments;
pub mod schools;
pub mod statements;
pub mod students;
