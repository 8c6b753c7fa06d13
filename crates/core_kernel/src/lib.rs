//! Core Kernel - Foundational types and utilities for the billing system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise two-digit decimal arithmetic
//! - Strongly typed identifiers
//! - Port infrastructure shared by storage adapters

pub mod money;
pub mod identifiers;
pub mod ports;

pub use money::{Money, MoneyError, MONEY_SCALE};
pub use identifiers::{SchoolId, StudentId, InvoiceId, PaymentId};
pub use ports::{PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable};
