//! Billing Domain - School Ledger and Statements
//!
//! This crate holds the school billing model: schools enrol students,
//! students are invoiced, and payments are applied against invoices.
//!
//! # Statements
//!
//! A statement is never stored. It is recomputed on every request from the
//! invoices and payments in storage:
//!
//! 1. Payments are grouped by invoice
//! 2. Each invoice is classified as `PENDING`, `PARTIAL`, `PAID` or `CREDIT`
//!    by comparing its paid total to its fixed total, exact to the cent
//! 3. The per-invoice figures are rolled up into statement totals
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{BillingService, ports::mock::InMemoryBillingStore};
//!
//! let service = BillingService::from_store(Arc::new(InMemoryBillingStore::new()));
//! let statement = service.get_school_statement(school_id).await?;
//! println!("owed: {}", statement.totals.balance_due_total);
//! ```

pub mod school;
pub mod student;
pub mod invoice;
pub mod payment;
pub mod rules;
pub mod statement;
pub mod ports;
pub mod service;
pub mod error;

pub use school::{School, CreateSchoolRequest, SchoolPatch};
pub use student::{Student, CreateStudentRequest, StudentPatch};
pub use invoice::{Invoice, CreateInvoiceRequest, InvoicePatch};
pub use payment::{Payment, CreatePaymentRequest, PaymentPatch};
pub use rules::{InvoiceStatus, Settlement, classify, settle};
pub use statement::{InvoiceSummary, StatementTotals, StudentStatement, SchoolStatement};
pub use ports::{SchoolPort, StudentPort, InvoicePort, PaymentPort, BillingStore, PageRequest};
pub use service::BillingService;
pub use error::BillingError;
