//! Billing domain errors

use core_kernel::{Money, PortError};
use thiserror::Error;

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// The referenced entity does not exist
    #[error("{entity} {id} not found")]
    NotFound {
        entity: &'static str,
        id: String,
    },

    /// Invoice totals must not be negative
    #[error("Invoice total must not be negative: {0}")]
    NegativeInvoiceTotal(Money),

    /// Payments must move a positive amount
    #[error("Payment amount must be positive: {0}")]
    NonPositivePayment(Money),

    /// Storage port failure
    #[error(transparent)]
    Port(#[from] PortError),
}

impl BillingError {
    /// Creates a NotFound error for the given entity kind
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        BillingError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns true if a referenced entity was missing
    pub fn is_not_found(&self) -> bool {
        match self {
            BillingError::NotFound { .. } => true,
            BillingError::Port(port) => port.is_not_found(),
            _ => false,
        }
    }
}
