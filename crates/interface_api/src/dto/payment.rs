//! Payment DTOs

use chrono::{DateTime, Utc};
use core_kernel::{InvoiceId, Money};
use domain_billing::{CreatePaymentRequest, PaymentPatch};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::{check_clearable, validate_amount};

const METHOD_MAX: usize = 100;
const REFERENCE_MAX: usize = 255;

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct NewPaymentRequest {
    pub invoice_id: InvoiceId,
    #[validate(custom(function = "validate_amount"))]
    pub amount: Decimal,
    pub paid_at: Option<DateTime<Utc>>,
    #[validate(length(max = 100))]
    pub method: Option<String>,
    #[validate(length(max = 255))]
    pub reference: Option<String>,
}

impl From<NewPaymentRequest> for CreatePaymentRequest {
    fn from(request: NewPaymentRequest) -> Self {
        CreatePaymentRequest {
            invoice_id: request.invoice_id,
            amount: Money::new(request.amount),
            paid_at: request.paid_at,
            method: request.method,
            reference: request.reference,
        }
    }
}

/// Sparse payment update; `paid_at`, `method` and `reference` can be cleared
/// with an explicit `null`
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_payment_update"))]
pub struct UpdatePaymentRequest {
    pub invoice_id: Option<InvoiceId>,
    #[validate(custom(function = "validate_amount"))]
    pub amount: Option<Decimal>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub paid_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub method: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub reference: Option<Option<String>>,
}

fn validate_payment_update(request: &UpdatePaymentRequest) -> Result<(), ValidationError> {
    check_clearable("method", &request.method, METHOD_MAX)?;
    check_clearable("reference", &request.reference, REFERENCE_MAX)
}

impl From<UpdatePaymentRequest> for PaymentPatch {
    fn from(request: UpdatePaymentRequest) -> Self {
        PaymentPatch {
            invoice_id: request.invoice_id,
            amount: request.amount.map(Money::new),
            paid_at: request.paid_at,
            method: request.method,
            reference: request.reference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_excess_precision_is_rejected() {
        let body = json!({
            "invoice_id": "0190f1c4-8f7e-7cc0-a3f1-5d2e0c6b9a10",
            "amount": "10.005"
        });
        let request: NewPaymentRequest = serde_json::from_value(body).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_clearing_paid_at() {
        let request: UpdatePaymentRequest =
            serde_json::from_value(json!({ "paid_at": null, "method": "cash" })).unwrap();
        assert!(request.validate().is_ok());

        let patch: PaymentPatch = request.into();
        assert_eq!(patch.paid_at, Some(None));
        assert_eq!(patch.method, Some(Some("cash".to_string())));
        assert_eq!(patch.reference, None);
    }

    #[test]
    fn test_long_reference_is_rejected() {
        let request = UpdatePaymentRequest {
            reference: Some(Some("r".repeat(256))),
            ..UpdatePaymentRequest::default()
        };
        assert!(request.validate().is_err());
    }
}
