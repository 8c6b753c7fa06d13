//! Invoice DTOs

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{Money, StudentId};
use domain_billing::{CreateInvoiceRequest, InvoicePatch};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::{check_clearable, validate_amount};

const DESCRIPTION_MAX: usize = 500;

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct NewInvoiceRequest {
    pub student_id: StudentId,
    #[validate(custom(function = "validate_amount"))]
    pub total_amount: Decimal,
    pub due_date: NaiveDate,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
}

impl From<NewInvoiceRequest> for CreateInvoiceRequest {
    fn from(request: NewInvoiceRequest) -> Self {
        CreateInvoiceRequest {
            student_id: request.student_id,
            total_amount: Money::new(request.total_amount),
            due_date: request.due_date,
            description: request.description,
            issued_at: request.issued_at,
        }
    }
}

/// Sparse invoice update; `"description": null` clears the description
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_invoice_update"))]
pub struct UpdateInvoiceRequest {
    pub student_id: Option<StudentId>,
    #[validate(custom(function = "validate_amount"))]
    pub total_amount: Option<Decimal>,
    pub issued_at: Option<DateTime<Utc>>,
    pub due_date: Option<NaiveDate>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
}

fn validate_invoice_update(request: &UpdateInvoiceRequest) -> Result<(), ValidationError> {
    check_clearable("description", &request.description, DESCRIPTION_MAX)
}

impl From<UpdateInvoiceRequest> for InvoicePatch {
    fn from(request: UpdateInvoiceRequest) -> Self {
        InvoicePatch {
            student_id: request.student_id,
            total_amount: request.total_amount.map(Money::new),
            issued_at: request.issued_at,
            due_date: request.due_date,
            description: request.description,
        }
    }
}
