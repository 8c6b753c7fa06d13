//! Request/response data transfer objects
//!
//! Request bodies reject unknown fields and are checked with `validator`
//! before they reach the service. Responses reuse the domain types, whose
//! serde form already renders amounts as two-decimal strings.

pub mod auth;
pub mod invoice;
pub mod payment;
pub mod school;
pub mod student;

use std::borrow::Cow;

use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use core_kernel::Money;
use domain_billing::PageRequest;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize};
use validator::{Validate, ValidationError};

use crate::error::ApiError;

/// Largest amount a `NUMERIC(12,2)` column holds, plus one cent
const AMOUNT_CEILING: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

/// JSON body that has been deserialized and validated
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Query string that has been deserialized and validated
pub struct ValidatedQuery<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// `?offset=&limit=` pagination parameters
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PageParams {
    pub offset: Option<u32>,
    #[validate(range(min = 1, max = 200))]
    pub limit: Option<u32>,
}

impl From<PageParams> for PageRequest {
    fn from(params: PageParams) -> Self {
        PageRequest::new(
            params.offset.unwrap_or(0),
            params.limit.unwrap_or(PageRequest::DEFAULT_LIMIT),
        )
    }
}

/// Amounts must be positive, have at most two fractional digits and fit
/// the storage column
pub fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() || amount.is_zero() {
        return Err(invalid("positive", "must be greater than zero"));
    }
    if Money::exact(*amount).is_err() {
        return Err(invalid("precision", "must have at most two decimal places"));
    }
    if *amount >= AMOUNT_CEILING {
        return Err(invalid("range", "must be less than 10000000000"));
    }
    Ok(())
}

/// Length check for a tri-state (`double_option`) text field
pub(crate) fn check_clearable(
    field: &'static str,
    value: &Option<Option<String>>,
    max: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(Some(text)) if text.chars().count() > max => Err(invalid(
            "length",
            format!("{field} must be at most {max} characters"),
        )),
        _ => Ok(()),
    }
}

fn invalid(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_rules() {
        assert!(validate_amount(&dec!(0.01)).is_ok());
        assert!(validate_amount(&dec!(100.50)).is_ok());
        assert!(validate_amount(&dec!(100.500)).is_ok());
        assert!(validate_amount(&dec!(9999999999.99)).is_ok());
        assert!(validate_amount(&dec!(0)).is_err());
        assert!(validate_amount(&dec!(-5)).is_err());
        assert!(validate_amount(&dec!(1.005)).is_err());
        assert!(validate_amount(&dec!(10000000000)).is_err());
    }

    #[test]
    fn test_ceiling_constant() {
        assert_eq!(AMOUNT_CEILING, dec!(10000000000));
    }

    #[test]
    fn test_page_params_defaults() {
        let page: PageRequest = PageParams::default().into();
        assert_eq!(page, PageRequest::default());
    }

    #[test]
    fn test_page_limit_bounds() {
        let too_big = PageParams { offset: None, limit: Some(201) };
        assert!(too_big.validate().is_err());
        let zero = PageParams { offset: None, limit: Some(0) };
        assert!(zero.validate().is_err());
        let ok = PageParams { offset: Some(10), limit: Some(200) };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_clearable_length() {
        assert!(check_clearable("method", &None, 3).is_ok());
        assert!(check_clearable("method", &Some(None), 3).is_ok());
        assert!(check_clearable("method", &Some(Some("abc".into())), 3).is_ok());
        assert!(check_clearable("method", &Some(Some("abcd".into())), 3).is_err());
    }
}
