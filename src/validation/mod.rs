//! Request validation: custom field rules plus extractors that run them
//! before a handler sees the payload.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use std::collections::HashMap;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::database::models::OrderStatus;
use crate::error::ApiError;

/// Japanese phone numbers: landline, mobile/IP, emergency and toll-free forms
static JP_PHONE_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(0[1-9][0-9]{0,3}-[0-9]{1,4}-[0-9]{4}|",
        r"0[1-9][0-9]{0,3}[0-9]{1,4}[0-9]{4}|",
        r"0[5789]0-[0-9]{4}-[0-9]{4}|",
        r"0[5789]0[0-9]{4}[0-9]{4}|",
        r"110|119|0120-[0-9]{3}-[0-9]{3})$"
    ))
    .expect("phone number pattern is valid")
});

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

pub fn validate_jp_phone_number(value: &str) -> Result<(), ValidationError> {
    if JP_PHONE_NUMBER.is_match(value) {
        Ok(())
    } else {
        Err(rule_error("jp_phone_number", "must be a Japanese phone number"))
    }
}

pub fn validate_uuid_v4(value: &Uuid) -> Result<(), ValidationError> {
    if value.get_version_num() == 4 {
        Ok(())
    } else {
        Err(rule_error("uuid4", "must be a version 4 UUID"))
    }
}

/// Dates must fall strictly after today (UTC)
pub fn validate_future_date(value: &NaiveDate) -> Result<(), ValidationError> {
    if *value > Utc::now().date_naive() {
        Ok(())
    } else {
        Err(rule_error("future_date", "must be a date after today"))
    }
}

pub fn validate_order_status(value: &str) -> Result<(), ValidationError> {
    match OrderStatus::parse(value) {
        Some(_) => Ok(()),
        None => Err(rule_error(
            "oneof",
            "must be one of PENDING, SHIPPED, DELIVERED, CANCELLED",
        )),
    }
}

/// Distinguish an omitted field (`None`) from an explicit `null` (`Some(None)`).
/// Use together with `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Flatten validator output into `field -> message`, optionally prefixing each key
pub fn field_errors(errors: &ValidationErrors, prefix: &str) -> HashMap<String, String> {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("failed {} rule", err.code));
                (format!("{}{}", prefix, field), message)
            })
        })
        .collect()
}

fn validation_failure(errors: &ValidationErrors) -> ApiError {
    ApiError::validation_error("Request validation failed", Some(field_errors(errors, "")))
}

/// Path id for tables keyed by UUID v4
pub fn parse_uuid_id(raw: &str) -> Result<Uuid, ApiError> {
    let id = Uuid::parse_str(raw).map_err(|_| ApiError::invalid_field("id", "must be a UUID"))?;
    validate_uuid_v4(&id).map_err(|_| ApiError::invalid_field("id", "must be a version 4 UUID"))?;
    Ok(id)
}

/// Path id for tables keyed by a serial integer
pub fn parse_serial_id(raw: &str) -> Result<i64, ApiError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::invalid_field("id", "must be a positive integer")),
    }
}

/// JSON body that has passed `Validate`
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;
        value.validate().map_err(|e| validation_failure(&e))?;
        Ok(ValidatedJson(value))
    }
}

/// Bulk request body wrapping a list of items under one key
pub trait BulkPayload: DeserializeOwned {
    type Item: Validate;

    /// JSON key holding the items, used to label per-item errors
    const FIELD: &'static str;

    fn items(&self) -> &[Self::Item];
}

/// Bulk body whose every item has passed `Validate`.
/// Failures are keyed `<field>[<index>].<item field>`.
#[derive(Debug, Clone)]
pub struct ValidatedBulkJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedBulkJson<T>
where
    T: BulkPayload,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;

        let mut failures = HashMap::new();
        for (index, item) in value.items().iter().enumerate() {
            if let Err(errors) = item.validate() {
                let prefix = format!("{}[{}].", T::FIELD, index);
                failures.extend(field_errors(&errors, &prefix));
            }
        }

        if !failures.is_empty() {
            return Err(ApiError::validation_error(
                "Request validation failed",
                Some(failures),
            ));
        }
        Ok(ValidatedBulkJson(value))
    }
}

/// Query string that has passed `Validate`
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::validation_error(rejection.body_text(), None))?;
        value.validate().map_err(|e| validation_failure(&e))?;
        Ok(ValidatedQuery(value))
    }
}
