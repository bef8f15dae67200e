use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::code::LOGIN_CODE_RANGE;
use crate::phone::is_numeric_phone;

/// Request body for `POST /login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "phone_field")]
    #[validate(
        required(message = "The phone field is required."),
        length(min = 10, message = "The phone field must be at least 10 characters."),
        custom(function = "validate_numeric_phone")
    )]
    pub phone: Option<String>,
}

/// Request body for `POST /login/verify`. The code is accepted as a JSON
/// number or a numeric string.
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyRequest {
    #[serde(default, deserialize_with = "phone_field")]
    #[validate(
        required(message = "The phone field is required."),
        length(min = 10, message = "The phone field must be at least 10 characters."),
        custom(function = "validate_numeric_phone")
    )]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "login_code_field")]
    #[validate(
        required(message = "The login code field is required."),
        custom(function = "validate_login_code")
    )]
    pub login_code: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub phone: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Null and blank strings count as a missing field.
fn present(value: Option<Value>) -> Option<Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        other => other,
    }
}

/// Any JSON value is accepted here so that a non-string phone still ends
/// up in the field errors; it is validated by its text.
fn phone_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = present(Option::<Value>::deserialize(deserializer)?);
    Ok(value.map(|v| match v {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }))
}

fn login_code_field<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(present(Option::<Value>::deserialize(deserializer)?))
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn validate_numeric_phone(phone: &str) -> Result<(), ValidationError> {
    if is_numeric_phone(phone) {
        Ok(())
    } else {
        Err(rule_error("numeric", "The phone field must be a number."))
    }
}

/// Value of a submitted login code if it is a finite whole number,
/// however large.
pub fn login_code_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (n.is_finite() && n.fract() == 0.0).then_some(n)
}

fn in_code_range(code: f64) -> bool {
    code >= f64::from(*LOGIN_CODE_RANGE.start()) && code <= f64::from(*LOGIN_CODE_RANGE.end())
}

fn validate_login_code(value: &Value) -> Result<(), ValidationError> {
    let code = login_code_value(value)
        .ok_or_else(|| rule_error("numeric", "The login code field must be a number."))?;
    if !in_code_range(code) {
        return Err(rule_error(
            "between",
            "The login code field must be between 111111 and 999999.",
        ));
    }
    Ok(())
}

impl LoginRequest {
    /// Phone after a successful `validate()`.
    pub fn phone(&self) -> &str {
        self.phone.as_deref().unwrap_or_default()
    }
}

impl VerifyRequest {
    pub fn phone(&self) -> &str {
        self.phone.as_deref().unwrap_or_default()
    }

    /// Code after a successful `validate()`; `None` only if validation was skipped.
    pub fn login_code(&self) -> Option<i32> {
        self.login_code
            .as_ref()
            .and_then(login_code_value)
            .filter(|c| in_code_range(*c))
            .map(|c| c as i32)
    }
}
