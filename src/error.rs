use std::collections::BTreeMap;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;
use validator::ValidationErrors;

pub const VALIDATION_FAILED: &str = "The given data was invalid.";
pub const UNAUTHENTICATED: &str = "Unauthenticated.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{}", VALIDATION_FAILED)]
    Validation(#[from] ValidationErrors),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error(transparent)]
    BadRequest(#[from] JsonRejection),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Field name to messages, ordered for stable output.
fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "message": VALIDATION_FAILED,
                    "errors": field_messages(&errors),
                })),
            )
                .into_response(),
            ApiError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
            }
            ApiError::BadRequest(rejection) => (
                rejection.status(),
                Json(json!({ "message": rejection.body_text() })),
            )
                .into_response(),
            ApiError::Internal(e) => {
                error!(error = ?e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Server Error" })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use validator::ValidationError;

    use super::*;

    #[test]
    fn unauthorized_maps_to_401() {
        let res = ApiError::Unauthorized(UNAUTHENTICATED).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn internal_maps_to_500() {
        let res = ApiError::from(anyhow::anyhow!("db down")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_collects_messages_per_field() {
        let mut errors = ValidationErrors::new();
        let mut required = ValidationError::new("required");
        required.message = Some("The phone field is required.".into());
        errors.add("phone", required);
        errors.add("login_code", ValidationError::new("range"));

        let messages = field_messages(&errors);
        assert_eq!(messages["phone"], vec!["The phone field is required."]);
        assert_eq!(messages["login_code"], vec!["range"]);

        let res = ApiError::from(errors).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
