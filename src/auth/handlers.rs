use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::{
    auth::{
        code::generate_login_code,
        dto::{LoginRequest, MessageResponse, PublicUser, VerifyRequest},
        extractors::AuthUser,
        tokens::LOGIN_TOKEN_LABEL,
    },
    error::{ApiError, UNAUTHENTICATED},
    phone::mask_phone,
    state::AppState,
};

pub const CODE_SENT: &str = "A login code has been sent to your phone number.";
pub const VERIFY_FAILED: &str = "Could not verify the login code.";

pub fn login_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(submit))
        .route("/login/", post(submit))
        .route("/login/verify", post(verify))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/user", get(current_user))
}

/// Finds or creates the user for `phone`, stores a fresh login code and
/// hands it to the notifier.
#[instrument(skip(state, payload))]
pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let phone = payload.phone();

    let user = state.users.find_or_create_by_phone(phone).await?;

    let code = generate_login_code();
    state.users.set_login_code(user.id, code).await?;
    state.notifier.send_login_code(&user, code).await?;

    info!(user_id = %user.id, phone = %mask_phone(phone), "login code issued");
    Ok(Json(MessageResponse { message: CODE_SENT }))
}

/// Exchanges a matching `(phone, login_code)` pair for a bearer token.
/// The code is cleared in the same step it is checked.
#[instrument(skip(state, payload))]
pub async fn verify(
    State(state): State<AppState>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<String, ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let phone = payload.phone();
    let code = payload
        .login_code()
        .ok_or(ApiError::Unauthorized(VERIFY_FAILED))?;

    let Some(user) = state.users.consume_login_code(phone, code).await? else {
        // Same response for unknown phone and wrong code.
        warn!(phone = %mask_phone(phone), "login code mismatch");
        return Err(ApiError::Unauthorized(VERIFY_FAILED));
    };

    let token = state.tokens.issue(&user, LOGIN_TOKEN_LABEL).await?;

    info!(user_id = %user.id, phone = %mask_phone(&user.phone), "user logged in");
    Ok(token)
}

#[instrument(skip(state))]
pub async fn current_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state.users.find_by_id(user_id).await?.ok_or_else(|| {
        warn!(user_id = %user_id, "token for unknown user");
        ApiError::Unauthorized(UNAUTHENTICATED)
    })?;

    Ok(Json(PublicUser {
        id: user.id,
        phone: user.phone,
        created_at: user.created_at,
    }))
}
