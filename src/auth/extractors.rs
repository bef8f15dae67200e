use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;
use uuid::Uuid;

use crate::error::{ApiError, UNAUTHENTICATED};
use crate::state::AppState;

/// Resolves the bearer token through the token issuer, yielding the user ID.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Read Authorization header
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::Unauthorized(UNAUTHENTICATED))?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or(ApiError::Unauthorized(UNAUTHENTICATED))?;

        let user_id = state.tokens.authenticate(token.trim()).await.map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            ApiError::Unauthorized(UNAUTHENTICATED)
        })?;

        Ok(AuthUser(user_id))
    }
}
