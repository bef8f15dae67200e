use crate::state::AppState;
use axum::Router;

mod code;
mod dto;
pub(crate) mod extractors;
pub mod handlers;
mod jwt;
mod tokens;

pub use jwt::JwtKeys;
pub use tokens::TokenIssuer;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::login_routes())
        .merge(handlers::user_routes())
}
