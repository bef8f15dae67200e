use async_trait::async_trait;
use uuid::Uuid;

use crate::users::User;

/// Label given to tokens minted by the phone login flow.
pub const LOGIN_TOKEN_LABEL: &str = "login";

/// Mints and resolves opaque bearer tokens.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue(&self, user: &User, label: &str) -> anyhow::Result<String>;

    /// Resolves a bearer token back to the id of the user it was issued to.
    async fn authenticate(&self, token: &str) -> anyhow::Result<Uuid>;
}
