use std::sync::Arc;

use crate::auth::{JwtKeys, TokenIssuer};
use crate::config::AppConfig;
use crate::db;
use crate::notify::{self, LoginCodeNotifier};
use crate::users::{InMemoryUserRepository, PgUserRepository, UserRepository};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub notifier: Arc<dyn LoginCodeNotifier>,
    pub tokens: Arc<dyn TokenIssuer>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let users = match &config.database_url {
            Some(url) => {
                let pool = db::connect(url, config.database_max_connections).await?;
                db::migrate(&pool).await?;
                Arc::new(PgUserRepository::new(pool)) as Arc<dyn UserRepository>
            }
            None => {
                tracing::warn!("DATABASE_URL not set, users are kept in memory");
                Arc::new(InMemoryUserRepository::new()) as Arc<dyn UserRepository>
            }
        };

        let notifier = notify::from_config(&config.sms)?;
        let tokens = Arc::new(JwtKeys::from(&config.jwt)) as Arc<dyn TokenIssuer>;

        Ok(Self::from_parts(users, notifier, tokens))
    }

    pub fn from_parts(
        users: Arc<dyn UserRepository>,
        notifier: Arc<dyn LoginCodeNotifier>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            notifier,
            tokens,
        }
    }

    /// In-memory users, a recording notifier and JWTs signed with a test secret.
    #[cfg(test)]
    pub fn fake() -> (Self, Arc<InMemoryUserRepository>, Arc<notify::RecordingNotifier>) {
        let config = AppConfig {
            database_url: None,
            database_max_connections: 1,
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            sms: crate::config::SmsConfig::Log,
        };
        let users = Arc::new(InMemoryUserRepository::new());
        let notifier = Arc::new(notify::RecordingNotifier::default());
        let tokens = Arc::new(JwtKeys::from(&config.jwt));

        let state = Self::from_parts(users.clone(), notifier.clone(), tokens);
        (state, users, notifier)
    }
}
