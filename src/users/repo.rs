use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::users::repo_types::User;

/// Persistence for user records, keyed by `id` and `phone`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;

    async fn find_by_phone(&self, phone: &str) -> anyhow::Result<Option<User>>;

    /// Returns the user owning `phone`, inserting one without a code if none exists.
    async fn find_or_create_by_phone(&self, phone: &str) -> anyhow::Result<User>;

    /// Stores `code` as the pending login code, replacing any previous one.
    async fn set_login_code(&self, id: Uuid, code: i32) -> anyhow::Result<()>;

    /// Clears the login code of the user matching both `phone` and `code`
    /// in a single atomic step and returns that user. Of two concurrent
    /// callers with the same pair at most one gets `Some`.
    async fn consume_login_code(&self, phone: &str, code: i32) -> anyhow::Result<Option<User>>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, phone, login_code, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn find_by_phone(&self, phone: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, phone, login_code, created_at
            FROM users
            WHERE phone = $1
            "#,
        )
        .bind(phone)
        .fetch_optional(&self.db)
        .await
        .context("find user by phone")?;
        Ok(user)
    }

    async fn find_or_create_by_phone(&self, phone: &str) -> anyhow::Result<User> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (phone)
            VALUES ($1)
            ON CONFLICT (phone) DO UPDATE SET phone = EXCLUDED.phone
            RETURNING id, phone, login_code, created_at
            "#,
        )
        .bind(phone)
        .fetch_one(&self.db)
        .await
        .context("find or create user by phone")?;
        Ok(user)
    }

    async fn set_login_code(&self, id: Uuid, code: i32) -> anyhow::Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET login_code = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(code)
        .execute(&self.db)
        .await
        .context("set login code")?;
        anyhow::ensure!(result.rows_affected() == 1, "user {} not found", id);
        Ok(())
    }

    async fn consume_login_code(&self, phone: &str, code: i32) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET login_code = NULL
            WHERE phone = $1 AND login_code = $2
            RETURNING id, phone, login_code, created_at
            "#,
        )
        .bind(phone)
        .bind(code)
        .fetch_optional(&self.db)
        .await
        .context("consume login code")?;
        Ok(user)
    }
}
