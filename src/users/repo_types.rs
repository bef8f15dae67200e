use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,                   // unique user ID
    pub phone: String,              // login identity, unique
    pub login_code: Option<i32>,    // pending one-time code
    pub created_at: OffsetDateTime, // creation timestamp
}

impl User {
    pub fn new(phone: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone: phone.to_string(),
            login_code: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}
