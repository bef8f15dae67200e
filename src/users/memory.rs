use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::repo::UserRepository;
use crate::users::repo_types::User;

/// Process-local user store, keyed by phone.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().await;
        Ok(users.values().find(|u| u.id == id).cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> anyhow::Result<Option<User>> {
        Ok(self.users.lock().await.get(phone).cloned())
    }

    async fn find_or_create_by_phone(&self, phone: &str) -> anyhow::Result<User> {
        let mut users = self.users.lock().await;
        let user = users
            .entry(phone.to_string())
            .or_insert_with(|| User::new(phone));
        Ok(user.clone())
    }

    async fn set_login_code(&self, id: Uuid, code: i32) -> anyhow::Result<()> {
        let mut users = self.users.lock().await;
        let user = users
            .values_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| anyhow::anyhow!("user {} not found", id))?;
        user.login_code = Some(code);
        Ok(())
    }

    async fn consume_login_code(&self, phone: &str, code: i32) -> anyhow::Result<Option<User>> {
        let mut users = self.users.lock().await;
        match users.get_mut(phone) {
            Some(user) if user.login_code == Some(code) => {
                user.login_code = None;
                Ok(Some(user.clone()))
            }
            _ => Ok(None),
        }
    }
}
