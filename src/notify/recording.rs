use async_trait::async_trait;
use tokio::sync::Mutex;

use super::LoginCodeNotifier;
use crate::users::User;

/// Keeps every sent `(phone, code)` pair in memory.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, i32)>>,
}

impl RecordingNotifier {
    pub async fn sent(&self) -> Vec<(String, i32)> {
        self.sent.lock().await.clone()
    }

    pub async fn last_code_for(&self, phone: &str) -> Option<i32> {
        self.sent
            .lock()
            .await
            .iter()
            .rev()
            .find(|(p, _)| p == phone)
            .map(|(_, c)| *c)
    }
}

#[async_trait]
impl LoginCodeNotifier for RecordingNotifier {
    async fn send_login_code(&self, user: &User, code: i32) -> anyhow::Result<()> {
        self.sent.lock().await.push((user.phone.clone(), code));
        Ok(())
    }
}
