//! Delivery of login codes to the user's phone.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::SmsConfig;
use crate::users::User;

mod log;
#[cfg(test)]
mod recording;
mod twilio;

pub use self::log::LogNotifier;
#[cfg(test)]
pub use recording::RecordingNotifier;
pub use twilio::TwilioNotifier;

/// Hands a login code to an outbound channel. Returning `Ok` means the
/// provider accepted the message, not that it was delivered.
#[async_trait]
pub trait LoginCodeNotifier: Send + Sync {
    async fn send_login_code(&self, user: &User, code: i32) -> anyhow::Result<()>;
}

pub fn login_code_message(code: i32) -> String {
    format!("Your login code is {}, don't share this with anyone!", code)
}

pub fn from_config(sms: &SmsConfig) -> anyhow::Result<Arc<dyn LoginCodeNotifier>> {
    let notifier: Arc<dyn LoginCodeNotifier> = match sms {
        SmsConfig::Log => {
            tracing::warn!("SMS_PROVIDER=log, login codes are written to the log only");
            Arc::new(LogNotifier)
        }
        SmsConfig::Twilio(cfg) => Arc::new(TwilioNotifier::new(cfg.clone())?),
    };
    Ok(notifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_contains_code() {
        assert_eq!(
            login_code_message(123456),
            "Your login code is 123456, don't share this with anyone!"
        );
    }
}
