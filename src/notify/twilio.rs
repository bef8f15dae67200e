use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info};

use super::{login_code_message, LoginCodeNotifier};
use crate::config::TwilioConfig;
use crate::phone::mask_phone;
use crate::users::User;

/// Sends login codes through the Twilio Messages API.
pub struct TwilioNotifier {
    client: reqwest::Client,
    config: TwilioConfig,
}

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

impl TwilioNotifier {
    pub fn new(config: TwilioConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("build twilio http client")?;
        info!(from = %mask_phone(&config.from_number), "twilio notifier initialized");
        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.base_url.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[async_trait]
impl LoginCodeNotifier for TwilioNotifier {
    async fn send_login_code(&self, user: &User, code: i32) -> anyhow::Result<()> {
        let body = login_code_message(code);
        let form = [
            ("To", user.phone.as_str()),
            ("From", self.config.from_number.as_str()),
            ("Body", body.as_str()),
        ];

        debug!(to = %mask_phone(&user.phone), "sending login code via twilio");
        let res = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&form)
            .send()
            .await
            .context("twilio request")?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            error!(%status, to = %mask_phone(&user.phone), response = %text, "twilio rejected message");
            anyhow::bail!("twilio returned {}", status);
        }

        let msg: MessageResource = res.json().await.context("decode twilio response")?;
        info!(sid = %msg.sid, to = %mask_phone(&user.phone), "login code sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::{
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        routing::post,
        Form, Json, Router,
    };
    use tokio::sync::mpsc;

    use super::*;

    type Captured = (String, Option<String>, HashMap<String, String>);

    async fn spawn_fake_twilio(status: StatusCode) -> (String, mpsc::UnboundedReceiver<Captured>) {
        let (tx, rx) = mpsc::unbounded_channel::<Captured>();
        let app = Router::new()
            .route(
                "/2010-04-01/Accounts/:sid/Messages.json",
                post(
                    move |State(tx): State<mpsc::UnboundedSender<Captured>>,
                          Path(sid): Path<String>,
                          headers: HeaderMap,
                          Form(form): Form<HashMap<String, String>>| async move {
                        let auth = headers
                            .get(axum::http::header::AUTHORIZATION)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        let _ = tx.send((sid, auth, form));
                        (status, Json(serde_json::json!({ "sid": "SM0001" })))
                    },
                ),
            )
            .with_state(tx);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), rx)
    }

    fn notifier(base_url: String) -> TwilioNotifier {
        TwilioNotifier::new(TwilioConfig {
            account_sid: "AC123".into(),
            auth_token: "secret".into(),
            from_number: "+15005550006".into(),
            base_url,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn posts_message_form_with_basic_auth() {
        let (base_url, mut rx) = spawn_fake_twilio(StatusCode::CREATED).await;
        let user = User::new("+38763123456");

        notifier(base_url).send_login_code(&user, 424242).await.unwrap();

        let (sid, auth, form) = rx.recv().await.unwrap();
        assert_eq!(sid, "AC123");
        // base64("AC123:secret")
        assert_eq!(auth.as_deref(), Some("Basic QUMxMjM6c2VjcmV0"));
        assert_eq!(form["To"], "+38763123456");
        assert_eq!(form["From"], "+15005550006");
        assert_eq!(form["Body"], login_code_message(424242));
    }

    #[tokio::test]
    async fn provider_error_is_propagated() {
        let (base_url, _rx) = spawn_fake_twilio(StatusCode::BAD_REQUEST).await;
        let user = User::new("+38763123456");

        let err = notifier(base_url).send_login_code(&user, 424242).await.unwrap_err();
        assert!(err.to_string().contains("400"));
    }
}
