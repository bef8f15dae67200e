use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub base_url: String,
}

/// Which channel login codes go out on.
#[derive(Debug, Clone, Deserialize)]
pub enum SmsConfig {
    /// Write the code to the log. Local development only.
    Log,
    Twilio(TwilioConfig),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// `None` runs against the in-memory user store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt: JwtConfig,
    pub sms: SmsConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        let database_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "phone-login".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "phone-login-users".into()),
            ttl_minutes: parse_ttl_minutes(std::env::var("JWT_TTL_MINUTES").ok().as_deref())?,
        };
        let sms = SmsConfig::from_env()?;
        Ok(Self {
            database_url,
            database_max_connections,
            jwt,
            sms,
        })
    }
}

pub const DEFAULT_TTL_MINUTES: i64 = 60 * 24 * 30;
/// Ten years.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 365 * 10;

/// Token lifetime from `JWT_TTL_MINUTES`; unset means 30 days.
fn parse_ttl_minutes(raw: Option<&str>) -> anyhow::Result<i64> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(DEFAULT_TTL_MINUTES);
    };
    let minutes = raw
        .parse::<i64>()
        .with_context(|| format!("JWT_TTL_MINUTES must be a whole number, got {:?}", raw))?;
    anyhow::ensure!(
        (1..=MAX_TTL_MINUTES).contains(&minutes),
        "JWT_TTL_MINUTES must be between 1 and {}",
        MAX_TTL_MINUTES
    );
    Ok(minutes)
}

impl SmsConfig {
    fn from_env() -> anyhow::Result<Self> {
        let provider = std::env::var("SMS_PROVIDER").unwrap_or_else(|_| "log".into());
        match provider.to_lowercase().as_str() {
            "log" => Ok(SmsConfig::Log),
            "twilio" => {
                let from_number = std::env::var("TWILIO_FROM_NUMBER")
                    .context("TWILIO_FROM_NUMBER must be set")?;
                anyhow::ensure!(
                    from_number.starts_with('+'),
                    "TWILIO_FROM_NUMBER must be in E.164 format"
                );
                Ok(SmsConfig::Twilio(TwilioConfig {
                    account_sid: std::env::var("TWILIO_ACCOUNT_SID")
                        .context("TWILIO_ACCOUNT_SID must be set")?,
                    auth_token: std::env::var("TWILIO_AUTH_TOKEN")
                        .context("TWILIO_AUTH_TOKEN must be set")?,
                    from_number,
                    base_url: std::env::var("TWILIO_BASE_URL")
                        .unwrap_or_else(|_| "https://api.twilio.com".into()),
                }))
            }
            other => anyhow::bail!("unknown SMS_PROVIDER {:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_defaults_to_thirty_days() {
        assert_eq!(parse_ttl_minutes(None).unwrap(), DEFAULT_TTL_MINUTES);
        assert_eq!(parse_ttl_minutes(Some("  ")).unwrap(), DEFAULT_TTL_MINUTES);
    }

    #[test]
    fn ttl_accepts_values_in_bounds() {
        assert_eq!(parse_ttl_minutes(Some("15")).unwrap(), 15);
        assert_eq!(parse_ttl_minutes(Some("1")).unwrap(), 1);
        assert_eq!(
            parse_ttl_minutes(Some(&MAX_TTL_MINUTES.to_string())).unwrap(),
            MAX_TTL_MINUTES
        );
    }

    #[test]
    fn ttl_rejects_unreasonable_values() {
        for raw in ["0", "-5", "abc", "1.5", "9223372036854775807", "99999999999999999999"] {
            assert!(parse_ttl_minutes(Some(raw)).is_err(), "{} should be rejected", raw);
        }
        assert!(parse_ttl_minutes(Some(&(MAX_TTL_MINUTES + 1).to_string())).is_err());
    }
}
