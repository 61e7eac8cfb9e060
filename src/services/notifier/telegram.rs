//! Telegram Bot API notifier

use crate::config::{parse_or, ConfigError};
use crate::error::NotifyError;
use std::env;
use std::time::Duration;
use tracing::debug;

use super::Notifier;

pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone, PartialEq)]
pub struct TelegramConfig {
    pub base_url: String,
    pub bot_token: String,
    pub chat_id: String,
    pub request_timeout: Duration,
}

impl TelegramConfig {
    /// `None` when no bot token or chat id is configured.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let lookup = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());
        let (Some(bot_token), Some(chat_id)) =
            (lookup("TELEGRAM_BOT_TOKEN"), lookup("TELEGRAM_CHAT_ID"))
        else {
            return Ok(None);
        };

        Ok(Some(Self {
            base_url: lookup("TELEGRAM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            bot_token: bot_token.trim().to_string(),
            chat_id: chat_id.trim().to_string(),
            request_timeout: Duration::from_secs(parse_or(&lookup, "NOTIFY_TIMEOUT_SECONDS", 10)?),
        }))
    }
}

pub struct TelegramNotifier {
    http: reqwest::Client,
    config: TelegramConfig,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::Invalid(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self::with_client(config, http))
    }

    pub fn with_client(config: TelegramConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.base_url.trim_end_matches('/'),
            self.config.bot_token
        )
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let params = [
            ("chat_id", self.config.chat_id.as_str()),
            ("text", text),
            ("parse_mode", "Markdown"),
        ];

        let response = self
            .http
            .post(self.send_message_url())
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        debug!(chat_id = %self.config.chat_id, "Telegram message delivered");
        Ok(())
    }
}
