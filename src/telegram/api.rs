//! Minimal Telegram Bot API client

use super::types::{
    ApiResponse, GetUpdatesRequest, ReplyKeyboardMarkup, SendMessageRequest, Update, User,
};
use crate::state_machine::OutboundMessage;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Headroom on top of the long-poll timeout before the HTTP request gives up
const POLL_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Telegram request failed: {0}")]
    Http(String),
    #[error("Telegram API error {code}: {description}")]
    Api { code: i64, description: String },
    #[error("Failed to parse Telegram response: {0}")]
    Parse(String),
}

impl TelegramError {
    /// Telegram rejected the Markdown in a message
    fn is_markup_error(&self) -> bool {
        matches!(self, TelegramError::Api { description, .. } if description.contains("can't parse entities"))
    }
}

pub struct TelegramClient {
    client: Client,
    /// `<api>/bot<token>`; never logged
    base_url: String,
    poll_timeout: Duration,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str, poll_timeout: Duration) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(poll_timeout + POLL_GRACE)
            .build()
            .map_err(|e| TelegramError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: format!("{}/bot{token}", api_url.trim_end_matches('/')),
            poll_timeout,
        })
    }

    /// The bot's own account
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-poll for updates with ids at or above `offset`
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: vec!["message"],
        };
        self.call("getUpdates", &request).await
    }

    /// Send a Markdown message, falling back to plain text if Telegram
    /// cannot parse the markup (remote response bodies are echoed verbatim).
    pub async fn send_text(&self, chat_id: i64, message: &OutboundMessage) -> Result<(), TelegramError> {
        let reply_markup = message
            .options
            .as_deref()
            .map(ReplyKeyboardMarkup::single_column);

        let request = SendMessageRequest {
            chat_id,
            text: &message.text,
            parse_mode: Some("Markdown"),
            reply_markup: reply_markup.clone(),
        };

        match self.call::<Value, _>("sendMessage", &request).await {
            Err(e) if e.is_markup_error() => {
                tracing::warn!(chat_id, error = %e, "Resending message without Markdown");
                let plain = SendMessageRequest {
                    chat_id,
                    text: &message.text,
                    parse_mode: None,
                    reply_markup,
                };
                self.call::<Value, _>("sendMessage", &plain).await.map(|_| ())
            }
            other => other.map(|_| ()),
        }
    }

    async fn call<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, TelegramError> {
        let response = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .json(body)
            .send()
            .await
            // The URL contains the bot token
            .map_err(|e| TelegramError::Http(e.without_url().to_string()))?;

        // Error statuses still carry the JSON envelope
        let text = response
            .text()
            .await
            .map_err(|e| TelegramError::Http(e.without_url().to_string()))?;

        let parsed: ApiResponse<T> =
            serde_json::from_str(&text).map_err(|e| TelegramError::Parse(e.to_string()))?;

        if !parsed.ok {
            return Err(TelegramError::Api {
                code: parsed.error_code.unwrap_or_default(),
                description: parsed.description.unwrap_or_default(),
            });
        }

        parsed
            .result
            .ok_or_else(|| TelegramError::Parse(format!("{method} returned no result")))
    }
}
