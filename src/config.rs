//! Process configuration from the environment

use crate::submission::DEFAULT_API_URL;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 3600;
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("{var} must be a whole number of seconds, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{0} must be at least 1 second")]
    ZeroTimeout(&'static str),
}

/// Everything the bot reads from its environment
#[derive(Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub api_key: String,
    pub api_url: String,
    pub telegram_api_url: String,
    /// `None` keeps conversations in memory until the process exits
    pub idle_timeout: Option<Duration>,
    pub poll_timeout: Duration,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bot_token = get("BUCKETBOT_TOKEN").ok_or(ConfigError::Missing("BUCKETBOT_TOKEN"))?;
        let api_key = get("WELL_API_KEY").ok_or(ConfigError::Missing("WELL_API_KEY"))?;

        let idle_secs = parse_secs(
            "BUCKETBOT_IDLE_TIMEOUT_SECS",
            get("BUCKETBOT_IDLE_TIMEOUT_SECS"),
            DEFAULT_IDLE_TIMEOUT_SECS,
        )?;
        let poll_secs = parse_secs(
            "BUCKETBOT_POLL_TIMEOUT_SECS",
            get("BUCKETBOT_POLL_TIMEOUT_SECS"),
            DEFAULT_POLL_TIMEOUT_SECS,
        )?;
        // Zero turns long polling into a busy loop
        if poll_secs == 0 {
            return Err(ConfigError::ZeroTimeout("BUCKETBOT_POLL_TIMEOUT_SECS"));
        }

        Ok(Self {
            bot_token,
            api_key,
            api_url: get("WELL_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            telegram_api_url: get("TELEGRAM_API_URL")
                .unwrap_or_else(|| crate::telegram::DEFAULT_API_URL.to_string()),
            idle_timeout: (idle_secs > 0).then(|| Duration::from_secs(idle_secs)),
            poll_timeout: Duration::from_secs(poll_secs),
        })
    }
}

fn parse_secs(var: &'static str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value: v }),
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("api_url", &self.api_url)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("idle_timeout", &self.idle_timeout)
            .field("poll_timeout", &self.poll_timeout)
            .finish_non_exhaustive()
    }
}
