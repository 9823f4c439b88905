//! Bucket Bot - Telegram front-end for the entry API
//!
//! Users pick an entry type (Task, Note, Bookmark), type the content, and
//! the bot posts it and reports the API's answer.

mod config;
mod runtime;
mod state_machine;
mod submission;
mod telegram;

use config::BotConfig;
use runtime::ProductionManager;
use std::sync::Arc;
use submission::{ApiConfig, HttpSubmissionClient, LoggingSubmissionClient};
use telegram::TelegramClient;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bucket_bot=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = BotConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
    })?;
    tracing::debug!(config = ?config, "Loaded configuration");

    // A bad URL or key disables submissions but keeps the bot answering
    let submission = match ApiConfig::new(&config.api_url, &config.api_key) {
        Ok(api_config) => {
            tracing::info!(url = %api_config.base_url(), "Entry API configured");
            let http = HttpSubmissionClient::new(Arc::new(api_config));
            Some(LoggingSubmissionClient::new(Arc::new(http)))
        }
        Err(e) => {
            tracing::error!(error = %e, "Entry API configuration unusable; submissions disabled");
            None
        }
    };

    let telegram = Arc::new(TelegramClient::new(
        &config.telegram_api_url,
        &config.bot_token,
        config.poll_timeout,
    )?);

    let manager: ProductionManager = runtime::RuntimeManager::new(submission, telegram.clone())
        .with_idle_timeout(config.idle_timeout);

    // Stop polling on Ctrl-C
    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            shutdown.cancel();
        }
    });

    tracing::info!("Starting Bucket Bot");
    telegram::run_polling(&telegram, &manager, cancel).await;

    Ok(())
}
