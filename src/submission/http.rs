//! reqwest-backed submission client

use super::{ApiConfig, Category, SubmissionClient, SubmissionOutcome};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;

/// JSON body accepted by the entry API
#[derive(Debug, Serialize)]
struct EntryPayload<'a> {
    #[serde(rename = "type")]
    entry_type: Category,
    body: &'a str,
}

/// Posts entries to the configured endpoint, one attempt per call
pub struct HttpSubmissionClient {
    client: Client,
    config: Arc<ApiConfig>,
}

impl HttpSubmissionClient {
    pub fn new(config: Arc<ApiConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl SubmissionClient for HttpSubmissionClient {
    async fn submit(&self, category: Category, content: &str) -> SubmissionOutcome {
        let payload = EntryPayload {
            entry_type: category,
            body: content,
        };

        let response = match self
            .client
            .post(self.config.base_url().clone())
            .headers(self.config.headers().clone())
            .json(&payload)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                let diagnostic = if e.is_timeout() {
                    format!("Request timeout: {e}")
                } else if e.is_connect() {
                    format!("Connection failed: {e}")
                } else {
                    format!("Request failed: {e}")
                };
                return SubmissionOutcome::transport_failure(diagnostic);
            }
        };

        let status = response.status();
        match response.text().await {
            Ok(body) => SubmissionOutcome::from_response(status.as_u16(), body),
            Err(e) => SubmissionOutcome::transport_failure(format!(
                "Failed to read response (HTTP {status}): {e}"
            )),
        }
    }
}
