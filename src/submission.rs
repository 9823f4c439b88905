//! Submission client abstraction
//!
//! Forwards one entry to the remote API and normalizes whatever happens
//! into a [`SubmissionOutcome`]. Nothing here returns an error: every
//! failure mode is an outcome value.

mod config;
mod http;
mod types;

pub use config::{ApiConfig, DEFAULT_API_URL};
pub use http::HttpSubmissionClient;
pub use types::{Category, SubmissionOutcome};

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for entry submission
#[async_trait]
pub trait SubmissionClient: Send + Sync {
    /// Make exactly one submission attempt
    async fn submit(&self, category: Category, content: &str) -> SubmissionOutcome;
}

#[async_trait]
impl<T: SubmissionClient + ?Sized> SubmissionClient for Arc<T> {
    async fn submit(&self, category: Category, content: &str) -> SubmissionOutcome {
        (**self).submit(category, content).await
    }
}

/// Logging wrapper for submission clients
pub struct LoggingSubmissionClient {
    inner: Arc<dyn SubmissionClient>,
}

impl LoggingSubmissionClient {
    pub fn new(inner: Arc<dyn SubmissionClient>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl SubmissionClient for LoggingSubmissionClient {
    async fn submit(&self, category: Category, content: &str) -> SubmissionOutcome {
        let start = std::time::Instant::now();
        let outcome = self.inner.submit(category, content).await;
        let duration = start.elapsed();

        match &outcome {
            SubmissionOutcome::Accepted { status_code, .. } => {
                tracing::info!(
                    category = %category,
                    status = status_code,
                    duration_ms = %duration.as_millis(),
                    "Entry submitted"
                );
            }
            SubmissionOutcome::Rejected { status_code, .. } => {
                tracing::warn!(
                    category = %category,
                    status = status_code,
                    duration_ms = %duration.as_millis(),
                    "Entry rejected by API"
                );
            }
            SubmissionOutcome::TransportFailure { diagnostic } => {
                tracing::error!(
                    category = %category,
                    duration_ms = %duration.as_millis(),
                    error = %diagnostic,
                    "Entry submission failed"
                );
            }
        }

        outcome
    }
}
