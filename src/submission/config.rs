//! Process-wide settings for the remote entry API

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Url;
use thiserror::Error;

/// Header carrying the API credential
pub const API_KEY_HEADER: &str = "x-api-key";

/// Default endpoint for entry submissions
pub const DEFAULT_API_URL: &str = "https://vulkan.sumeetsaini.com/well";

#[derive(Debug, Error)]
pub enum ApiConfigError {
    #[error("Invalid API URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("API key is not a valid header value")]
    InvalidApiKey,
}

/// Endpoint plus the header set sent with every submission.
///
/// Built once at startup and shared read-only behind an `Arc`.
#[derive(Clone)]
pub struct ApiConfig {
    base_url: Url,
    headers: HeaderMap,
}

impl ApiConfig {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ApiConfigError> {
        let url = Url::parse(base_url).map_err(|e| ApiConfigError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiConfigError::InvalidUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }

        let mut key = HeaderValue::from_str(api_key).map_err(|_| ApiConfigError::InvalidApiKey)?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            base_url: url,
            headers,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

// Keeps the API key out of logs.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .finish()
    }
}
