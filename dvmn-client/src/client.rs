//! HTTP long-polling client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Url;
use tracing::{debug, instrument};

use crate::error::PollError;
use crate::types::{PollResponse, Timestamp};

/// Production long-polling endpoint.
pub const DEFAULT_API_URL: &str = "https://dvmn.org/api/long_polling/";

/// How long a single request may wait for the server before giving up.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(60);

/// Source of review results; one call is one long-poll request.
#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Polls for attempts reviewed after `cursor` (`None` means "from now").
    async fn poll(&self, cursor: Option<Timestamp>) -> Result<PollResponse, PollError>;
}

/// Masks an API token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the token.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 || !token.is_ascii() {
        "***".to_string()
    } else {
        format!("{}***{}", &token[..7], &token[len - 4..])
    }
}

/// reqwest-based [`ReviewSource`] for the dvmn.org API.
#[derive(Clone)]
pub struct DvmnClient {
    http: reqwest::Client,
    api_url: Url,
    token: String,
}

impl DvmnClient {
    /// Client for the production endpoint with the default 60 s wait bound.
    pub fn new(token: String) -> Result<Self, PollError> {
        Self::with_options(token, DEFAULT_API_URL, DEFAULT_POLL_TIMEOUT)
    }

    /// Client for `api_url` whose requests give up after `poll_timeout`.
    pub fn with_options(
        token: String,
        api_url: &str,
        poll_timeout: Duration,
    ) -> Result<Self, PollError> {
        let api_url = Url::parse(api_url)
            .map_err(|e| PollError::Config(format!("invalid API URL {}: {}", api_url, e)))?;
        let http = reqwest::Client::builder()
            .timeout(poll_timeout)
            .build()
            .map_err(|e| PollError::Config(e.to_string()))?;
        debug!(
            api_url = %api_url,
            token = %mask_token(&token),
            timeout_secs = poll_timeout.as_secs(),
            "Review API client created"
        );
        Ok(Self {
            http,
            api_url,
            token,
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }
}

#[async_trait]
impl ReviewSource for DvmnClient {
    #[instrument(skip(self), fields(api_url = %self.api_url))]
    async fn poll(&self, cursor: Option<Timestamp>) -> Result<PollResponse, PollError> {
        let mut request = self
            .http
            .get(self.api_url.clone())
            .header(AUTHORIZATION, format!("Token {}", self.token));
        if let Some(cursor) = cursor {
            request = request.query(&[("timestamp", cursor.to_string())]);
        }

        let response = request.send().await.map_err(PollError::from_reqwest)?;
        let status = response.status();
        let body = response.text().await.map_err(PollError::from_reqwest)?;
        if !status.is_success() {
            return Err(PollError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PollResponse = serde_json::from_str(&body)?;
        debug!(next_cursor = %parsed.next_cursor(), "Poll response received");
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_options_rejects_invalid_url() {
        let result = DvmnClient::with_options("t".to_string(), "not a url", DEFAULT_POLL_TIMEOUT);
        assert!(matches!(result, Err(PollError::Config(_))));
    }

    #[test]
    fn test_new_uses_production_endpoint() {
        let client = DvmnClient::new("t".to_string()).unwrap();
        assert_eq!(client.api_url().as_str(), DEFAULT_API_URL);
    }
}
