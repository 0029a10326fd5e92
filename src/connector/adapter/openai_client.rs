use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::application::CompletionClient;
use crate::domain::{CompletionRequest, CompletionResponse, DomainError};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";
const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
/// Request timeout. The upstream API has no such bound; an explicit one keeps
/// a hung connection from blocking the loop forever.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the OpenAI Chat Completions API (and compatible endpoints).
///
/// Implements [`CompletionClient`] so the turn logic stays decoupled from
/// transport and serialization details.  The underlying connection pool is
/// reused across turns; it carries no correctness-relevant state.
///
/// Configuration comes from the environment:
///
/// ```text
/// OPENAI_API_KEY=sk-...                      (required)
/// OPENAI_BASE_URL=https://api.openai.com     (optional override)
/// ```
///
/// The API key is held for the lifetime of the client and is never logged.
#[derive(Debug)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    /// Full endpoint URL (base + COMPLETIONS_PATH).
    url: String,
}

impl OpenAiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let api_key: String = api_key.into();
        if api_key.is_empty() {
            return Err(DomainError::configuration("API key must not be empty"));
        }

        let base: String = base_url.into();
        let url = format!("{}{}", base.trim_end_matches('/'), COMPLETIONS_PATH);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            url,
        })
    }

    /// Construct from environment variables:
    ///
    /// | Variable          | Default                  | Purpose            |
    /// |-------------------|--------------------------|--------------------|
    /// | `OPENAI_API_KEY`  | — (required)             | Bearer credential  |
    /// | `OPENAI_BASE_URL` | `https://api.openai.com` | Compatible servers |
    ///
    /// Fails with a configuration error when the key is unset or empty so the
    /// application can refuse to start the loop.
    pub fn from_env(timeout: Duration) -> Result<Self, DomainError> {
        let key = Self::api_key_from_env()?;
        let base =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(key, base, timeout)
    }

    /// Read the bearer credential from `OPENAI_API_KEY`.
    ///
    /// Unset and empty are treated the same: the application must not start
    /// the loop without a credential.
    pub fn api_key_from_env() -> Result<String, DomainError> {
        std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                DomainError::configuration(
                    "OPENAI_API_KEY environment variable is not set. \
                     Please set your OpenAI API key before running the application.",
                )
            })
    }

    /// Parse a success body and pull out `choices[0].message.content`.
    ///
    /// Invalid JSON and a missing field are both surfaced as typed errors
    /// rather than being allowed to crash the loop.
    fn extract_reply(body: &str) -> Result<String, DomainError> {
        let response: CompletionResponse = serde_json::from_str(body)
            .map_err(|e| DomainError::malformed_response(format!("invalid JSON: {e}")))?;

        response
            .first_content()
            .map(|content| content.trim().to_string())
            .ok_or_else(|| {
                DomainError::malformed_response("missing field choices[0].message.content")
            })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, DomainError> {
        debug!("Sending completion request to {} (model {})", self.url, request.model());

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE_JSON)
            .json(request)
            .send()
            .await
            .map_err(|e| DomainError::transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            warn!("API returned {status}");
            return Err(DomainError::remote_rejected(status.as_u16(), body));
        }

        Self::extract_reply(&body)
    }
}
