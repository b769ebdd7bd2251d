use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::provider_http::status_error;
use crate::connector::adapter::ChatClient;
use crate::domain::DomainError;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-haiku-4-5";
const MESSAGES_PATH: &str = "/v1/messages";
const API_VERSION: &str = "2023-06-01";
/// Room for the four-field verdict plus a paragraph of explanation.
const MAX_TOKENS: u32 = 1024;
const REACHABILITY_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserTurn<'a>; 1],
}

#[derive(Serialize)]
struct UserTurn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<TextBlock>,
}

/// Non-text blocks deserialize with an empty `text`.
#[derive(Deserialize)]
struct TextBlock {
    #[serde(default)]
    text: String,
}

/// Chat transport for the audit prompt over the Anthropic Messages API.
///
/// Any server speaking that API works, so `ANTHROPIC_BASE_URL` can point at a
/// local LM Studio instance and run audits offline. Auditing goes through
/// [`super::ChatAuditClient`], which supplies the schema in the system prompt.
///
/// An unreachable server is reported as [`DomainError::Transport`] within
/// two seconds: each call is preceded by a `HEAD /` reachability check.
pub struct AnthropicClient {
    http: reqwest::Client,
    reachability: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            reachability: reqwest::Client::builder()
                .connect_timeout(REACHABILITY_TIMEOUT)
                .timeout(REACHABILITY_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Reads `ANTHROPIC_BASE_URL`, `ANTHROPIC_MODEL` and `ANTHROPIC_API_KEY`.
    /// The key may stay empty for local servers; the hosted API answers 401,
    /// which surfaces as [`DomainError::Authentication`].
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            std::env::var("ANTHROPIC_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        )
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn ensure_reachable(&self) -> Result<(), DomainError> {
        // Any HTTP status counts as reachable.
        match self.reachability.head(format!("{}/", self.base_url)).send().await {
            Err(e) if e.is_connect() || e.is_timeout() => Err(DomainError::transport(format!(
                "AnthropicClient: server not reachable at {}: {e}",
                self.base_url
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ChatClient for AnthropicClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, DomainError> {
        self.ensure_reachable().await?;

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system,
            messages: [UserTurn {
                role: "user",
                content: user,
            }],
        };

        let response = self
            .http
            .post(format!("{}{MESSAGES_PATH}", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::transport(format!("AnthropicClient: request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(status_error("AnthropicClient", response).await);
        }

        let reply: MessagesResponse = response.json().await.map_err(|e| {
            DomainError::decode(format!("AnthropicClient: unreadable Messages reply: {e}"))
        })?;

        Ok(reply.content.into_iter().map(|b| b.text).collect())
    }

    fn model(&self) -> &str {
        &self.model
    }
}
