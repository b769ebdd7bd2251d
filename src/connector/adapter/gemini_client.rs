use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::audit_prompt::{audit_response_schema, build_audit_prompt};
use super::provider_http::status_error;
use crate::application::AuditClient;
use crate::domain::{AuditResult, DomainError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const API_VERSION_PATH: &str = "/v1beta/models";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

/// The slice of the `generateContent` response envelope we read.
#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate; empty when there is none.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// [`AuditClient`] backed by the Google Generative Language `generateContent`
/// endpoint with JSON structured output.
///
/// Configuration is read from the environment by [`GeminiClient::from_env`]:
///
/// | Variable          | Default                                     |
/// |-------------------|---------------------------------------------|
/// | `GEMINI_API_KEY`  | falls back to `API_KEY`, otherwise unset    |
/// | `GEMINI_MODEL`    | `gemini-3-flash-preview`                    |
/// | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com` |
///
/// A missing key is reported as [`DomainError::Authentication`] when an audit
/// is requested; no request is sent.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base: String = base_url.into();
        Self {
            client: reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.into(),
            base_url: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> Self {
        let key = resolve_api_key(
            std::env::var("GEMINI_API_KEY").ok(),
            std::env::var("API_KEY").ok(),
        );
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(key, model, base)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}/{}:generateContent",
            self.base_url, API_VERSION_PATH, self.model
        )
    }

    fn build_request<'a>(&self, prompt: &'a str) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: audit_response_schema(),
            },
        }
    }
}

/// First non-blank of the dedicated key and the generic fallback.
fn resolve_api_key(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    primary
        .filter(|k| !k.trim().is_empty())
        .or_else(|| fallback.filter(|k| !k.trim().is_empty()))
}

#[async_trait]
impl AuditClient for GeminiClient {
    async fn request_audit(&self, source_text: &str) -> Result<AuditResult, DomainError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            DomainError::authentication("GeminiClient: no API key configured (set GEMINI_API_KEY)")
        })?;

        let prompt = build_audit_prompt(source_text);
        let request = self.build_request(&prompt);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::transport(format!("GeminiClient: request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(status_error("GeminiClient", response).await);
        }

        let envelope: GenerateContentResponse = response.json().await.map_err(|e| {
            DomainError::decode(format!("GeminiClient: failed to parse response envelope: {e}"))
        })?;

        let text = envelope.text();
        debug!("GeminiClient raw response: {text}");
        AuditResult::from_json(&text)
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_declares_json_output_and_schema() {
        let client = GeminiClient::new(Some("key".into()), DEFAULT_MODEL, DEFAULT_BASE_URL);
        let prompt = build_audit_prompt("fn main() {}");
        let body = serde_json::to_value(client.build_request(&prompt)).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], prompt.as_str());
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            body["generationConfig"]["responseSchema"]["required"]
                .as_array()
                .unwrap()
                .len(),
            4
        );
    }

    #[test]
    fn endpoint_includes_model_and_trims_slash() {
        let client = GeminiClient::new(None, "gemini-test", "http://localhost:8080/");
        assert_eq!(
            client.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn envelope_text_joins_parts_of_first_candidate() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]}},{"content":{"parts":[{"text":"ignored"}]}}]}"#;
        let envelope: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.text(), "{\"a\":1}");
    }

    #[test]
    fn envelope_without_candidates_yields_empty_text() {
        let envelope: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(envelope.text(), "");
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let client = GeminiClient::new(Some("  ".into()), DEFAULT_MODEL, DEFAULT_BASE_URL);
        assert!(!client.has_api_key());
    }

    #[test]
    fn blank_primary_key_falls_back() {
        assert_eq!(
            resolve_api_key(Some(String::new()), Some("real-key".into())),
            Some("real-key".to_string())
        );
        assert_eq!(
            resolve_api_key(None, Some("real-key".into())),
            Some("real-key".to_string())
        );
        assert_eq!(
            resolve_api_key(Some("gemini".into()), Some("real-key".into())),
            Some("gemini".to_string())
        );
        assert_eq!(resolve_api_key(Some(" ".into()), Some("".into())), None);
    }

    #[tokio::test]
    async fn missing_key_is_authentication_error() {
        // Port 9 (discard) is never contacted: the key check comes first.
        let client = GeminiClient::new(None, DEFAULT_MODEL, "http://127.0.0.1:9");
        let err = client.request_audit("fn main() {}").await.unwrap_err();
        assert!(err.is_authentication());
    }
}
