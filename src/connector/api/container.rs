use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cli::ProviderKind;
use crate::{
    AnthropicClient, AuditClient, AuditCodeUseCase, AuditSession, ChatAuditClient, GeminiClient,
    MockAuditClient,
};

pub struct ContainerConfig {
    pub provider: ProviderKind,
    /// Overrides the provider's model from the environment.
    pub model: Option<String>,
    /// Overrides the provider's base URL from the environment.
    pub base_url: Option<String>,
    /// `None` waits for the provider indefinitely.
    pub timeout: Option<Duration>,
}

pub struct Container {
    audit_client: Arc<dyn AuditClient>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Self {
        let audit_client: Arc<dyn AuditClient> = match config.provider {
            ProviderKind::Gemini => {
                let mut client = GeminiClient::from_env();
                if let Some(model) = config.model.as_deref() {
                    client = client.with_model(model);
                }
                if let Some(base_url) = config.base_url.as_deref() {
                    client = client.with_base_url(base_url);
                }
                if !client.has_api_key() {
                    warn!("GEMINI_API_KEY is not set; audits will fail until it is configured");
                }
                debug!("Using Gemini audit provider (model {})", client.model());
                Arc::new(client)
            }
            ProviderKind::Anthropic => {
                let mut client = AnthropicClient::from_env();
                if let Some(model) = config.model.as_deref() {
                    client = client.with_model(model);
                }
                if let Some(base_url) = config.base_url.as_deref() {
                    client = client.with_base_url(base_url);
                }
                debug!("Using Anthropic-compatible audit provider at {}", client.base_url());
                Arc::new(ChatAuditClient::new(Arc::new(client), "anthropic"))
            }
            ProviderKind::Mock => {
                debug!("Using mock audit provider");
                Arc::new(MockAuditClient::new())
            }
        };

        Self::with_client(audit_client, config)
    }

    /// Wire an already-built provider, bypassing environment lookup.
    pub fn with_client(audit_client: Arc<dyn AuditClient>, config: ContainerConfig) -> Self {
        Self {
            audit_client,
            config,
        }
    }

    pub fn audit_use_case(&self) -> AuditCodeUseCase {
        AuditCodeUseCase::new(self.audit_client.clone()).with_timeout(self.config.timeout)
    }

    /// A fresh session, as owned by one view.
    pub fn session(&self) -> AuditSession {
        AuditSession::new(self.audit_use_case())
    }
}
