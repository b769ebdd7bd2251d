use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::audit_prompt::{build_audit_prompt, chat_system_prompt};
use crate::application::AuditClient;
use crate::connector::adapter::ChatClient;
use crate::domain::{AuditResult, DomainError};

/// [`AuditClient`] on top of any [`ChatClient`].
///
/// Chat endpoints have no structured-output parameter, so the schema travels in
/// the system prompt and the reply is trimmed to its outermost `{…}` block
/// before decoding. Models occasionally wrap JSON in prose or code fences.
pub struct ChatAuditClient {
    chat: Arc<dyn ChatClient>,
    provider: String,
    system_prompt: String,
}

impl ChatAuditClient {
    pub fn new(chat: Arc<dyn ChatClient>, provider: impl Into<String>) -> Self {
        Self {
            chat,
            provider: provider.into(),
            system_prompt: chat_system_prompt(),
        }
    }

    /// The outermost JSON object in `text`, or `text` itself when there is none
    /// so the decoder reports the failure.
    fn extract_object(text: &str) -> &str {
        match (text.find('{'), text.rfind('}')) {
            (Some(s), Some(e)) if s < e => &text[s..=e],
            _ => text,
        }
    }
}

#[async_trait]
impl AuditClient for ChatAuditClient {
    async fn request_audit(&self, source_text: &str) -> Result<AuditResult, DomainError> {
        let prompt = build_audit_prompt(source_text);
        let reply = self.chat.complete(&self.system_prompt, &prompt).await?;
        debug!("{} ({}) raw response: {reply}", self.provider, self.chat.model());
        AuditResult::from_json(Self::extract_object(&reply))
    }

    fn provider_name(&self) -> &str {
        &self.provider
    }
}
