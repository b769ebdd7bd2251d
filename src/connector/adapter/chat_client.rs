use async_trait::async_trait;

use crate::domain::DomainError;

/// Sends chat-style prompts to an LLM and returns the text reply.
///
/// Implementors own transport and vendor API details; [`super::ChatAuditClient`]
/// turns any of them into an audit provider.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a `system` context message followed by a `user` prompt and return
    /// the assistant's response text.
    async fn complete(&self, system: &str, user: &str) -> Result<String, DomainError>;

    fn model(&self) -> &str;
}
