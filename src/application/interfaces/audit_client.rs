use async_trait::async_trait;

use crate::domain::{AuditResult, DomainError};

/// A provider that audits a snippet of source text and returns a structured verdict.
///
/// Implementors own transport, prompt construction and response decoding. A
/// payload that is empty or not JSON must come back as [`DomainError::Decode`];
/// one that parses but breaks the result shape as
/// [`DomainError::MalformedResponse`].
#[async_trait]
pub trait AuditClient: Send + Sync {
    /// Single attempt; no retry.
    async fn request_audit(&self, source_text: &str) -> Result<AuditResult, DomainError>;

    fn provider_name(&self) -> &str;
}
