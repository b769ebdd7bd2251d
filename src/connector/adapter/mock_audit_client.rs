use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::AuditClient;
use crate::domain::{AuditResult, DomainError};

/// Body returned when nothing is scripted.
pub const MOCK_DEFAULT_BODY: &str = r#"{"vulnerability":"None","severity":"LOW","remediation":"N/A","explanation":"No issues found."}"#;

/// One scripted provider reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Raw text payload, decoded like a real provider's.
    Body(String),
    /// The call itself fails.
    TransportError(String),
    /// The call never resolves.
    Hang,
}

impl MockReply {
    pub fn body(text: impl Into<String>) -> Self {
        Self::Body(text.into())
    }

    pub fn transport_error(msg: impl Into<String>) -> Self {
        Self::TransportError(msg.into())
    }
}

/// Offline [`AuditClient`] that plays back scripted replies in order and counts calls.
pub struct MockAuditClient {
    script: Mutex<VecDeque<MockReply>>,
    fallback: MockReply,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockAuditClient {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: MockReply::body(MOCK_DEFAULT_BODY),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Every call gets `reply` unless something else is scripted.
    pub fn always(reply: MockReply) -> Self {
        Self {
            fallback: reply,
            ..Self::new()
        }
    }

    pub fn with_script(replies: impl IntoIterator<Item = MockReply>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            ..Self::new()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn push(&self, reply: MockReply) {
        self.script.lock().await.push_back(reply);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockAuditClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditClient for MockAuditClient {
    async fn request_audit(&self, source_text: &str) -> Result<AuditResult, DomainError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let reply = self
            .script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        debug!(
            "MockAuditClient call #{call} ({} bytes): {:?}",
            source_text.len(),
            reply
        );

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            MockReply::Body(text) => AuditResult::from_json(&text),
            MockReply::TransportError(msg) => Err(DomainError::transport(msg)),
            MockReply::Hang => std::future::pending().await,
        }
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}
