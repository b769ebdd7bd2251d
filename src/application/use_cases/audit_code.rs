use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::application::AuditClient;
use crate::domain::{AuditRequest, AuditResult, DomainError};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Sends one [`AuditRequest`] to the configured provider.
pub struct AuditCodeUseCase {
    client: Arc<dyn AuditClient>,
    timeout: Option<Duration>,
}

impl AuditCodeUseCase {
    pub fn new(client: Arc<dyn AuditClient>) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    /// `None` waits for the provider indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    pub async fn execute(&self, request: &AuditRequest) -> Result<AuditResult, DomainError> {
        info!(
            "Auditing request {} ({} lines) with {}",
            request.id(),
            request.line_count(),
            self.client.provider_name()
        );

        let start_time = Instant::now();

        let call = self.client.request_audit(request.source_text());
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                DomainError::timeout(format!(
                    "{} did not answer within {:?}",
                    self.client.provider_name(),
                    limit
                ))
            })?,
            None => call.await,
        }?;

        let elapsed = start_time.elapsed();
        info!(
            "Audit {} completed in {:?}: {}",
            request.id(),
            elapsed,
            result.summary()
        );
        debug!("Audit {} explanation: {}", request.id(), result.explanation());

        Ok(result)
    }
}
