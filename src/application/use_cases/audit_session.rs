use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::AuditCodeUseCase;
use crate::domain::{AuditRequestState, SubmitRejection};

struct Inner {
    state: AuditRequestState,
    in_flight: Option<CancellationToken>,
}

/// Submission state owned by one view.
///
/// At most one audit is in flight per session: a `submit` arriving while
/// another is pending is rejected before it reaches the provider. Every
/// provider failure ends in [`AuditRequestState::Failed`]; nothing propagates
/// past `submit`.
///
/// The lock is never held across an await.
pub struct AuditSession {
    use_case: AuditCodeUseCase,
    inner: Mutex<Inner>,
}

/// Returns the session to `Idle` if a `submit` future is dropped while its
/// request is still the pending one.
struct PendingGuard<'a> {
    inner: &'a Mutex<Inner>,
    request_id: Uuid,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut inner = lock(self.inner);
        if inner.state.pending_request_id() == Some(self.request_id) {
            inner.state.cancel();
            inner.in_flight = None;
            info!("Audit {} abandoned before completion", self.request_id);
        }
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AuditSession {
    pub fn new(use_case: AuditCodeUseCase) -> Self {
        Self {
            use_case,
            inner: Mutex::new(Inner {
                state: AuditRequestState::new(),
                in_flight: None,
            }),
        }
    }

    /// Submit `text` and wait for the outcome, returning the state it settled in.
    ///
    /// A cancelled submission returns the state at the time it was abandoned.
    /// Dropping the returned future before it completes cancels the request.
    pub async fn submit(&self, text: &str) -> Result<AuditRequestState, SubmitRejection> {
        let (request, token) = {
            let mut inner = lock(&self.inner);
            let request = match inner.state.begin(text) {
                Ok(request) => request,
                Err(rejection) => {
                    debug!("Submission ignored: {}", rejection);
                    return Err(rejection);
                }
            };
            let token = CancellationToken::new();
            inner.in_flight = Some(token.clone());
            (request, token)
        };
        let _guard = PendingGuard {
            inner: &self.inner,
            request_id: request.id(),
        };

        let outcome = tokio::select! {
            _ = token.cancelled() => None,
            outcome = self.use_case.execute(&request) => Some(outcome),
        };

        if let Some(Err(ref e)) = outcome {
            warn!(
                "Audit {} via {} failed: {}",
                request.id(),
                self.use_case.provider_name(),
                e
            );
        }

        let mut inner = lock(&self.inner);
        match outcome {
            Some(outcome) => {
                if inner.state.resolve(request.id(), outcome) {
                    inner.in_flight = None;
                }
            }
            None => info!("Audit {} cancelled", request.id()),
        }

        // Released before `_guard` runs; the request is no longer pending by then.
        let settled = inner.state.clone();
        drop(inner);
        Ok(settled)
    }

    /// Return a failed session to idle without resubmitting.
    pub fn reset(&self) -> bool {
        lock(&self.inner).state.reset()
    }

    /// Abandon the in-flight audit, if any. The provider is not notified.
    pub fn cancel(&self) -> bool {
        let mut inner = lock(&self.inner);
        match inner.state.cancel() {
            Some(request_id) => {
                if let Some(token) = inner.in_flight.take() {
                    token.cancel();
                }
                debug!("Cancelling audit {}", request_id);
                true
            }
            None => false,
        }
    }

    pub fn state(&self) -> AuditRequestState {
        lock(&self.inner).state.clone()
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.inner).state.is_pending()
    }

    pub fn provider_name(&self) -> &str {
        self.use_case.provider_name()
    }
}
