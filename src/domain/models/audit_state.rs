use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{is_blank, AuditRequest, AuditResult};
use crate::domain::DomainError;

/// The only message a failed submission ever shows. Causes are logged, not surfaced.
pub const GENERIC_FAILURE_MESSAGE: &str = "System failure: Check API configuration or connection.";

/// Why a submission was refused without leaving the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    BlankInput,
    AlreadyPending,
}

impl std::fmt::Display for SubmitRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitRejection::BlankInput => write!(f, "input is empty"),
            SubmitRejection::AlreadyPending => write!(f, "an audit is already in flight"),
        }
    }
}

/// Lifecycle of the single audit a view may have in flight.
///
/// ```text
/// Idle ──submit──▶ Pending ──ok──▶ Succeeded ──submit──▶ Pending
///                     │ └──err──▶ Failed ──submit──▶ Pending
///                     └─cancel─▶ Idle      └──reset──▶ Idle
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AuditRequestState {
    #[default]
    Idle,
    Pending {
        request_id: Uuid,
    },
    Succeeded {
        result: AuditResult,
    },
    Failed {
        message: String,
    },
}

impl AuditRequestState {
    pub fn new() -> Self {
        Self::Idle
    }

    /// Guarded transition into `Pending`. Blank text and an outstanding request
    /// both leave the state untouched.
    pub fn begin(&mut self, text: &str) -> Result<AuditRequest, SubmitRejection> {
        if self.is_pending() {
            return Err(SubmitRejection::AlreadyPending);
        }
        if is_blank(text) {
            return Err(SubmitRejection::BlankInput);
        }

        let request = AuditRequest::new(text).map_err(|_| SubmitRejection::BlankInput)?;
        *self = Self::Pending {
            request_id: request.id(),
        };
        Ok(request)
    }

    /// Record the provider outcome for `request_id`.
    ///
    /// Returns `false` and changes nothing when that request is no longer the
    /// pending one (it was cancelled, or superseded after a cancel).
    pub fn resolve(
        &mut self,
        request_id: Uuid,
        outcome: Result<AuditResult, DomainError>,
    ) -> bool {
        if self.pending_request_id() != Some(request_id) {
            return false;
        }

        *self = match outcome {
            Ok(result) => Self::Succeeded { result },
            Err(_) => Self::Failed {
                message: GENERIC_FAILURE_MESSAGE.to_string(),
            },
        };
        true
    }

    /// The retry affordance: `Failed` back to `Idle`.
    pub fn reset(&mut self) -> bool {
        if matches!(self, Self::Failed { .. }) {
            *self = Self::Idle;
            return true;
        }
        false
    }

    /// Abandon the pending request, returning its id.
    pub fn cancel(&mut self) -> Option<Uuid> {
        let id = self.pending_request_id()?;
        *self = Self::Idle;
        Some(id)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn pending_request_id(&self) -> Option<Uuid> {
        match self {
            Self::Pending { request_id } => Some(*request_id),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&AuditResult> {
        match self {
            Self::Succeeded { result } => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending { .. } => "pending",
            Self::Succeeded { .. } => "succeeded",
            Self::Failed { .. } => "failed",
        }
    }
}

impl std::fmt::Display for AuditRequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
