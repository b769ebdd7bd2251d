use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// One user submission of source text to be audited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRequest {
    id: Uuid,
    source_text: String,
}

impl AuditRequest {
    /// Fails with [`DomainError::InvalidInput`] when `source_text` is empty or
    /// whitespace only.
    pub fn new(source_text: impl Into<String>) -> Result<Self, DomainError> {
        let source_text = source_text.into();
        if is_blank(&source_text) {
            return Err(DomainError::invalid_input("source text is empty"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            source_text,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn line_count(&self) -> usize {
        self.source_text.lines().count()
    }
}

pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
