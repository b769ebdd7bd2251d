use serde::{Deserialize, Serialize};

use super::Severity;
use crate::domain::DomainError;

/// Structured verdict returned by an audit provider.
///
/// All four fields are required on the wire; deserialization fails when one is
/// missing or when `severity` is outside the closed [`Severity`] set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditResult {
    vulnerability: String,
    severity: Severity,
    remediation: String,
    explanation: String,
}

impl AuditResult {
    pub fn new(
        vulnerability: impl Into<String>,
        severity: Severity,
        remediation: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            vulnerability: vulnerability.into(),
            severity,
            remediation: remediation.into(),
            explanation: explanation.into(),
        }
    }

    /// Decode a provider's textual payload.
    ///
    /// An empty or syntactically invalid body is a [`DomainError::Decode`];
    /// valid JSON that does not match the result shape is a
    /// [`DomainError::MalformedResponse`].
    pub fn from_json(text: &str) -> Result<Self, DomainError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DomainError::decode("provider returned an empty body"));
        }

        let value: serde_json::Value = serde_json::from_str(trimmed)
            .map_err(|e| DomainError::decode(format!("response is not valid JSON: {e}")))?;

        serde_json::from_value(value)
            .map_err(|e| DomainError::malformed(format!("response does not match audit schema: {e}")))
    }

    pub fn vulnerability(&self) -> &str {
        &self.vulnerability
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn remediation(&self) -> &str {
        &self.remediation
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn summary(&self) -> String {
        format!("{} [{}]", self.vulnerability, self.severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_accepts_complete_object() {
        let body = r#"{"vulnerability":"None","severity":"LOW","remediation":"N/A","explanation":"No issues found."}"#;
        let result = AuditResult::from_json(body).unwrap();

        assert_eq!(result.vulnerability(), "None");
        assert_eq!(result.severity(), Severity::Low);
        assert_eq!(result.remediation(), "N/A");
        assert_eq!(result.explanation(), "No issues found.");
    }

    #[test]
    fn test_from_json_ignores_unknown_fields() {
        let body = r#"{"vulnerability":"Reentrancy","severity":"CRITICAL","remediation":"Checks-effects-interactions","explanation":"State updated after call","status":"DETECTED"}"#;
        let result = AuditResult::from_json(body).unwrap();
        assert_eq!(result.severity(), Severity::Critical);
    }

    #[test]
    fn test_from_json_empty_body_is_decode_error() {
        assert!(AuditResult::from_json("").unwrap_err().is_decode());
        assert!(AuditResult::from_json("   \n").unwrap_err().is_decode());
    }

    #[test]
    fn test_from_json_invalid_json_is_decode_error() {
        let err = AuditResult::from_json("{not json").unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_from_json_missing_field_is_malformed() {
        let body = r#"{"vulnerability":"XSS","severity":"HIGH","remediation":"Escape output"}"#;
        let err = AuditResult::from_json(body).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_from_json_out_of_enum_severity_is_malformed() {
        let body = r#"{"vulnerability":"XSS","severity":"SEVERE","remediation":"Escape output","explanation":"Unescaped input"}"#;
        let err = AuditResult::from_json(body).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_from_json_non_object_is_malformed() {
        let err = AuditResult::from_json("[1, 2, 3]").unwrap_err();
        assert!(err.is_malformed());
    }
}
