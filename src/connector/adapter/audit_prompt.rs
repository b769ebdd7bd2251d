use serde_json::{json, Value};

use crate::domain::Severity;

/// Instruction shared by every provider. The snippet is appended verbatim.
const AUDIT_INSTRUCTION: &str = "\
Perform a professional security audit on the following code snippet. \
Identify one primary vulnerability if it exists, explain its severity, and provide a remediation. \
If no obvious vulnerability, explain the best security practices for this context. \
Output in JSON format only.";

/// Build the user prompt embedding `source_text`.
pub fn build_audit_prompt(source_text: &str) -> String {
    format!("{AUDIT_INSTRUCTION} Code: \n{source_text}")
}

/// Structured-output schema in the Generative Language `Schema` dialect
/// (upper-case type names, `enum` on string properties).
pub fn audit_response_schema() -> Value {
    let severities: Vec<&str> = Severity::ALL.iter().map(|s| s.as_str()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "vulnerability": { "type": "STRING", "description": "Name of the vulnerability found" },
            "severity": { "type": "STRING", "enum": severities },
            "remediation": { "type": "STRING", "description": "How to fix the issue" },
            "explanation": { "type": "STRING", "description": "Detailed explanation" }
        },
        "required": ["vulnerability", "severity", "remediation", "explanation"]
    })
}

/// System prompt for chat-style providers that have no schema parameter.
pub fn chat_system_prompt() -> String {
    format!(
        "You are an application security auditor.\n\
         Reply with a single JSON object and nothing else: no prose, no markdown, no code fences.\n\
         The object must have exactly these string properties, all required:\n\
         - \"vulnerability\": name of the vulnerability found, or \"None\"\n\
         - \"severity\": one of {}\n\
         - \"remediation\": how to fix the issue\n\
         - \"explanation\": detailed explanation",
        Severity::ALL
            .iter()
            .map(|s| format!("\"{}\"", s.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    )
}
