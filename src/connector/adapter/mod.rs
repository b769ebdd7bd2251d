mod anthropic_client;
mod audit_prompt;
mod chat_audit_client;
mod chat_client;
mod gemini_client;
mod mock_audit_client;
mod provider_http;

pub use anthropic_client::AnthropicClient;
pub use audit_prompt::{audit_response_schema, build_audit_prompt};
pub use chat_audit_client::*;
pub use chat_client::*;
pub use gemini_client::GeminiClient;
pub use mock_audit_client::*;
