pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use cli::{Commands, OutputFormat, ProviderKind};

pub use application::{AuditClient, AuditCodeUseCase, AuditSession, DEFAULT_TIMEOUT};

pub use connector::{
    AnthropicClient, ChatAuditClient, ChatClient, GeminiClient, MockAuditClient, MockReply,
    MOCK_DEFAULT_BODY,
};

pub use domain::{
    AuditRequest, AuditRequestState, AuditResult, DomainError, Severity, SubmitRejection,
    GENERIC_FAILURE_MESSAGE, SAMPLE_SNIPPET,
};
