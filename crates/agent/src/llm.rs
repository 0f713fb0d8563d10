use async_trait::async_trait;
use thiserror::Error;

/// One chat completion: an instruction framing plus the user turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self { system: system.into(), prompt: prompt.into() }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LlmError {
    #[error("llm transport failure: {0}")]
    Transport(String),
    #[error("llm service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("llm response could not be decoded: {0}")]
    Decode(String),
    #[error("llm returned an empty response")]
    EmptyResponse,
    #[error("llm client misconfigured: {0}")]
    Configuration(String),
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}
