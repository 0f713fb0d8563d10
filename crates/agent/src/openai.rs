//! OpenAI-compatible chat completions client.
//!
//! Works against api.openai.com and any server speaking the same wire format
//! (Ollama's `/v1` endpoint included).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use petworld_core::config::LlmConfig;

use crate::llm::{CompletionRequest, LlmClient, LlmError};

const MAX_ERROR_BODY_CHARS: usize = 512;

pub struct OpenAiCompatibleClient {
    client: Client,
    endpoint: String,
    api_key: Option<SecretString>,
    model: String,
}

impl OpenAiCompatibleClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| LlmError::Configuration(format!("http client: {error}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.effective_base_url()),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_body<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: &request.system },
                ChatMessage { role: "user", content: &request.prompt },
            ],
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatibleClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let mut builder = self.client.post(&self.endpoint).json(&self.build_body(request));
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key.expose_secret());
        }

        let response = builder.send().await.map_err(|error| {
            if error.is_timeout() {
                LlmError::Transport(format!("request timeout: {error}"))
            } else {
                LlmError::Transport(format!("request failed: {error}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| LlmError::Transport(format!("failed to read response: {error}")))?;

        if !status.is_success() {
            return Err(LlmError::Status { status: status.as_u16(), body: truncate(&body) });
        }

        debug!(
            event_name = "agent.llm.completed",
            model = %self.model,
            response_bytes = body.len(),
            "chat completion received"
        );
        extract_content(&body)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn extract_content(body: &str) -> Result<String, LlmError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|error| LlmError::Decode(format!("{error} - body: {}", truncate(body))))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(LlmError::EmptyResponse)
}

fn truncate(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }
    let mut shortened: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    shortened.push_str("...");
    shortened
}
