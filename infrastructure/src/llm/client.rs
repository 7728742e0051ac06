//! OpenAI-compatible chat completions client.
//!
//! One client covers the three provider kinds the participants are run
//! against:
//!
//! | Kind | Endpoint | Auth |
//! |------|----------|------|
//! | `openai` | `{base_url}/v1/chat/completions` | `Authorization: Bearer` |
//! | `azure` | `{base_url}/openai/deployments/{model}/chat/completions?api-version=..` | `api-key` |
//! | `ollama` | `{base_url}/v1/chat/completions` | none |
//!
//! No retries: a failed call surfaces as [`LlmClientError`] and the caller
//! decides what that means for the conversation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LlmClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("No API key configured for provider {0}")]
    MissingApiKey(&'static str),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Empty response")]
    EmptyResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Azure,
    Ollama,
}

impl ProviderKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "openai" => Some(ProviderKind::OpenAi),
            "azure" => Some(ProviderKind::Azure),
            "ollama" => Some(ProviderKind::Ollama),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Azure => "azure",
            ProviderKind::Ollama => "ollama",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "https://api.openai.com",
            ProviderKind::Azure => "",
            ProviderKind::Ollama => "http://localhost:11434",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, ProviderKind::Ollama)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A chat model that turns a list of turns into one reply.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, LlmClientError>;
}

/// Resolved settings for [`ChatClient`].
#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    pub kind: ProviderKind,
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_version: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

pub struct ChatClient {
    config: ChatClientConfig,
    http: Client,
}

impl ChatClient {
    pub fn new(config: ChatClientConfig) -> Result<Self, LlmClientError> {
        if config.kind.requires_api_key() && config.api_key.is_none() {
            return Err(LlmClientError::MissingApiKey(config.kind.as_str()));
        }
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn endpoint_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        match self.config.kind {
            ProviderKind::OpenAi | ProviderKind::Ollama => {
                format!("{}/v1/chat/completions", base)
            }
            ProviderKind::Azure => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                base, self.config.model, self.config.api_version
            ),
        }
    }

    pub fn build_request_body(&self, turns: &[ChatTurn]) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = turns
            .iter()
            .map(|turn| {
                serde_json::json!({
                    "role": turn.role.as_str(),
                    "content": turn.content,
                })
            })
            .collect();

        serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "max_tokens": self.config.max_tokens,
        })
    }
}

#[async_trait]
impl ChatModel for ChatClient {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, LlmClientError> {
        let url = self.endpoint_url();
        debug!(model = %self.config.model, turns = turns.len(), "Chat completion request");

        let mut request = self.http.post(&url).json(&self.build_request_body(turns));
        if let Some(key) = &self.config.api_key {
            request = match self.config.kind {
                ProviderKind::Azure => request.header("api-key", key),
                _ => request.header("Authorization", format!("Bearer {}", key)),
            };
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;
        let content = extract_content(body)?;
        debug!(bytes = content.len(), "Chat completion received");
        Ok(content)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}

fn extract_content(response: ChatCompletionResponse) -> Result<String, LlmClientError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(LlmClientError::EmptyResponse)
}
