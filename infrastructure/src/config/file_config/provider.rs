//! LLM provider configuration from TOML (`[provider]` section)

use crate::config::validation::{ConfigIssue, ConfigIssueCode};
use crate::llm::{ChatClientConfig, ProviderKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw provider configuration from TOML
///
/// ```toml
/// [provider]
/// kind = "azure"
/// base_url = "https://my-resource.openai.azure.com"
/// api_key_env = "AZURE_OPENAI_API_KEY"
/// model = "gpt-4o-mini"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// `openai`, `azure` or `ollama`
    pub kind: String,
    /// API base URL; the provider's default when unset
    pub base_url: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Direct API key (not recommended; use the env var instead)
    pub api_key: Option<String>,
    /// Azure OpenAI `api-version` query parameter
    pub api_version: String,
    /// Model name (Azure: deployment name)
    pub model: String,
    /// Max tokens per reply
    pub max_tokens: u32,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            kind: "openai".to_string(),
            base_url: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            api_version: "2024-06-01".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 4096,
            timeout_secs: 120,
        }
    }
}

impl FileProviderConfig {
    /// Parse `kind`, falling back to OpenAI with a warning.
    pub fn parse_kind(&self) -> (ProviderKind, Vec<ConfigIssue>) {
        match ProviderKind::parse(&self.kind) {
            Some(kind) => (kind, vec![]),
            None => (
                ProviderKind::default(),
                vec![ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "provider.kind".to_string(),
                        value: self.kind.clone(),
                        valid_values: vec![
                            "openai".to_string(),
                            "azure".to_string(),
                            "ollama".to_string(),
                        ],
                    },
                    format!(
                        "provider.kind: unknown value '{}', falling back to 'openai'",
                        self.kind
                    ),
                )],
            ),
        }
    }

    /// The configured key, or the value of `api_key_env`.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.is_empty())
    }

    /// Client settings; `model_override` replaces `model` when given.
    pub fn to_client_config(&self, model_override: Option<&str>) -> ChatClientConfig {
        let (kind, _) = self.parse_kind();
        ChatClientConfig {
            kind,
            base_url: self
                .base_url
                .clone()
                .unwrap_or_else(|| kind.default_base_url().to_string()),
            api_key: self.resolve_api_key(),
            api_version: self.api_version.clone(),
            model: model_override.unwrap_or(&self.model).to_string(),
            max_tokens: self.max_tokens,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let (kind, mut issues) = self.parse_kind();

        if self.model.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyValue {
                    field: "provider.model".to_string(),
                },
                "provider.model cannot be empty",
            ));
        }
        if kind == ProviderKind::Azure && self.base_url.is_none() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyValue {
                    field: "provider.base_url".to_string(),
                },
                "provider.base_url is required for azure",
            ));
        }
        if self.timeout_secs == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidConstraint {
                    field: "provider.timeout_secs".to_string(),
                },
                "provider.timeout_secs is 0; every request will time out",
            ));
        }

        issues
    }
}
