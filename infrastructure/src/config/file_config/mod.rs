//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to runtime settings by the
//! binary.

mod assistant;
mod logging;
mod moderator;
mod provider;
mod transport;

pub use assistant::FileAssistantConfig;
pub use logging::FileLoggingConfig;
pub use moderator::FileModeratorConfig;
pub use provider::FileProviderConfig;
pub use transport::FileTransportConfig;

use super::validation::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Hub endpoint and shared space
    pub transport: FileTransportConfig,
    /// Moderator settings
    pub moderator: FileModeratorConfig,
    /// Assistant participant settings
    pub assistant: FileAssistantConfig,
    /// Chat model provider shared by moderator and assistants
    pub provider: FileProviderConfig,
    /// Transcript settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks:
    /// 1. Empty endpoint or space
    /// 2. Provider kind and model
    /// 3. Assistant context budgets
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Transport
        for (field, value) in [
            ("transport.endpoint", &self.transport.endpoint),
            ("transport.space", &self.transport.space),
        ] {
            if value.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyValue {
                        field: field.to_string(),
                    },
                    format!("{} cannot be empty", field),
                ));
            }
        }

        // 2. Provider (and the moderator's model override)
        issues.extend(self.provider.validate());
        if self
            .moderator
            .model
            .as_deref()
            .is_some_and(|m| m.trim().is_empty())
        {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::EmptyValue {
                    field: "moderator.model".to_string(),
                },
                "moderator.model is empty, using provider.model",
            ));
        }

        // 3. Context window
        issues.extend(self.assistant.to_context_window().1);

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ProviderKind;
    use crate::transport::DEFAULT_ENDPOINT;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[transport]
endpoint = "10.0.0.5:9000"
space = "research"

[moderator]
agents_dir = "/etc/noa/agents"
model = "gpt-4o"

[assistant]
id = "PDF Assistant"
description = "Answers questions about PDFs"
context_max_bytes = 8000
context_max_messages = 50

[provider]
kind = "ollama"
model = "llama3.2"
timeout_secs = 30

[logging]
transcript = "/tmp/noa.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.transport.endpoint, "10.0.0.5:9000");
        assert_eq!(config.transport.space, "research");
        assert_eq!(config.moderator.agents_dir, "/etc/noa/agents");
        assert_eq!(config.moderator.model, Some("gpt-4o".to_string()));
        assert_eq!(config.assistant.id, Some("PDF Assistant".to_string()));
        assert_eq!(config.assistant.context_max_messages, Some(50));
        assert_eq!(config.provider.parse_kind().0, ProviderKind::Ollama);
        assert_eq!(config.provider.timeout_secs, 30);
        assert_eq!(config.logging.transcript, Some("/tmp/noa.jsonl".to_string()));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[transport]
space = "other"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.transport.space, "other");
        // Defaults should apply
        assert_eq!(config.transport.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.moderator.agents_dir, "./agents");
        assert_eq!(config.provider.model, "gpt-4o-mini");
        assert!(config.logging.transcript.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_all_issues() {
        let toml_str = r#"
[transport]
space = " "

[moderator]
model = ""

[assistant]
context_max_bytes = 0

[provider]
kind = "bedrock"
model = ""
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        let fields: Vec<String> = issues
            .iter()
            .map(|issue| match &issue.code {
                ConfigIssueCode::EmptyValue { field }
                | ConfigIssueCode::InvalidEnumValue { field, .. }
                | ConfigIssueCode::InvalidConstraint { field } => field.clone(),
            })
            .collect();

        assert_eq!(
            fields,
            vec![
                "transport.space",
                "provider.kind",
                "provider.model",
                "moderator.model",
                "assistant.context_max_bytes",
            ]
        );
    }
}
