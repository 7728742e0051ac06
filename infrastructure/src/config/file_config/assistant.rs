//! Assistant configuration from TOML (`[assistant]` section)

use crate::config::validation::{ConfigIssue, ConfigIssueCode};
use noa_domain::ContextWindow;
use serde::{Deserialize, Serialize};

/// Raw assistant configuration from TOML
///
/// ```toml
/// [assistant]
/// id = "pdf-assistant"
/// description = "Answers questions about the loaded PDF documents"
/// context_max_bytes = 160000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAssistantConfig {
    /// Participant identity (normalized before use)
    pub id: Option<String>,
    /// What the assistant does; used in its system prompt
    pub description: String,
    /// Byte budget of the history handed to the model
    pub context_max_bytes: usize,
    /// Message cap of the history handed to the model; unlimited when unset
    pub context_max_messages: Option<usize>,
}

impl Default for FileAssistantConfig {
    fn default() -> Self {
        Self {
            id: None,
            description: String::new(),
            context_max_bytes: ContextWindow::default().max_bytes(),
            context_max_messages: None,
        }
    }
}

impl FileAssistantConfig {
    /// Convert to a domain `ContextWindow`, returning validation issues.
    ///
    /// A zero budget falls back to the default window.
    pub fn to_context_window(&self) -> (ContextWindow, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let defaults = ContextWindow::default();

        let max_bytes = if self.context_max_bytes == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidConstraint {
                    field: "assistant.context_max_bytes".to_string(),
                },
                format!(
                    "assistant.context_max_bytes must be positive, using {}",
                    defaults.max_bytes()
                ),
            ));
            defaults.max_bytes()
        } else {
            self.context_max_bytes
        };

        let max_messages = match self.context_max_messages {
            Some(0) => {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::InvalidConstraint {
                        field: "assistant.context_max_messages".to_string(),
                    },
                    "assistant.context_max_messages must be positive, ignoring it",
                ));
                defaults.max_messages()
            }
            Some(n) => n,
            None => defaults.max_messages(),
        };

        (ContextWindow::new(max_messages, max_bytes), issues)
    }
}
