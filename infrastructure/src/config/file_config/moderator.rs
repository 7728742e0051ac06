//! Moderator configuration from TOML (`[moderator]` section)

use serde::{Deserialize, Serialize};

/// Raw moderator configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModeratorConfig {
    /// Directory of assistant spec files (`*.json`)
    pub agents_dir: String,
    /// Model for the decision engine (overrides `provider.model`)
    pub model: Option<String>,
}

impl Default for FileModeratorConfig {
    fn default() -> Self {
        Self {
            agents_dir: "./agents".to_string(),
            model: None,
        }
    }
}
