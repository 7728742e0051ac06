//! Transport configuration from TOML (`[transport]` section)

use crate::transport::DEFAULT_ENDPOINT;
use serde::{Deserialize, Serialize};

/// Raw transport configuration from TOML
///
/// ```toml
/// [transport]
/// endpoint = "127.0.0.1:46357"
/// space = "chat"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTransportConfig {
    /// Hub address participants connect to (and the hub listens on)
    pub endpoint: String,
    /// Shared space joined by every participant
    pub space: String,
}

impl Default for FileTransportConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            space: "chat".to_string(),
        }
    }
}
