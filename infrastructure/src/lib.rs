//! Infrastructure layer for noa
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer:
//!
//! - `transport`: TCP hub broker, hub client and in-memory bus
//! - `roster`: assistant spec directory loader
//! - `llm`: OpenAI-compatible chat client, decision engine and responder
//! - `logging`: JSONL transcript writer
//! - `config`: configuration file loading

pub mod config;
pub mod llm;
pub mod logging;
pub mod roster;
pub mod transport;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigLoader, FileConfig, Severity};
pub use llm::{ChatClient, ChatClientConfig, LlmClientError, LlmDecisionEngine, LlmResponder};
pub use logging::JsonlConversationLogger;
pub use roster::DirectoryRosterSource;
pub use transport::{DEFAULT_ENDPOINT, HubServer, HubTransport, InMemoryBus, InMemoryTransport};
