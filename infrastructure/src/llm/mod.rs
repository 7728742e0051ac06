//! LLM adapters: an OpenAI-compatible chat client and the participant
//! roles built on it.

mod client;
mod decision_engine;
mod responder;

pub use client::{
    ChatClient, ChatClientConfig, ChatModel, ChatRole, ChatTurn, LlmClientError, ProviderKind,
};
pub use decision_engine::LlmDecisionEngine;
pub use responder::LlmResponder;
