//! Conversation history kept privately by each participant.
//!
//! - [`log::ConversationLog`]: append-only record in observation order
//! - [`window::ContextWindow`]: bounded view handed to content generators

pub mod log;
pub mod window;
