//! Domain layer for noa (network of assistants)
//!
//! This crate contains the turn-taking rules shared by every participant.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Shared channel
//!
//! Participants (a moderator, domain assistants, a human proxy) never talk to
//! each other directly. Everything goes through one broadcast channel carrying
//! [`Message`]s:
//!
//! - **ChatMessage**: a content utterance
//! - **RequestToSpeak**: a floor grant naming who may act next
//!
//! ## Moderation
//!
//! After every chat message the moderator consults a decision engine and
//! publishes its [`Decision`] in order. When the engine fails, the fallback
//! hands the floor back to the human proxy so the conversation never stalls.
//!
//! ## Turn gate
//!
//! Every other participant holds a [`TurnGate`] and acts only once per grant
//! addressed to it.

pub mod conversation;
pub mod core;
pub mod moderation;
pub mod protocol;
pub mod roster;
pub mod turn;

// Re-export commonly used types
pub use conversation::{log::ConversationLog, window::ContextWindow};
pub use core::error::DomainError;
pub use moderation::{
    cycle::CycleState,
    decision::{Decision, DecisionError, DecisionRequest},
    fallback::{FALLBACK_PREFIX, fallback_messages},
    parsing::{parse_decision, parse_decision_json},
};
pub use protocol::{
    identity::{MODERATOR, ParticipantId, USER_PROXY, normalize_name},
    message::{DecodeError, Message, decode, encode},
};
pub use roster::{Roster, RosterEntry};
pub use turn::{GateState, TurnGate};
