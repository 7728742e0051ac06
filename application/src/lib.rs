//! Application layer for noa
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.
//!
//! - [`ModerateUseCase`]: the moderator's decision dispatch cycle and fallback
//! - [`AssistantUseCase`]: a domain assistant answering when granted the floor
//! - [`UserProxyUseCase`]: the human operator's participant

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    cycle_observer::{CycleObserver, NoCycleObserver},
    decision_engine::DecisionEngine,
    operator::{OperatorConsole, OperatorError},
    responder::{Responder, ResponderError, ResponseRequest},
    roster_source::{RosterLoad, RosterLoadError, RosterSource, StaticRoster},
    transport::{Subscription, Transport, TransportError},
};
pub use use_cases::assist::{AssistError, AssistOutcome, AssistantUseCase};
pub use use_cases::floor_gate::FloorGate;
pub use use_cases::moderate::{CycleOutcome, ModerateError, ModerateUseCase};
pub use use_cases::user_proxy::{OperatorInput, UserProxyError, UserProxyUseCase};
