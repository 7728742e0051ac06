//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording the transcript a
//! participant sees (observed, published and dropped payloads, fallbacks) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! conversation transcript in a machine-readable format (JSONL).

use noa_domain::Message;
use serde_json::{Value, json};

/// A structured conversation event for logging.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "observed", "published", "fallback").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    /// A message delivered to `participant`.
    pub fn observed(participant: &str, message: &Message) -> Self {
        Self::new(
            "observed",
            json!({ "participant": participant, "message": message }),
        )
    }

    /// A message `participant` published.
    pub fn published(participant: &str, message: &Message) -> Self {
        Self::new(
            "published",
            json!({ "participant": participant, "message": message }),
        )
    }

    /// A payload that could not be decoded and was dropped.
    pub fn dropped(participant: &str, reason: &str, payload: &[u8]) -> Self {
        Self::new(
            "dropped",
            json!({
                "participant": participant,
                "reason": reason,
                "payload": String::from_utf8_lossy(payload),
            }),
        )
    }

    /// The moderator fell back after a decision failure.
    pub fn fallback(diagnostic: &str) -> Self {
        Self::new("fallback", json!({ "diagnostic": diagnostic }))
    }
}

/// Port for logging conversation events to a structured log.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// The `log` method is synchronous and non-fallible; logging failures are
/// silently ignored so they never reach the conversation.
pub trait ConversationLogger: Send + Sync {
    /// Record a conversation event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
