//! Decision engine contract.

use crate::protocol::message::Message;
use serde::Serialize;
use thiserror::Error;

/// Input handed to the decision engine for one triggering chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionRequest {
    /// Roster rendered one `- <name>: <description>` line per assistant.
    pub roster: String,
    /// Conversation log snapshot, trigger included.
    pub history: Vec<Message>,
    /// The chat message that caused this invocation.
    pub trigger: Message,
}

impl DecisionRequest {
    pub fn new(roster: impl Into<String>, history: Vec<Message>, trigger: Message) -> Self {
        Self {
            roster: roster.into(),
            history,
            trigger,
        }
    }
}

/// A successful decision: messages to publish, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Decision {
    messages: Vec<Message>,
}

impl Decision {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Participants granted the floor by this decision, in order.
    ///
    /// More than one grant per decision is allowed.
    pub fn granted_targets(&self) -> Vec<&str> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::RequestToSpeak { target, .. } => Some(target.as_str()),
                Message::ChatMessage { .. } => None,
            })
            .collect()
    }
}

/// The engine could not produce a valid plan. Carries a diagnostic only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{diagnostic}")]
pub struct DecisionError {
    diagnostic: String,
}

impl DecisionError {
    pub fn new(diagnostic: impl Into<String>) -> Self {
        Self {
            diagnostic: diagnostic.into(),
        }
    }

    pub fn diagnostic(&self) -> &str {
        &self.diagnostic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granted_targets_in_order() {
        let decision = Decision::new(vec![
            Message::chat("moderator", "two of you please"),
            Message::request_to_speak("moderator", "pdf-assistant"),
            Message::request_to_speak("moderator", "math-tutor"),
        ]);
        assert_eq!(decision.granted_targets(), vec!["pdf-assistant", "math-tutor"]);
    }

    #[test]
    fn test_decision_error_displays_diagnostic() {
        let err = DecisionError::new("missing `messages`");
        assert_eq!(err.to_string(), "missing `messages`");
        assert_eq!(err.diagnostic(), "missing `messages`");
    }
}
