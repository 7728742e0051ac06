//! Append-only conversation log.

use crate::protocol::message::Message;
use serde::Serialize;

/// Ordered record of every message a participant has observed or published.
///
/// Entries are never reordered or mutated; the only write operation is
/// [`append`](Self::append). Insertion order is observation order at the
/// owning participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConversationLog {
    entries: Vec<Message>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.entries.push(message);
    }

    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }

    /// Owned copy of the current entries.
    pub fn snapshot(&self) -> Vec<Message> {
        self.entries.clone()
    }

    /// Only the chat messages, in order.
    pub fn chat_messages(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter().filter(|m| m.is_chat())
    }
}
