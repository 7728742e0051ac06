//! Bounded context window over a conversation log.
//!
//! When a log is handed to a content-generation collaborator it is cut to a
//! budget: the oldest entries are dropped first and the remaining suffix keeps
//! its original order.

use crate::protocol::message::Message;
use serde::{Deserialize, Serialize};

/// Budget applied when handing history to a content generator.
///
/// Two knobs:
/// - `max_messages`: cap on the number of entries kept
/// - `max_bytes`: cap on the rendered (`"author: message"`) size of the kept entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextWindow {
    max_messages: usize,
    max_bytes: usize,
}

impl Default for ContextWindow {
    /// Roughly a 40k-token memory buffer at ~4 bytes per token.
    fn default() -> Self {
        Self {
            max_messages: usize::MAX,
            max_bytes: 160_000,
        }
    }
}

impl ContextWindow {
    pub fn new(max_messages: usize, max_bytes: usize) -> Self {
        Self {
            max_messages,
            max_bytes,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(usize::MAX, usize::MAX)
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Select the newest suffix of `entries` that fits the budget.
    ///
    /// The newest entry is always kept, even when it alone exceeds `max_bytes`
    /// (a zero message cap yields an empty window).
    pub fn apply<'a>(&self, entries: &'a [Message]) -> &'a [Message] {
        let mut used = 0usize;
        let mut start = entries.len();

        for (index, message) in entries.iter().enumerate().rev() {
            let kept = entries.len() - index;
            if kept > self.max_messages {
                break;
            }
            let size = rendered_len(message);
            if kept > 1 && used.saturating_add(size) > self.max_bytes {
                break;
            }
            used = used.saturating_add(size);
            start = index;
        }

        &entries[start..]
    }
}

fn rendered_len(message: &Message) -> usize {
    match message {
        Message::ChatMessage { author, message } => author.len() + 2 + message.len(),
        Message::RequestToSpeak { author, target } => author.len() + 2 + target.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> Vec<Message> {
        vec![
            Message::chat("a", "0123456789"), // 13 bytes
            Message::chat("b", "0123456789"),
            Message::chat("c", "0123456789"),
        ]
    }

    #[test]
    fn test_unlimited_keeps_everything() {
        let entries = history();
        assert_eq!(ContextWindow::unlimited().apply(&entries), entries.as_slice());
    }

    #[test]
    fn test_byte_budget_drops_oldest() {
        let entries = history();
        let window = ContextWindow::new(usize::MAX, 26);
        let kept = window.apply(&entries);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].author(), "b");
        assert_eq!(kept[1].author(), "c");
    }

    #[test]
    fn test_message_cap() {
        let entries = history();
        let kept = ContextWindow::new(1, usize::MAX).apply(&entries);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].author(), "c");
    }

    #[test]
    fn test_newest_always_kept() {
        let entries = history();
        let kept = ContextWindow::new(usize::MAX, 1).apply(&entries);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].author(), "c");
    }

    #[test]
    fn test_zero_message_cap_is_empty() {
        let entries = history();
        assert!(ContextWindow::new(0, usize::MAX).apply(&entries).is_empty());
    }

    #[test]
    fn test_empty_history() {
        assert!(ContextWindow::default().apply(&[]).is_empty());
    }
}
