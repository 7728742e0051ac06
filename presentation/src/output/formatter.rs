//! Output formatter trait

use noa_domain::Message;

/// Shown once when the human proxy starts.
pub const WELCOME: &str = "Welcome to the NoA! Type your message. Type 'quit' to exit.";

/// Trait for rendering channel messages for a human reader
pub trait OutputFormatter {
    /// One line per message: `author: message` for chat, a notice for grants
    fn format_message(&self, message: &Message) -> String;

    /// Startup banner
    fn format_welcome(&self) -> String;

    /// Input prompt
    fn format_prompt(&self) -> String;
}
