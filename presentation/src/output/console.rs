//! Console output formatter for channel messages

use crate::output::formatter::{OutputFormatter, WELCOME};
use colored::Colorize;
use noa_domain::Message;

/// Formats messages for terminal display
#[derive(Debug, Clone, Copy)]
pub struct ConsoleFormatter {
    color: bool,
}

impl Default for ConsoleFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleFormatter {
    /// Bold author names and prompt
    pub fn new() -> Self {
        Self { color: true }
    }

    /// No escape codes (redirected output, tests)
    pub fn plain() -> Self {
        Self { color: false }
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_message(&self, message: &Message) -> String {
        match message {
            Message::ChatMessage { author, message } => {
                format!("{}: {}", self.bold(author), message)
            }
            Message::RequestToSpeak { target, .. } => {
                let notice = format!("Moderator requested {} to speak.", target);
                if self.color {
                    notice.dimmed().to_string()
                } else {
                    notice
                }
            }
        }
    }

    fn format_welcome(&self) -> String {
        if self.color {
            WELCOME.cyan().bold().to_string()
        } else {
            WELCOME.to_string()
        }
    }

    fn format_prompt(&self) -> String {
        format!("{} ", self.bold("Message:"))
    }
}
