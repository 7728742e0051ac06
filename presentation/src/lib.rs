//! Presentation layer for noa
//!
//! This crate contains CLI definitions, the message formatter
//! and the interactive operator console used by the human proxy.

pub mod chat;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use chat::ConsoleOperator;
pub use cli::commands::{Cli, Command};
pub use output::console::ConsoleFormatter;
pub use output::formatter::{OutputFormatter, WELCOME};
