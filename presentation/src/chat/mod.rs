//! Interactive terminal for the human proxy
//!
//! Provides the stdin/stdout [`OperatorConsole`](noa_application::OperatorConsole).

mod console;

pub use console::ConsoleOperator;
