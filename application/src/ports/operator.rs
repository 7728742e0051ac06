//! Operator console port
//!
//! The human behind the user proxy: a source of input lines and a sink for
//! rendered messages.

use async_trait::async_trait;
use noa_domain::Message;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OperatorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait OperatorConsole: Send + Sync {
    /// Prompt for and read one line. `Ok(None)` means end of input.
    async fn read_line(&self) -> Result<Option<String>, OperatorError>;

    /// Show an observed message to the operator.
    fn show(&self, message: &Message);
}
