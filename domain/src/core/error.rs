//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid participant name: {0:?}")]
    InvalidParticipant(String),

    #[error("Reserved identity cannot be used by an assistant: {0}")]
    ReservedIdentity(String),
}
