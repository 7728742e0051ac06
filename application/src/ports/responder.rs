//! Responder port
//!
//! An assistant's domain logic: given the bounded history and the grant that
//! gave it the floor, produce the text it will say.

use async_trait::async_trait;
use noa_domain::{Message, ParticipantId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResponderError {
    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Empty response")]
    Empty,
}

/// What a responder is asked to answer.
#[derive(Debug, Clone)]
pub struct ResponseRequest<'a> {
    pub speaker: &'a ParticipantId,
    /// History after the context-window cut, oldest first.
    pub history: &'a [Message],
    /// The `RequestToSpeak` being answered.
    pub grant: &'a Message,
}

#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, request: &ResponseRequest<'_>) -> Result<String, ResponderError>;
}
