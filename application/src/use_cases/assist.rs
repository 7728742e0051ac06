//! Assistant use case: a domain assistant taking part in the conversation.
//!
//! The assistant remembers everything it observes and speaks only when the
//! moderator grants it the floor, exactly once per grant. The answer itself
//! comes from the [`Responder`] port.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::responder::{Responder, ResponseRequest};
use crate::ports::transport::{Transport, TransportError};
use crate::use_cases::shared::publish_message;
use noa_domain::{
    ContextWindow, ConversationLog, GateState, Message, ParticipantId, TurnGate, decode,
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum AssistError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// What one delivered payload led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistOutcome {
    Dropped,
    /// Remembered, but not addressed to this assistant.
    Recorded,
    /// Granted the floor and answered.
    Responded,
    /// Granted the floor, the responder failed, and the failure was announced.
    ResponseFailed,
}

pub struct AssistantUseCase<T: Transport + 'static, R: Responder + 'static> {
    transport: Arc<T>,
    responder: Arc<R>,
    identity: ParticipantId,
    gate: TurnGate,
    log: ConversationLog,
    window: ContextWindow,
    logger: Arc<dyn ConversationLogger>,
}

impl<T: Transport + 'static, R: Responder + 'static> AssistantUseCase<T, R> {
    pub fn new(transport: Arc<T>, responder: Arc<R>, identity: ParticipantId) -> Self {
        Self {
            transport,
            responder,
            gate: TurnGate::new(identity.clone()),
            identity,
            log: ConversationLog::new(),
            window: ContextWindow::default(),
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_context_window(mut self, window: ContextWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn identity(&self) -> &ParticipantId {
        &self.identity
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    pub async fn run(&mut self) -> Result<(), AssistError> {
        self.run_until_cancelled(CancellationToken::new()).await
    }

    pub async fn run_until_cancelled(&mut self, cancel: CancellationToken) -> Result<(), AssistError> {
        self.transport.initialize().await?;
        let mut subscription = self.transport.subscribe().await?;
        info!(assistant = %self.identity, "Assistant listening");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(assistant = %self.identity, "Assistant stopping");
                    return Ok(());
                }
                payload = subscription.recv() => match payload {
                    Some(payload) => {
                        self.handle_payload(&payload).await?;
                    }
                    None => return Err(TransportError::Closed.into()),
                },
            }
        }
    }

    pub async fn handle_payload(&mut self, payload: &[u8]) -> Result<AssistOutcome, AssistError> {
        match decode(payload) {
            Ok(message) => self.handle_message(message).await,
            Err(e) => {
                warn!(assistant = %self.identity, error = %e, "Dropping undecodable payload");
                self.logger.log(ConversationEvent::dropped(
                    self.identity.as_str(),
                    &e.to_string(),
                    payload,
                ));
                Ok(AssistOutcome::Dropped)
            }
        }
    }

    pub async fn handle_message(&mut self, message: Message) -> Result<AssistOutcome, AssistError> {
        self.logger
            .log(ConversationEvent::observed(self.identity.as_str(), &message));
        self.log.append(message.clone());

        if !self.gate.observe(&message) || !self.gate.take() {
            return Ok(AssistOutcome::Recorded);
        }
        debug!(assistant = %self.identity, "Granted the floor");

        let history = self.window.apply(self.log.entries());
        let request = ResponseRequest {
            speaker: &self.identity,
            history,
            grant: &message,
        };
        let (reply, outcome) = match self.responder.respond(&request).await {
            Ok(text) => (
                Message::chat(self.identity.as_str(), text),
                AssistOutcome::Responded,
            ),
            Err(e) => {
                warn!(assistant = %self.identity, error = %e, "Responder failed");
                (
                    Message::chat(
                        self.identity.as_str(),
                        format!("{} failed to respond: {}", self.identity, e),
                    ),
                    AssistOutcome::ResponseFailed,
                )
            }
        };

        publish_message(
            self.transport.as_ref(),
            self.logger.as_ref(),
            self.identity.as_str(),
            &reply,
        )
        .await?;
        self.log.append(reply);
        Ok(outcome)
    }
}
