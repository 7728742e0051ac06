//! Moderate use case: the decision dispatch cycle.
//!
//! Every observed message is recorded in the moderator's log. A
//! `ChatMessage` additionally triggers one cycle:
//!
//! ```text
//! decode ─▶ record ─▶ decide ─┬─ Ok  ─▶ publish each message in order ─▶ Idle
//!                             └─ Err ─▶ "Moderator failed: ..." + floor to user-proxy ─▶ Idle
//! ```
//!
//! Cycles are serialized: the whole cycle runs under one lock, so a message
//! handed in while another cycle is in flight waits until the previous one
//! is back to [`CycleState::Idle`].

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::cycle_observer::{CycleObserver, NoCycleObserver};
use crate::ports::decision_engine::DecisionEngine;
use crate::ports::roster_source::RosterSource;
use crate::ports::transport::{Transport, TransportError};
use crate::use_cases::shared::publish_message;
use noa_domain::{
    ConversationLog, CycleState, DecisionError, DecisionRequest, MODERATOR, Message, Roster,
    decode, fallback_messages,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that end the moderator's run.
///
/// Decision failures are not here: they are recovered by the fallback.
#[derive(Error, Debug)]
pub enum ModerateError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// What one delivered payload led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The payload could not be decoded and was ignored.
    Dropped,
    /// A non-chat message was recorded; no cycle ran.
    Recorded,
    /// The decision succeeded and this many messages were published.
    Dispatched(usize),
    /// The decision failed and the fallback messages were published.
    FellBack,
}

/// The moderator participant.
pub struct ModerateUseCase<T: Transport + 'static, E: DecisionEngine + 'static> {
    transport: Arc<T>,
    engine: Arc<E>,
    roster: Roster,
    logger: Arc<dyn ConversationLogger>,
    observer: Arc<dyn CycleObserver>,
    log: Mutex<ConversationLog>,
    state: watch::Sender<CycleState>,
}

impl<T: Transport + 'static, E: DecisionEngine + 'static> ModerateUseCase<T, E> {
    pub fn new(transport: Arc<T>, engine: Arc<E>, roster: Roster) -> Self {
        let (state, _rx) = watch::channel(CycleState::Idle);
        Self {
            transport,
            engine,
            roster,
            logger: Arc::new(NoConversationLogger),
            observer: Arc::new(NoCycleObserver),
            log: Mutex::new(ConversationLog::new()),
            state,
        }
    }

    /// Load the roster once from `source`, warning about each skipped entry.
    pub fn from_source(transport: Arc<T>, engine: Arc<E>, source: &dyn RosterSource) -> Self {
        let load = source.load();
        for skipped in &load.skipped {
            warn!("{}", skipped);
        }
        if load.roster.is_empty() {
            warn!("Roster is empty; the decision engine has no assistants to address");
        } else {
            info!(assistants = load.roster.len(), "Roster loaded");
        }
        Self::new(transport, engine, load.roster)
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn CycleObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn state(&self) -> CycleState {
        *self.state.borrow()
    }

    /// A copy of the log. Waits for any in-flight cycle to finish.
    pub async fn log_snapshot(&self) -> Vec<Message> {
        self.log.lock().await.snapshot()
    }

    /// Subscribe and process deliveries until the subscription ends.
    pub async fn run(&self) -> Result<(), ModerateError> {
        self.run_until_cancelled(CancellationToken::new()).await
    }

    /// Like [`run`](Self::run), but returns `Ok` once `cancel` fires.
    ///
    /// A cycle already in flight completes before cancellation is observed.
    pub async fn run_until_cancelled(&self, cancel: CancellationToken) -> Result<(), ModerateError> {
        self.transport.initialize().await?;
        let mut subscription = self.transport.subscribe().await?;
        info!(assistants = self.roster.len(), "Moderator listening");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Moderator stopping");
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

    /// Decode one delivered payload and run it through the cycle.
    ///
    /// Undecodable payloads are logged and dropped; they never reach the log.
    pub async fn handle_payload(&self, payload: &[u8]) -> Result<CycleOutcome, ModerateError> {
        match decode(payload) {
            Ok(message) => self.handle_message(message).await,
            Err(e) => {
                warn!(error = %e, "Dropping undecodable payload");
                self.logger
                    .log(ConversationEvent::dropped(MODERATOR, &e.to_string(), payload));
                Ok(CycleOutcome::Dropped)
            }
        }
    }

    pub async fn handle_message(&self, message: Message) -> Result<CycleOutcome, ModerateError> {
        let mut log = self.log.lock().await;

        self.transition(CycleState::Received);
        debug!(kind = message.type_name(), author = message.author(), "Observed message");
        self.logger.log(ConversationEvent::observed(MODERATOR, &message));
        log.append(message.clone());

        if !message.is_chat() {
            self.transition(CycleState::Idle);
            return Ok(CycleOutcome::Recorded);
        }

        self.transition(CycleState::Deciding);
        let request = DecisionRequest::new(self.roster.render(), log.snapshot(), message);
        let outcome = match self.engine.decide(&request).await {
            Ok(decision) => {
                self.transition(CycleState::Dispatching);
                let count = decision.messages().len();
                self.dispatch(&mut log, decision.into_messages())
                    .await
                    .map(|_| CycleOutcome::Dispatched(count))
            }
            Err(error) => {
                self.transition(CycleState::Fallback);
                self.fall_back(&mut log, &error)
                    .await
                    .map(|_| CycleOutcome::FellBack)
            }
        };

        self.transition(CycleState::Idle);
        Ok(outcome?)
    }

    async fn fall_back(
        &self,
        log: &mut ConversationLog,
        error: &DecisionError,
    ) -> Result<(), TransportError> {
        warn!(diagnostic = %error, "Decision failed; returning the floor to the user proxy");
        self.logger.log(ConversationEvent::fallback(error.diagnostic()));
        self.dispatch(log, fallback_messages(error)).await
    }

    /// Publish each message, then append it, then surface it. Strictly in order.
    async fn dispatch(
        &self,
        log: &mut ConversationLog,
        messages: impl IntoIterator<Item = Message>,
    ) -> Result<(), TransportError> {
        for message in messages {
            publish_message(self.transport.as_ref(), self.logger.as_ref(), MODERATOR, &message)
                .await?;
            info!("{}", message);
            self.observer.on_published(&message);
            log.append(message);
        }
        Ok(())
    }

    fn transition(&self, to: CycleState) {
        let from = self.state.send_replace(to);
        debug_assert!(
            from.can_transition_to(to),
            "illegal cycle transition {} -> {}",
            from,
            to
        );
        self.observer.on_transition(from, to);
    }
}
