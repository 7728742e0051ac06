//! User proxy use case: the human operator's seat at the table.
//!
//! Two flows run side by side:
//!
//! - a background receive task that shows every delivered message to the
//!   operator and feeds the [`FloorGate`];
//! - the foreground input loop: read a line, publish it as a `ChatMessage`,
//!   then wait (without timeout) until the moderator hands the floor back.
//!
//! Typing `quit` ends the session without publishing anything.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::operator::{OperatorConsole, OperatorError};
use crate::ports::transport::{Subscription, Transport, TransportError};
use crate::use_cases::floor_gate::FloorGate;
use crate::use_cases::shared::publish_message;
use noa_domain::{Message, ParticipantId, USER_PROXY, decode};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum UserProxyError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Operator error: {0}")]
    Operator(#[from] OperatorError),
}

/// How a line typed by the operator is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorInput {
    /// Blank line; prompt again.
    Empty,
    /// End the session.
    Quit,
    /// Publish this text.
    Say(String),
}

impl OperatorInput {
    pub fn parse(line: &str) -> Self {
        let text = line.trim();
        if text.is_empty() {
            OperatorInput::Empty
        } else if text.eq_ignore_ascii_case("quit") {
            OperatorInput::Quit
        } else {
            OperatorInput::Say(text.to_string())
        }
    }
}

pub struct UserProxyUseCase<T: Transport + 'static, C: OperatorConsole + 'static> {
    transport: Arc<T>,
    console: Arc<C>,
    gate: FloorGate,
    logger: Arc<dyn ConversationLogger>,
}

impl<T: Transport + 'static, C: OperatorConsole + 'static> UserProxyUseCase<T, C> {
    pub fn new(transport: Arc<T>, console: Arc<C>) -> Self {
        Self {
            transport,
            console,
            gate: FloorGate::new(ParticipantId::user_proxy()),
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn gate(&self) -> &FloorGate {
        &self.gate
    }

    /// Run the session until the operator quits or input ends.
    ///
    /// Returns [`TransportError::Closed`] if the channel goes away first.
    pub async fn run(&self) -> Result<(), UserProxyError> {
        self.transport.initialize().await?;
        let subscription = self.transport.subscribe().await?;

        let mut receiver = tokio::spawn(receive_loop(
            subscription,
            self.console.clone(),
            self.gate.clone(),
            self.logger.clone(),
        ));

        let result = tokio::select! {
            result = self.converse() => result,
            _ = &mut receiver => Err(TransportError::Closed.into()),
        };
        receiver.abort();
        result
    }

    async fn converse(&self) -> Result<(), UserProxyError> {
        loop {
            let Some(line) = self.console.read_line().await? else {
                info!("Operator input closed");
                return Ok(());
            };

            match OperatorInput::parse(&line) {
                OperatorInput::Empty => continue,
                OperatorInput::Quit => {
                    info!("Operator quit");
                    return Ok(());
                }
                OperatorInput::Say(text) => {
                    self.gate.reset();
                    publish_message(
                        self.transport.as_ref(),
                        self.logger.as_ref(),
                        USER_PROXY,
                        &Message::chat(USER_PROXY, text),
                    )
                    .await?;
                    debug!("Waiting for the floor");
                    self.gate.acquire().await;
                }
            }
        }
    }
}

async fn receive_loop<C: OperatorConsole>(
    mut subscription: Subscription,
    console: Arc<C>,
    gate: FloorGate,
    logger: Arc<dyn ConversationLogger>,
) {
    while let Some(payload) = subscription.recv().await {
        match decode(&payload) {
            Ok(message) => {
                logger.log(ConversationEvent::observed(USER_PROXY, &message));
                console.show(&message);
                gate.observe(&message);
            }
            Err(e) => {
                warn!(error = %e, "Dropping undecodable payload");
                logger.log(ConversationEvent::dropped(USER_PROXY, &e.to_string(), &payload));
            }
        }
    }
    debug!("Subscription ended");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{RecordingTransport, ScriptedOperator, payload};
    use std::time::Duration;

    #[test]
    fn test_parse_operator_input() {
        assert_eq!(OperatorInput::parse(""), OperatorInput::Empty);
        assert_eq!(OperatorInput::parse("   \t"), OperatorInput::Empty);
        assert_eq!(OperatorInput::parse("quit"), OperatorInput::Quit);
        assert_eq!(OperatorInput::parse("  QUIT \n"), OperatorInput::Quit);
        assert_eq!(
            OperatorInput::parse(" Summarise chapter 2 \n"),
            OperatorInput::Say("Summarise chapter 2".to_string())
        );
        assert_eq!(
            OperatorInput::parse("quit now"),
            OperatorInput::Say("quit now".to_string())
        );
    }

    #[tokio::test]
    async fn test_quit_publishes_nothing() {
        let (transport, _tx) = RecordingTransport::new();
        let transport = Arc::new(transport);
        let operator = Arc::new(ScriptedOperator::new(&["", "  ", "Quit"]));
        let use_case = UserProxyUseCase::new(transport.clone(), operator.clone());

        use_case.run().await.unwrap();

        assert!(transport.published().is_empty());
        assert_eq!(operator.reads(), 3);
    }

    #[tokio::test]
    async fn test_end_of_input_ends_session() {
        let (transport, _tx) = RecordingTransport::new();
        let transport = Arc::new(transport);
        let use_case = UserProxyUseCase::new(transport.clone(), Arc::new(ScriptedOperator::new(&[])));

        use_case.run().await.unwrap();
        assert!(transport.published().is_empty());
    }

    #[tokio::test]
    async fn test_waits_for_own_grant_before_prompting_again() {
        let (transport, tx) = RecordingTransport::new();
        let transport = Arc::new(transport);
        let operator = Arc::new(ScriptedOperator::new(&["hello", "quit"]));
        let use_case = Arc::new(UserProxyUseCase::new(transport.clone(), operator.clone()));

        let session = tokio::spawn({
            let use_case = use_case.clone();
            async move { use_case.run().await }
        });

        let published = tokio::time::timeout(Duration::from_secs(1), transport.wait_for_publishes(1))
            .await
            .expect("operator line should be published");
        assert_eq!(published, vec![Message::chat("user-proxy", "hello")]);

        let commentary = Message::chat("moderator", "routing to pdf-assistant");
        let other_grant = Message::request_to_speak("moderator", "pdf-assistant");
        tx.send(payload(&commentary)).await.unwrap();
        tx.send(payload(&other_grant)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(operator.reads(), 1, "must not prompt before its own grant");

        let own_grant = Message::request_to_speak("moderator", "user-proxy");
        tx.send(payload(&own_grant)).await.unwrap();

        tokio::time::timeout(Duration::from_secs(1), session)
            .await
            .expect("session should end after quit")
            .unwrap()
            .unwrap();
        assert_eq!(operator.reads(), 2);
        assert_eq!(operator.shown(), vec![commentary, other_grant, own_grant]);
        assert_eq!(transport.published().len(), 1);
    }

    #[tokio::test]
    async fn test_closed_channel_ends_session_with_error() {
        let (transport, tx) = RecordingTransport::new();
        let transport = Arc::new(transport);
        let operator = Arc::new(ScriptedOperator::new(&["hello"]));
        let use_case = UserProxyUseCase::new(transport.clone(), operator);

        drop(tx);
        let result = tokio::time::timeout(Duration::from_secs(1), use_case.run())
            .await
            .expect("closed channel must not hang the session");

        assert!(matches!(
            result,
            Err(UserProxyError::Transport(TransportError::Closed))
        ));
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_not_shown() {
        let (transport, tx) = RecordingTransport::new();
        let transport = Arc::new(transport);
        let operator = Arc::new(ScriptedOperator::new(&["hello", "quit"]));
        let use_case = Arc::new(UserProxyUseCase::new(transport.clone(), operator.clone()));

        let session = tokio::spawn({
            let use_case = use_case.clone();
            async move { use_case.run().await }
        });
        tokio::time::timeout(Duration::from_secs(1), transport.wait_for_publishes(1))
            .await
            .unwrap();

        tx.send(br#"{"type":"Unknown"}"#.to_vec()).await.unwrap();
        tx.send(payload(&Message::request_to_speak("moderator", "user-proxy")))
            .await
            .unwrap();

        tokio::time::timeout(Duration::from_secs(1), session)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(
            operator.shown(),
            vec![Message::request_to_speak("moderator", "user-proxy")]
        );
    }
}
