//! LLM-backed [`DecisionEngine`].
//!
//! The model sees the roster, the full history and the triggering message,
//! and must answer with `{"messages": [...]}`. Whatever it returns goes
//! through [`parse_decision`]; anything unusable becomes a
//! [`DecisionError`] and the moderator falls back.

use super::client::{ChatModel, ChatTurn};
use async_trait::async_trait;
use noa_application::DecisionEngine;
use noa_domain::{Decision, DecisionError, DecisionRequest, MODERATOR, USER_PROXY, parse_decision};
use std::sync::Arc;
use tracing::debug;

fn moderator_instructions() -> String {
    format!(
        r#"You are the moderator of a conversation between a human user, represented by "{user}", and a team of assistants.
After every new message you decide who speaks next.

Answer with a single JSON object and nothing else:

{{"messages": [ ... ]}}

Each element is one of:
- {{"type": "ChatMessage", "author": "{moderator}", "message": "<short note for the participants>"}}
- {{"type": "RequestToSpeak", "author": "{moderator}", "target": "<participant name>"}}

Rules:
- Address assistants only by the names listed under "Available assistants".
- Put any ChatMessage before the RequestToSpeak it explains.
- When the user's request is answered, or you need more input from the user, give the floor to "{user}".
- Never write a ChatMessage on behalf of another participant."#,
        user = USER_PROXY,
        moderator = MODERATOR,
    )
}

pub struct LlmDecisionEngine<M: ChatModel + 'static> {
    model: Arc<M>,
}

impl<M: ChatModel + 'static> LlmDecisionEngine<M> {
    pub fn new(model: Arc<M>) -> Self {
        Self { model }
    }

    pub fn build_prompt(request: &DecisionRequest) -> Vec<ChatTurn> {
        let roster = if request.roster.is_empty() {
            "(none)"
        } else {
            request.roster.as_str()
        };
        let history = serde_json::to_string_pretty(&request.history).unwrap_or_default();
        let trigger = serde_json::to_string(&request.trigger).unwrap_or_default();

        vec![
            ChatTurn::system(moderator_instructions()),
            ChatTurn::user(format!(
                "Available assistants:\n{}\n\nConversation so far:\n{}\n\nNew message:\n{}",
                roster, history, trigger
            )),
        ]
    }
}

#[async_trait]
impl<M: ChatModel + 'static> DecisionEngine for LlmDecisionEngine<M> {
    async fn decide(&self, request: &DecisionRequest) -> Result<Decision, DecisionError> {
        let turns = Self::build_prompt(request);
        let reply = self
            .model
            .complete(&turns)
            .await
            .map_err(|e| DecisionError::new(format!("Decision engine call failed: {}", e)))?;
        debug!(bytes = reply.len(), "Decision engine replied");
        parse_decision(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::LlmClientError;
    use noa_domain::Message;
    use std::sync::Mutex;

    struct CannedModel {
        reply: Result<String, u16>,
        seen: Mutex<Vec<Vec<ChatTurn>>>,
    }

    impl CannedModel {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatModel for CannedModel {
        async fn complete(&self, turns: &[ChatTurn]) -> Result<String, LlmClientError> {
            self.seen.lock().unwrap().push(turns.to_vec());
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(status) => Err(LlmClientError::Api {
                    status: *status,
                    message: "overloaded".to_string(),
                }),
            }
        }
    }

    fn request() -> DecisionRequest {
        let trigger = Message::chat("user-proxy", "what does chapter 2 say?");
        DecisionRequest::new(
            "- pdf-assistant: Answers questions about PDFs",
            vec![trigger.clone()],
            trigger,
        )
    }

    #[tokio::test]
    async fn test_fenced_reply_becomes_decision() {
        let model = Arc::new(CannedModel::replying(
            "Sure.\n```json\n{\"messages\": [\
             {\"type\": \"ChatMessage\", \"author\": \"moderator\", \"message\": \"routing to pdf-assistant\"},\
             {\"type\": \"RequestToSpeak\", \"author\": \"moderator\", \"target\": \"pdf-assistant\"}]}\n```",
        ));
        let engine = LlmDecisionEngine::new(model.clone());

        let decision = engine.decide(&request()).await.unwrap();

        assert_eq!(
            decision.messages(),
            &[
                Message::chat("moderator", "routing to pdf-assistant"),
                Message::request_to_speak("moderator", "pdf-assistant"),
            ]
        );
    }

    #[tokio::test]
    async fn test_prose_reply_is_decision_error() {
        let engine = LlmDecisionEngine::new(Arc::new(CannedModel::replying(
            "I think the pdf assistant should answer.",
        )));

        let error = engine.decide(&request()).await.unwrap_err();
        assert!(error.diagnostic().starts_with("Invalid JSON output"));
    }

    #[tokio::test]
    async fn test_model_failure_is_decision_error() {
        let engine = LlmDecisionEngine::new(Arc::new(CannedModel::failing(503)));

        let error = engine.decide(&request()).await.unwrap_err();
        assert!(error.diagnostic().contains("503"));
    }

    #[tokio::test]
    async fn test_prompt_carries_roster_history_and_trigger() {
        let model = Arc::new(CannedModel::replying("{\"messages\": []}"));
        let engine = LlmDecisionEngine::new(model.clone());

        let decision = engine.decide(&request()).await.unwrap();
        assert!(decision.is_empty());

        let seen = model.seen.lock().unwrap();
        let turns = &seen[0];
        assert_eq!(turns.len(), 2);
        assert!(turns[0].content.contains("\"messages\""));
        assert!(turns[1].content.contains("- pdf-assistant: Answers questions about PDFs"));
        assert!(turns[1].content.contains("what does chapter 2 say?"));
    }

    #[test]
    fn test_empty_roster_is_marked() {
        let trigger = Message::chat("user-proxy", "hi");
        let turns =
            LlmDecisionEngine::<CannedModel>::build_prompt(&DecisionRequest::new("", vec![], trigger));
        assert!(turns[1].content.starts_with("Available assistants:\n(none)"));
    }
}
