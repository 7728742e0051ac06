//! LLM-backed [`Responder`] for assistant participants.

use super::client::{ChatModel, ChatTurn, LlmClientError};
use async_trait::async_trait;
use noa_application::{Responder, ResponderError, ResponseRequest};
use noa_domain::Message;
use std::sync::Arc;

pub struct LlmResponder<M: ChatModel + 'static> {
    model: Arc<M>,
    description: String,
}

impl<M: ChatModel + 'static> LlmResponder<M> {
    /// `description` is what the assistant is for, as advertised in the roster.
    pub fn new(model: Arc<M>, description: impl Into<String>) -> Self {
        Self {
            model,
            description: description.into(),
        }
    }

    /// System prompt, then one user turn per chat message in the window.
    pub fn build_prompt(&self, request: &ResponseRequest<'_>) -> Vec<ChatTurn> {
        let mut system = format!(
            "You are \"{}\", one participant in a moderated group conversation.",
            request.speaker
        );
        if !self.description.is_empty() {
            system.push_str(&format!(" Your role: {}", self.description));
        }
        system.push_str(
            "\nThe moderator has just given you the floor. Reply to the latest request \
             in the conversation with your answer only, without prefixing your name.",
        );

        let mut turns = vec![ChatTurn::system(system)];
        turns.extend(render_history(request.history).into_iter().map(ChatTurn::user));
        turns
    }
}

#[async_trait]
impl<M: ChatModel + 'static> Responder for LlmResponder<M> {
    async fn respond(&self, request: &ResponseRequest<'_>) -> Result<String, ResponderError> {
        let turns = self.build_prompt(request);
        match self.model.complete(&turns).await {
            Ok(reply) => Ok(reply.trim().to_string()),
            Err(LlmClientError::EmptyResponse) => Err(ResponderError::Empty),
            Err(e) => Err(ResponderError::Generation(e.to_string())),
        }
    }
}

/// Chat messages as `author: message` lines; grants carry no content.
fn render_history(history: &[Message]) -> Vec<String> {
    history
        .iter()
        .filter(|message| message.is_chat())
        .map(ToString::to_string)
        .collect()
}
