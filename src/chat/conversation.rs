// src/chat/conversation.rs
// General real-estate Q&A

use std::sync::Arc;

use super::prompts::CHAT_PERSONA;
use super::types::{ConversationTurn, GenerationResult, recent_turns};
use crate::error::Result;
use crate::llm::{ChatMessage, CompletionRequest, TextCompletion};

pub const CHAT_HISTORY_TURNS: usize = 10;
const CHAT_TEMPERATURE: f32 = 0.7;
const CHAT_MAX_TOKENS: u32 = 600;

pub struct ConversationResponder {
    llm: Arc<dyn TextCompletion>,
}

impl ConversationResponder {
    pub fn new(llm: Arc<dyn TextCompletion>) -> Self {
        Self { llm }
    }

    pub fn build_request(message: &str, history: &[ConversationTurn]) -> CompletionRequest {
        let mut messages = vec![ChatMessage::system(CHAT_PERSONA)];
        messages.extend(
            recent_turns(history, CHAT_HISTORY_TURNS)
                .iter()
                .map(ChatMessage::from),
        );
        messages.push(ChatMessage::user(message));

        CompletionRequest {
            messages,
            temperature: Some(CHAT_TEMPERATURE),
            max_tokens: CHAT_MAX_TOKENS,
        }
    }

    pub async fn generate(
        &self,
        message: &str,
        history: &[ConversationTurn],
    ) -> Result<GenerationResult> {
        let reply = self
            .llm
            .complete(Self::build_request(message, history))
            .await?;
        Ok(GenerationResult::text(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::test_support::{ScriptedCompletion, status_error};
    use crate::error::ChatError;
    use crate::llm::{Provider, Role};

    #[test]
    fn test_request_keeps_last_ten_turns() {
        let history: Vec<ConversationTurn> = (0..14)
            .map(|i| ConversationTurn {
                role: if i % 2 == 0 { Role::User } else { Role::Assistant },
                content: format!("turn {}", i),
            })
            .collect();

        let request = ConversationResponder::build_request("And taxes?", &history);

        assert_eq!(request.messages.len(), 12);
        assert_eq!(request.messages[0], ChatMessage::system(CHAT_PERSONA));
        assert_eq!(request.messages[1].content, "turn 4");
        assert_eq!(request.messages[11].content, "And taxes?");
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, 600);
    }

    #[tokio::test]
    async fn test_reply_becomes_text_result() {
        let fake = Arc::new(ScriptedCompletion::replying(["Cap rate is NOI divided by price."]));
        let responder = ConversationResponder::new(fake.clone());

        let result = responder.generate("What is a cap rate?", &[]).await.unwrap();

        assert_eq!(result, GenerationResult::text("Cap rate is NOI divided by price."));
        assert_eq!(fake.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_not_retried() {
        let fake = Arc::new(ScriptedCompletion::default());
        fake.push(Err(status_error(Provider::OpenAi, 502)));
        let responder = ConversationResponder::new(fake.clone());

        let err = responder.generate("hi", &[]).await.unwrap_err();
        assert!(matches!(err, ChatError::UpstreamCall(_)));
        assert_eq!(fake.call_count(), 1);
    }
}
