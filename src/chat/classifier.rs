// src/chat/classifier.rs
// Intent classification via a single zero-temperature completion

use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use super::json::parse_model_json;
use super::prompts::INTENT_SYSTEM;
use super::types::{ClassificationResult, ConversationTurn, Intent, recent_turns};
use crate::error::Result;
use crate::llm::{ChatMessage, CompletionRequest, TextCompletion};

/// History turns sent along with the message being classified
pub const CLASSIFY_HISTORY_TURNS: usize = 6;
const CLASSIFY_MAX_TOKENS: u32 = 100;

#[derive(Debug, Deserialize)]
struct RawClassification {
    intent: Intent,
    #[serde(default)]
    subject: Option<String>,
}

pub struct IntentClassifier {
    llm: Arc<dyn TextCompletion>,
}

impl IntentClassifier {
    pub fn new(llm: Arc<dyn TextCompletion>) -> Self {
        Self { llm }
    }

    /// System instruction, the recent history, then the message itself
    pub fn build_request(message: &str, history: &[ConversationTurn]) -> CompletionRequest {
        let mut messages = vec![ChatMessage::system(INTENT_SYSTEM)];
        messages.extend(
            recent_turns(history, CLASSIFY_HISTORY_TURNS)
                .iter()
                .map(ChatMessage::from),
        );
        messages.push(ChatMessage::user(message));

        CompletionRequest {
            messages,
            temperature: Some(0.0),
            max_tokens: CLASSIFY_MAX_TOKENS,
        }
    }

    /// Classify a message. A reply that is not the expected JSON, or that
    /// names an unknown intent, is an `UpstreamParse` error.
    pub async fn classify(
        &self,
        message: &str,
        history: &[ConversationTurn],
    ) -> Result<ClassificationResult> {
        let request = Self::build_request(message, history);
        let reply = self.llm.complete(request).await?;
        let raw: RawClassification = parse_model_json(&reply)?;

        let subject = raw
            .subject
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| message.to_string());

        debug!(intent = %raw.intent, subject = %subject, "Classified message");
        Ok(ClassificationResult {
            intent: raw.intent,
            subject,
        })
    }
}
