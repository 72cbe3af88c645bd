// src/chat/orchestrator.rs
// Classify -> dispatch -> envelope for one chat-report request

use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use super::classifier::IntentClassifier;
use super::conversation::ConversationResponder;
use super::diagram::DiagramGenerator;
use super::document::ReportGenerator;
use super::types::{ChatRequest, Intent, ResponseEnvelope};
use crate::error::Result;
use crate::llm::{ContentGenerator, ImagePredictor, TextCompletion};
use crate::report::ArtifactStore;

/// Stateless request handler; shared across requests behind an `Arc`
pub struct ChatReportService {
    classifier: IntentClassifier,
    diagrams: DiagramGenerator,
    reports: ReportGenerator,
    conversation: ConversationResponder,
}

impl ChatReportService {
    pub fn new(
        text: Arc<dyn TextCompletion>,
        image: Arc<dyn ImagePredictor>,
        multimodal: Arc<dyn ContentGenerator>,
        store: ArtifactStore,
    ) -> Self {
        Self {
            classifier: IntentClassifier::new(text.clone()),
            diagrams: DiagramGenerator::new(image, multimodal, text.clone()),
            reports: ReportGenerator::new(text.clone(), store),
            conversation: ConversationResponder::new(text),
        }
    }

    /// Exactly one generator runs per request, chosen by the classified intent
    pub async fn handle(&self, request: &ChatRequest) -> Result<ResponseEnvelope> {
        let request_id = Uuid::new_v4();
        let start = Instant::now();

        let outcome = self.dispatch(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match &outcome {
            Ok(envelope) => info!(
                request_id = %request_id,
                intent = %envelope.intent,
                kind = envelope.kind(),
                duration_ms,
                "Chat report request completed"
            ),
            Err(e) => warn!(
                request_id = %request_id,
                duration_ms,
                error = %e,
                "Chat report request failed"
            ),
        }
        outcome
    }

    async fn dispatch(&self, request: &ChatRequest) -> Result<ResponseEnvelope> {
        let classification = self
            .classifier
            .classify(&request.message, &request.history)
            .await?;
        let intent = classification.intent;

        let result = match intent {
            Intent::Diagram => self.diagrams.generate(&classification.subject).await?,
            Intent::Document => {
                self.reports
                    .generate(&classification.subject, &request.message)
                    .await?
            }
            Intent::Conversation => {
                self.conversation
                    .generate(&request.message, &request.history)
                    .await?
            }
        };

        Ok(ResponseEnvelope::new(intent, result))
    }
}
