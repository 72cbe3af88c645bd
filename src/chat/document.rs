// src/chat/document.rs
// Report generation: structured JSON from the text model, rendered to PDF

use std::sync::Arc;
use tracing::info;

use super::json::parse_model_json;
use super::prompts::{REPORT_SYSTEM, report_request};
use super::types::GenerationResult;
use crate::error::Result;
use crate::llm::{ChatMessage, CompletionRequest, TextCompletion};
use crate::report::{ArtifactStore, ReportData, render_report};

const REPORT_TEMPERATURE: f32 = 0.7;
const REPORT_MAX_TOKENS: u32 = 2000;

pub struct ReportGenerator {
    llm: Arc<dyn TextCompletion>,
    store: ArtifactStore,
}

impl ReportGenerator {
    pub fn new(llm: Arc<dyn TextCompletion>, store: ArtifactStore) -> Self {
        Self { llm, store }
    }

    pub fn build_request(message: &str) -> CompletionRequest {
        CompletionRequest {
            messages: vec![
                ChatMessage::system(REPORT_SYSTEM),
                ChatMessage::user(report_request(message)),
            ],
            temperature: Some(REPORT_TEMPERATURE),
            max_tokens: REPORT_MAX_TOKENS,
        }
    }

    /// The report is requested from the full user message; the classified
    /// subject only labels the log line.
    pub async fn generate(&self, subject: &str, message: &str) -> Result<GenerationResult> {
        let reply = self.llm.complete(Self::build_request(message)).await?;
        let data: ReportData = parse_model_json(&reply)?;

        let artifact_id = ArtifactStore::new_artifact_id();
        let path = self.store.path_for(&artifact_id);
        let message = report_ready_message(&data);

        let render_path = path.clone();
        tokio::task::spawn_blocking(move || render_report(&render_path, &data)).await??;

        info!(artifact = %artifact_id, subject = %subject, path = %path.display(), "Report rendered");
        Ok(GenerationResult::Document {
            artifact_url: self.store.url_for(&artifact_id),
            artifact_id,
            message,
        })
    }
}

pub fn report_ready_message(data: &ReportData) -> String {
    format!("Your report **\"{}\"** is ready.", data.title_or_default())
}
