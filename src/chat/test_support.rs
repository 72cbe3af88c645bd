// src/chat/test_support.rs
// Scripted capability fakes for unit tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::GatewayError;
use crate::llm::gemini::types::{
    Candidate, CandidateContent, ContentPart, GenerateContentResponse, InlineData,
};
use crate::llm::{
    CompletionRequest, ContentGenerator, ImagePredictor, PredictResponse, Prediction, Provider,
    ResponseModality, TextCompletion,
};

/// Text completion that replays queued replies and records every request
#[derive(Default)]
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    pub calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    pub fn replying(replies: impl IntoIterator<Item = &'static str>) -> Self {
        let fake = Self::default();
        for reply in replies {
            fake.push(Ok(reply.to_string()));
        }
        fake
    }

    pub fn push(&self, reply: Result<String, GatewayError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<CompletionRequest> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextCompletion for ScriptedCompletion {
    fn provider_type(&self) -> Provider {
        Provider::OpenAi
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, GatewayError> {
        self.calls.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GatewayError::EmptyCompletion {
                provider: Provider::OpenAi,
            }))
    }
}

/// Image predictor replaying queued responses
#[derive(Default)]
pub struct ScriptedPredictor {
    replies: Mutex<VecDeque<Result<PredictResponse, GatewayError>>>,
    pub prompts: Mutex<Vec<(String, u32)>>,
}

impl ScriptedPredictor {
    pub fn push(&self, reply: Result<PredictResponse, GatewayError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ImagePredictor for ScriptedPredictor {
    fn provider_type(&self) -> Provider {
        Provider::Imagen
    }

    async fn predict(
        &self,
        prompt: &str,
        sample_count: u32,
    ) -> Result<PredictResponse, GatewayError> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), sample_count));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(PredictResponse::default()))
    }
}

/// Multimodal generator replaying queued responses
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<GenerateContentResponse, GatewayError>>>,
    pub calls: Mutex<Vec<(String, Vec<ResponseModality>)>>,
}

impl ScriptedGenerator {
    pub fn push(&self, reply: Result<GenerateContentResponse, GatewayError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    fn provider_type(&self) -> Provider {
        Provider::Gemini
    }

    async fn generate_content(
        &self,
        prompt: &str,
        modalities: &[ResponseModality],
    ) -> Result<GenerateContentResponse, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), modalities.to_vec()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(GenerateContentResponse::default()))
    }
}

// ============================================================================
// Response builders
// ============================================================================

pub fn prediction(mime_type: &str, b64: &str) -> PredictResponse {
    PredictResponse {
        predictions: vec![Prediction {
            bytes_base64_encoded: Some(b64.to_string()),
            mime_type: Some(mime_type.to_string()),
        }],
    }
}

pub fn content_response(parts: Vec<ContentPart>) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: vec![Candidate {
            content: Some(CandidateContent { parts }),
            finish_reason: Some("STOP".to_string()),
        }],
    }
}

pub fn inline_part(mime_type: &str, b64: &str) -> ContentPart {
    ContentPart::InlineData {
        inline_data: InlineData {
            mime_type: Some(mime_type.to_string()),
            data: b64.to_string(),
        },
    }
}

pub fn text_part(text: &str) -> ContentPart {
    ContentPart::Text {
        text: text.to_string(),
    }
}

pub fn status_error(provider: Provider, status: u16) -> GatewayError {
    GatewayError::Status {
        provider,
        status,
        body: format!("{{\"error\": {{\"code\": {}}}}}", status),
    }
}
