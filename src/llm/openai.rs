// src/llm/openai.rs
// OpenAI Chat Completions client (text completion capability)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{Span, debug, info, instrument};
use uuid::Uuid;

use super::http_client::{LlmHttpClient, decode};
use super::logging::{Usage, log_completion, log_usage};
use super::provider::{ChatMessage, CompletionRequest, Provider, TextCompletion};
use crate::error::GatewayError;

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

// ============================================================================
// Client
// ============================================================================

/// OpenAI chat completions client
pub struct OpenAiClient {
    api_key: String,
    model: String,
    base_url: String,
    http: LlmHttpClient,
}

impl OpenAiClient {
    /// Create a client with a shared HTTP client
    pub fn with_http_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            api_key,
            model,
            base_url: OPENAI_API_BASE.to_string(),
            http: LlmHttpClient::from_client(client),
        }
    }

    /// Point the client at a different API base (proxies, compatible servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl TextCompletion for OpenAiClient {
    fn provider_type(&self) -> Provider {
        Provider::OpenAi
    }

    #[instrument(skip(self, request), fields(request_id, model = %self.model, message_count = request.messages.len()))]
    async fn complete(&self, request: CompletionRequest) -> Result<String, GatewayError> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();
        Span::current().record("request_id", &request_id);

        info!(
            request_id = %request_id,
            message_count = request.messages.len(),
            max_tokens = request.max_tokens,
            "Starting OpenAI chat completion"
        );

        let body = serde_json::to_string(&ChatCompletionRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        })
        .map_err(|e| GatewayError::Decode {
            provider: Provider::OpenAi,
            message: e.to_string(),
        })?;
        debug!(request_id = %request_id, "OpenAI request: {}", body);

        let response_body = self
            .http
            .execute_with_bearer(
                Provider::OpenAi,
                &request_id,
                &self.endpoint(),
                &self.api_key,
                body,
            )
            .await?;

        let data: ChatCompletionResponse = decode(Provider::OpenAi, &response_body)?;

        if let Some(ref usage) = data.usage {
            log_usage(&request_id, "OpenAI", usage);
        }

        let content = data
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(GatewayError::EmptyCompletion {
                provider: Provider::OpenAi,
            })?;

        log_completion(
            &request_id,
            "OpenAI",
            start_time.elapsed().as_millis() as u64,
            content.len(),
        );

        Ok(content)
    }
}
