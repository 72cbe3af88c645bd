// src/llm/gemini/client.rs
// Google Gemini generateContent client (secondary multimodal capability)

use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use super::types::{
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, RequestContent,
    RequestPart,
};
use crate::error::GatewayError;
use crate::llm::http_client::{LlmHttpClient, decode};
use crate::llm::imagen::GOOGLE_API_BASE;
use crate::llm::logging::log_completion;
use crate::llm::provider::{ContentGenerator, Provider, ResponseModality};

/// Google Gemini API client
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    http: LlmHttpClient,
}

impl GeminiClient {
    /// Create a new Gemini client with a shared HTTP client
    pub fn with_http_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            api_key,
            model,
            base_url: GOOGLE_API_BASE.to_string(),
            http: LlmHttpClient::from_client(client),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    fn provider_type(&self) -> Provider {
        Provider::Gemini
    }

    async fn generate_content(
        &self,
        prompt: &str,
        modalities: &[ResponseModality],
    ) -> Result<GenerateContentResponse, GatewayError> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();

        info!(
            request_id = %request_id,
            model = %self.model,
            modalities = ?modalities,
            "Starting Gemini generateContent request"
        );

        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_modalities: modalities,
            },
        };
        let body = serde_json::to_string(&request).map_err(|e| GatewayError::Decode {
            provider: Provider::Gemini,
            message: e.to_string(),
        })?;
        debug!(request_id = %request_id, "Gemini request: {}", body);

        let url = format!("{}/{}:generateContent", self.base_url, self.model);
        let response_body = self
            .http
            .execute(Provider::Gemini, &request_id, body, |client, body| {
                client
                    .post(&url)
                    .query(&[("key", self.api_key.as_str())])
                    .header("Content-Type", "application/json")
                    .body(body)
            })
            .await?;

        let data: GenerateContentResponse = decode(Provider::Gemini, &response_body)?;

        log_completion(
            &request_id,
            "Gemini",
            start_time.elapsed().as_millis() as u64,
            data.candidates.len(),
        );

        Ok(data)
    }
}
