// src/llm/imagen.rs
// Google Imagen client (predict endpoint, primary image capability)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use super::http_client::{LlmHttpClient, decode};
use super::logging::log_completion;
use super::provider::{ImagePredictor, Provider};
use crate::error::GatewayError;

pub const GOOGLE_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: [PredictInstance<'a>; 1],
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
struct PredictInstance<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
}

/// Response of the predict endpoint. An all-filtered request comes back
/// as `{}`, hence the empty default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    #[serde(default)]
    pub bytes_base64_encoded: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl PredictResponse {
    /// First prediction carrying a non-empty payload
    pub fn first_image(&self) -> Option<&Prediction> {
        self.predictions.first().filter(|p| {
            p.bytes_base64_encoded
                .as_deref()
                .is_some_and(|b| !b.is_empty())
        })
    }
}

// ============================================================================
// Client
// ============================================================================

pub struct ImagenClient {
    api_key: String,
    model: String,
    base_url: String,
    http: LlmHttpClient,
}

impl ImagenClient {
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
impl ImagePredictor for ImagenClient {
    fn provider_type(&self) -> Provider {
        Provider::Imagen
    }

    async fn predict(
        &self,
        prompt: &str,
        sample_count: u32,
    ) -> Result<PredictResponse, GatewayError> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();

        info!(request_id = %request_id, model = %self.model, "Starting Imagen predict request");

        let body = serde_json::to_string(&PredictRequest {
            instances: [PredictInstance { prompt }],
            parameters: PredictParameters { sample_count },
        })
        .map_err(|e| GatewayError::Decode {
            provider: Provider::Imagen,
            message: e.to_string(),
        })?;
        debug!(request_id = %request_id, "Imagen request: {}", body);

        // Google authenticates via query-string key, not Bearer header
        let url = format!("{}/{}:predict", self.base_url, self.model);
        let response_body = self
            .http
            .execute(Provider::Imagen, &request_id, body, |client, body| {
                client
                    .post(&url)
                    .query(&[("key", self.api_key.as_str())])
                    .header("Content-Type", "application/json")
                    .body(body)
            })
            .await?;

        let data: PredictResponse = decode(Provider::Imagen, &response_body)?;

        log_completion(
            &request_id,
            "Imagen",
            start_time.elapsed().as_millis() as u64,
            data.predictions.len(),
        );

        Ok(data)
    }
}
