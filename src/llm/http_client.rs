// src/llm/http_client.rs
// Single-attempt HTTP execution shared by all provider clients

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::Provider;
use crate::error::GatewayError;

/// Thin wrapper over the shared reqwest client. Every call is attempted once.
pub struct LlmHttpClient {
    client: Client,
}

impl LlmHttpClient {
    /// Create from an existing reqwest::Client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Execute one request with Bearer auth, returning the body on 2xx
    pub async fn execute_with_bearer(
        &self,
        provider: Provider,
        request_id: &str,
        url: &str,
        api_key: &str,
        body: String,
    ) -> Result<String, GatewayError> {
        self.execute(provider, request_id, body, |client, body| {
            client
                .post(url)
                .header("Authorization", format!("Bearer {}", api_key))
                .header("Content-Type", "application/json")
                .body(body)
        })
        .await
    }

    /// Execute one request built by `build_request`, returning the body on 2xx.
    ///
    /// Non-2xx statuses become `GatewayError::Status` with the body kept for
    /// logging; send failures become `Timeout` or `Transport`.
    pub async fn execute<F>(
        &self,
        provider: Provider,
        request_id: &str,
        body: String,
        build_request: F,
    ) -> Result<String, GatewayError>
    where
        F: FnOnce(&Client, String) -> reqwest::RequestBuilder,
    {
        let response = build_request(&self.client, body)
            .send()
            .await
            .map_err(|e| {
                warn!(request_id = %request_id, provider = %provider, error = %e, "Provider request failed");
                GatewayError::from_reqwest(provider, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(
                request_id = %request_id,
                provider = %provider,
                status = %status,
                "Provider returned error status"
            );
            debug!(request_id = %request_id, body = %error_body, "Provider error body");
            return Err(GatewayError::Status {
                provider,
                status: status.as_u16(),
                body: error_body,
            });
        }

        response
            .text()
            .await
            .map_err(|e| GatewayError::from_reqwest(provider, e))
    }
}

/// Decode a provider body into its typed response
pub fn decode<T: DeserializeOwned>(provider: Provider, body: &str) -> Result<T, GatewayError> {
    serde_json::from_str(body).map_err(|e| GatewayError::Decode {
        provider,
        message: e.to_string(),
    })
}
