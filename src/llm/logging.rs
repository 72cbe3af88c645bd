// src/llm/logging.rs
// Shared logging helpers for provider clients

use tracing::info;

/// Token usage reported by a text-completion provider
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Log usage statistics for an LLM call.
pub fn log_usage(request_id: &str, provider: &str, usage: &Usage) {
    info!(
        request_id = %request_id,
        prompt_tokens = usage.prompt_tokens,
        completion_tokens = usage.completion_tokens,
        total_tokens = usage.total_tokens,
        "{} usage stats", provider
    );
}

/// Log completion summary for any provider call.
pub fn log_completion(request_id: &str, provider: &str, duration_ms: u64, output_len: usize) {
    info!(
        request_id = %request_id,
        duration_ms = duration_ms,
        output_len = output_len,
        "{} call complete", provider
    );
}
