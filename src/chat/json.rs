// src/chat/json.rs
// Parsing of JSON emitted by text-completion models

use serde::de::DeserializeOwned;

use crate::error::{ChatError, Result};

const FENCE: &str = "```";

/// Strip one optional Markdown code fence (``` or ```json) around a model reply.
///
/// Text outside the fence is dropped. An unterminated fence keeps everything
/// after the opening line.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    let inner = match rest.find(FENCE) {
        Some(end) => &rest[..end],
        None => rest,
    };

    let inner = inner
        .strip_prefix("json")
        .or_else(|| inner.strip_prefix("JSON"))
        .unwrap_or(inner);

    inner.trim()
}

/// Parse a model reply as JSON of type `T`, tolerating a code fence.
///
/// Any failure is an `UpstreamParse` error: the reply is not retried.
pub fn parse_model_json<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let body = strip_code_fence(raw);
    serde_json::from_str(body).map_err(|e| ChatError::UpstreamParse(e.to_string()))
}
