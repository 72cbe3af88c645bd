// src/error.rs
// Error types for provider calls and chat request handling

use thiserror::Error;

use crate::llm::Provider;

/// Failure of a single call to an external generative capability.
///
/// Every call is attempted once; callers decide whether a failure is
/// terminal or moves them to another capability.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{provider} returned HTTP {status}")]
    Status {
        provider: Provider,
        status: u16,
        body: String,
    },

    #[error("{provider} request timed out")]
    Timeout { provider: Provider },

    #[error("{provider} request failed: {message}")]
    Transport { provider: Provider, message: String },

    #[error("{provider} response did not match the expected shape: {message}")]
    Decode { provider: Provider, message: String },

    #[error("{provider} returned an empty completion")]
    EmptyCompletion { provider: Provider },
}

impl GatewayError {
    /// Map a reqwest send/read failure, keeping timeouts distinguishable
    pub fn from_reqwest(provider: Provider, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout { provider }
        } else {
            GatewayError::Transport {
                provider,
                message: err.to_string(),
            }
        }
    }

    pub fn provider(&self) -> Provider {
        match self {
            GatewayError::Status { provider, .. }
            | GatewayError::Timeout { provider }
            | GatewayError::Transport { provider, .. }
            | GatewayError::Decode { provider, .. }
            | GatewayError::EmptyCompletion { provider } => *provider,
        }
    }

    /// Short description without response bodies, safe to show to end users
    pub fn summary(&self) -> String {
        match self {
            GatewayError::Status { status, .. } => format!("HTTP {}", status),
            GatewayError::Timeout { .. } => "timed out".to_string(),
            GatewayError::Transport { .. } => "connection failed".to_string(),
            GatewayError::Decode { .. } => "unexpected response shape".to_string(),
            GatewayError::EmptyCompletion { .. } => "empty response".to_string(),
        }
    }
}

/// Errors surfaced by the chat-report pipeline
#[derive(Error, Debug)]
pub enum ChatError {
    /// A capability answered, but its text could not be parsed into the
    /// structure we asked for
    #[error("{0}")]
    UpstreamParse(String),

    #[error(transparent)]
    UpstreamCall(#[from] GatewayError),

    #[error("report rendering failed: {0}")]
    Render(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ChatError {
    pub fn is_parse_error(&self) -> bool {
        matches!(self, ChatError::UpstreamParse(_))
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::UpstreamParse(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ChatError {
    fn from(err: tokio::task::JoinError) -> Self {
        ChatError::Internal(err.to_string())
    }
}

/// Convenience type alias for Result using ChatError
pub type Result<T> = std::result::Result<T, ChatError>;
