// src/llm/provider.rs
// Capability traits shared by all provider clients

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::gemini::types::GenerateContentResponse;
use super::imagen::PredictResponse;
use crate::error::GatewayError;

/// External providers this service talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Imagen,
    Gemini,
}

impl Provider {
    /// Environment variable holding this provider's API key
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Imagen | Self::Gemini => "GOOGLE_API_KEY",
        }
    }

    /// Default model for this provider
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::Imagen => "imagen-4.0-fast-generate-001",
            Self::Gemini => "gemini-2.0-flash-exp-image-generation",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Imagen => write!(f, "imagen"),
            Self::Gemini => write!(f, "gemini"),
        }
    }
}

/// Message author role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Message format sent to text-completion providers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A single text-completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    /// `None` leaves sampling at the provider default
    pub temperature: Option<f32>,
    pub max_tokens: u32,
}

/// Output kinds a multimodal provider may be asked to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseModality {
    Text,
    Image,
}

/// Text completion capability
#[async_trait]
pub trait TextCompletion: Send + Sync {
    fn provider_type(&self) -> Provider;

    /// Returns the completion text of the first choice
    async fn complete(&self, request: CompletionRequest) -> Result<String, GatewayError>;
}

/// "predict"-style image generation capability
#[async_trait]
pub trait ImagePredictor: Send + Sync {
    fn provider_type(&self) -> Provider;

    async fn predict(
        &self,
        prompt: &str,
        sample_count: u32,
    ) -> Result<PredictResponse, GatewayError>;
}

/// "generate content" multimodal capability
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    fn provider_type(&self) -> Provider;

    async fn generate_content(
        &self,
        prompt: &str,
        modalities: &[ResponseModality],
    ) -> Result<GenerateContentResponse, GatewayError>;
}
