// src/llm/mod.rs
// Provider gateway: text completion (OpenAI), image prediction (Imagen),
// multimodal generation (Gemini)

pub mod gemini;
pub mod http_client;
pub mod imagen;
pub mod logging;
pub mod openai;
mod provider;

pub use gemini::GeminiClient;
pub use imagen::{ImagenClient, PredictResponse, Prediction};
pub use openai::OpenAiClient;
pub use provider::{
    ChatMessage, CompletionRequest, ContentGenerator, ImagePredictor, Provider, ResponseModality,
    Role, TextCompletion,
};
