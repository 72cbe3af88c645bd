// src/chat/mod.rs
// Intent-routed chat: classification, generators and request orchestration

pub mod classifier;
pub mod conversation;
pub mod diagram;
pub mod document;
pub mod json;
pub mod orchestrator;
pub mod prompts;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use orchestrator::ChatReportService;
pub use types::{
    ChatRequest, ClassificationResult, ConversationTurn, EnvelopeBody, GenerationResult, Intent,
    ResponseEnvelope,
};
