// src/chat/diagram.rs
// Schematic generation with tiered provider fallback
//
// TierA (image predictor) -> TierB (multimodal generator) -> TierC (text
// description). Each tier is attempted once; a tier is left only when its
// call errors or comes back without usable image data.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use super::prompts::{ARCHITECT_SYSTEM, floor_plan_description_request, schematic_prompt};
use super::types::GenerationResult;
use crate::error::{ChatError, GatewayError, Result};
use crate::llm::gemini::extraction::{extract_inline_image, extract_text, finish_reason};
use crate::llm::gemini::types::GenerateContentResponse;
use crate::llm::{
    ChatMessage, CompletionRequest, ContentGenerator, ImagePredictor, PredictResponse, Provider,
    ResponseModality, TextCompletion,
};

const DEFAULT_IMAGE_MIME: &str = "image/png";
const SAMPLE_COUNT: u32 = 1;
const DESCRIPTION_MAX_TOKENS: u32 = 400;
const SECONDARY_MODALITIES: [ResponseModality; 2] =
    [ResponseModality::Text, ResponseModality::Image];

/// Position in the fallback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramState {
    TierA,
    TierB,
    TierC,
    Done,
}

impl DiagramState {
    /// Next state after the current tier failed to produce a result
    pub fn on_failure(self) -> Self {
        match self {
            DiagramState::TierA => DiagramState::TierB,
            DiagramState::TierB => DiagramState::TierC,
            DiagramState::TierC | DiagramState::Done => DiagramState::Done,
        }
    }
}

impl fmt::Display for DiagramState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramState::TierA => write!(f, "tier_a"),
            DiagramState::TierB => write!(f, "tier_b"),
            DiagramState::TierC => write!(f, "tier_c"),
            DiagramState::Done => write!(f, "done"),
        }
    }
}

/// Outcome of evaluating one image tier's response
#[derive(Debug, Clone, PartialEq)]
pub enum TierAttempt {
    Produced(GenerationResult),
    Failed(String),
}

/// Why a tier was left, in user-presentable form
#[derive(Debug, Clone, PartialEq)]
pub struct TierFailure {
    pub provider: Provider,
    pub reason: String,
}

impl fmt::Display for TierFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.provider, self.reason)
    }
}

fn schematic_message(subject: &str) -> String {
    format!("Here is the schematic for: {}", subject)
}

fn decode_image(subject: &str, mime_type: Option<&str>, b64: &str) -> TierAttempt {
    match BASE64.decode(b64.trim()) {
        Ok(image_data) if !image_data.is_empty() => TierAttempt::Produced(GenerationResult::Image {
            image_data,
            mime_type: mime_type
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_IMAGE_MIME)
                .to_string(),
            message: schematic_message(subject),
        }),
        Ok(_) => TierAttempt::Failed("returned no image".to_string()),
        Err(_) => TierAttempt::Failed("returned undecodable image data".to_string()),
    }
}

/// TierA succeeds only on an OK response whose first prediction carries a
/// non-empty, decodable payload
pub fn evaluate_primary(
    subject: &str,
    outcome: std::result::Result<PredictResponse, GatewayError>,
) -> TierAttempt {
    let response = match outcome {
        Ok(response) => response,
        Err(e) => return TierAttempt::Failed(e.summary()),
    };

    match response.first_image() {
        Some(prediction) => decode_image(
            subject,
            prediction.mime_type.as_deref(),
            prediction.bytes_base64_encoded.as_deref().unwrap_or_default(),
        ),
        None => TierAttempt::Failed("returned no image".to_string()),
    }
}

/// TierB succeeds on an inline image part. Text-only content is a degraded
/// success and is returned as prose.
pub fn evaluate_secondary(
    subject: &str,
    outcome: std::result::Result<GenerateContentResponse, GatewayError>,
) -> TierAttempt {
    let response = match outcome {
        Ok(response) => response,
        Err(e) => return TierAttempt::Failed(e.summary()),
    };

    let mut reason = "returned no image".to_string();
    if let Some(inline) = extract_inline_image(&response) {
        match decode_image(subject, inline.mime_type.as_deref(), &inline.data) {
            produced @ TierAttempt::Produced(_) => return produced,
            TierAttempt::Failed(decode_failure) => reason = decode_failure,
        }
    }

    if let Some(text) = extract_text(&response) {
        return TierAttempt::Produced(GenerationResult::text(text));
    }

    match finish_reason(&response) {
        Some(finish) if finish != "STOP" => {
            TierAttempt::Failed(format!("{} (finish reason {})", reason, finish))
        }
        _ => TierAttempt::Failed(reason),
    }
}

/// Message shown when both image tiers failed
pub fn unavailable_message(failures: &[TierFailure], description: &str) -> String {
    let detail = failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    format!(
        "⚠️ Image generation unavailable ({}). Here is a text description instead:\n\n{}",
        detail, description
    )
}

pub struct DiagramGenerator {
    image: Arc<dyn ImagePredictor>,
    multimodal: Arc<dyn ContentGenerator>,
    text: Arc<dyn TextCompletion>,
}

impl DiagramGenerator {
    pub fn new(
        image: Arc<dyn ImagePredictor>,
        multimodal: Arc<dyn ContentGenerator>,
        text: Arc<dyn TextCompletion>,
    ) -> Self {
        Self {
            image,
            multimodal,
            text,
        }
    }

    /// Run the fallback chain. Only a failure of the final text call is an error.
    pub async fn generate(&self, subject: &str) -> Result<GenerationResult> {
        let prompt = schematic_prompt(subject);
        let mut failures: Vec<TierFailure> = Vec::new();
        let mut state = DiagramState::TierA;
        let mut outcome = None;

        while outcome.is_none() {
            let (provider, attempt) = match state {
                DiagramState::TierA => {
                    let response = self.image.predict(&prompt, SAMPLE_COUNT).await;
                    (
                        self.image.provider_type(),
                        evaluate_primary(subject, response),
                    )
                }
                DiagramState::TierB => {
                    let response = self
                        .multimodal
                        .generate_content(&prompt, &SECONDARY_MODALITIES)
                        .await;
                    (
                        self.multimodal.provider_type(),
                        evaluate_secondary(subject, response),
                    )
                }
                DiagramState::TierC => (
                    self.text.provider_type(),
                    TierAttempt::Produced(self.describe_instead(subject, &failures).await?),
                ),
                DiagramState::Done => break,
            };

            match attempt {
                TierAttempt::Produced(result) => {
                    info!(tier = %state, provider = %provider, kind = result.kind(), "Schematic tier produced a result");
                    outcome = Some(result);
                    state = DiagramState::Done;
                }
                TierAttempt::Failed(reason) => {
                    warn!(tier = %state, provider = %provider, reason = %reason, "Schematic tier failed, falling back");
                    failures.push(TierFailure {
                        provider,
                        reason,
                    });
                    state = state.on_failure();
                }
            }
        }

        outcome.ok_or_else(|| {
            ChatError::Internal("schematic fallback chain ended without a result".to_string())
        })
    }

    async fn describe_instead(
        &self,
        subject: &str,
        failures: &[TierFailure],
    ) -> Result<GenerationResult> {
        let request = CompletionRequest {
            messages: vec![
                ChatMessage::system(ARCHITECT_SYSTEM),
                ChatMessage::user(floor_plan_description_request(subject)),
            ],
            temperature: None,
            max_tokens: DESCRIPTION_MAX_TOKENS,
        };
        let description = self.text.complete(request).await?;
        Ok(GenerationResult::text(unavailable_message(
            failures,
            &description,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::test_support::{
        ScriptedCompletion, ScriptedGenerator, ScriptedPredictor, content_response, inline_part,
        prediction, status_error, text_part,
    };
    use crate::chat::types::{Intent, ResponseEnvelope};

    // "hello"
    const PNG_B64: &str = "aGVsbG8=";

    struct Fakes {
        image: Arc<ScriptedPredictor>,
        multimodal: Arc<ScriptedGenerator>,
        text: Arc<ScriptedCompletion>,
    }

    impl Fakes {
        fn new() -> Self {
            Self {
                image: Arc::new(ScriptedPredictor::default()),
                multimodal: Arc::new(ScriptedGenerator::default()),
                text: Arc::new(ScriptedCompletion::default()),
            }
        }

        fn generator(&self) -> DiagramGenerator {
            DiagramGenerator::new(
                self.image.clone(),
                self.multimodal.clone(),
                self.text.clone(),
            )
        }
    }

    // ============================================================================
    // State transitions
    // ============================================================================

    #[test]
    fn test_failure_transitions() {
        assert_eq!(DiagramState::TierA.on_failure(), DiagramState::TierB);
        assert_eq!(DiagramState::TierB.on_failure(), DiagramState::TierC);
        assert_eq!(DiagramState::TierC.on_failure(), DiagramState::Done);
        assert_eq!(DiagramState::Done.on_failure(), DiagramState::Done);
    }

    // ============================================================================
    // Tier predicates
    // ============================================================================

    #[test]
    fn test_primary_success_decodes_payload() {
        let attempt = evaluate_primary("loft", Ok(prediction("image/jpeg", PNG_B64)));
        assert_eq!(
            attempt,
            TierAttempt::Produced(GenerationResult::Image {
                image_data: b"hello".to_vec(),
                mime_type: "image/jpeg".to_string(),
                message: "Here is the schematic for: loft".to_string(),
            })
        );
    }

    #[test]
    fn test_primary_mime_defaults_to_png() {
        let response = PredictResponse {
            predictions: vec![crate::llm::Prediction {
                bytes_base64_encoded: Some(PNG_B64.to_string()),
                mime_type: None,
            }],
        };
        match evaluate_primary("loft", Ok(response)) {
            TierAttempt::Produced(GenerationResult::Image { mime_type, .. }) => {
                assert_eq!(mime_type, "image/png")
            }
            other => panic!("expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_primary_empty_or_error_fails() {
        assert_eq!(
            evaluate_primary("x", Ok(PredictResponse::default())),
            TierAttempt::Failed("returned no image".to_string())
        );
        assert_eq!(
            evaluate_primary("x", Ok(prediction("image/png", ""))),
            TierAttempt::Failed("returned no image".to_string())
        );
        assert_eq!(
            evaluate_primary("x", Err(status_error(Provider::Imagen, 503))),
            TierAttempt::Failed("HTTP 503".to_string())
        );
        assert_eq!(
            evaluate_primary("x", Ok(prediction("image/png", "not base64!"))),
            TierAttempt::Failed("returned undecodable image data".to_string())
        );
    }

    #[test]
    fn test_secondary_prefers_image_over_text() {
        let response = content_response(vec![
            text_part("Here you go"),
            inline_part("image/png", PNG_B64),
        ]);
        assert!(matches!(
            evaluate_secondary("x", Ok(response)),
            TierAttempt::Produced(GenerationResult::Image { .. })
        ));
    }

    #[test]
    fn test_secondary_text_only_is_degraded_success() {
        let response = content_response(vec![text_part("A hall"), text_part("and two rooms.")]);
        assert_eq!(
            evaluate_secondary("x", Ok(response)),
            TierAttempt::Produced(GenerationResult::text("A hall and two rooms."))
        );
    }

    #[test]
    fn test_secondary_undecodable_image_keeps_reason() {
        let response = content_response(vec![inline_part("image/png", "not base64!")]);
        assert_eq!(
            evaluate_secondary("x", Ok(response)),
            TierAttempt::Failed("returned undecodable image data".to_string())
        );
    }

    #[test]
    fn test_secondary_undecodable_image_with_text_returns_text() {
        let response = content_response(vec![
            inline_part("image/png", "not base64!"),
            text_part("A galley kitchen."),
        ]);
        assert_eq!(
            evaluate_secondary("x", Ok(response)),
            TierAttempt::Produced(GenerationResult::text("A galley kitchen."))
        );
    }

    #[test]
    fn test_secondary_blocked_candidate_reports_finish_reason() {
        let response = GenerateContentResponse {
            candidates: vec![crate::llm::gemini::types::Candidate {
                content: None,
                finish_reason: Some("SAFETY".to_string()),
            }],
        };
        assert_eq!(
            evaluate_secondary("x", Ok(response)),
            TierAttempt::Failed("returned no image (finish reason SAFETY)".to_string())
        );
    }

    #[test]
    fn test_secondary_empty_candidates_fail() {
        assert_eq!(
            evaluate_secondary("x", Ok(GenerateContentResponse::default())),
            TierAttempt::Failed("returned no image".to_string())
        );
    }

    // ============================================================================
    // Fallback chain
    // ============================================================================

    #[tokio::test]
    async fn test_tier_a_success_skips_other_tiers() {
        let fakes = Fakes::new();
        fakes.image.push(Ok(prediction("image/png", PNG_B64)));

        let result = fakes.generator().generate("studio apartment").await.unwrap();

        assert_eq!(result.kind(), "image");
        assert_eq!(result.message(), "Here is the schematic for: studio apartment");
        assert_eq!(fakes.image.call_count(), 1);
        assert_eq!(fakes.multimodal.call_count(), 0);
        assert_eq!(fakes.text.call_count(), 0);

        let prompts = fakes.image.prompts.lock().unwrap();
        assert_eq!(prompts[0].1, 1);
        assert!(prompts[0].0.contains("studio apartment"));
    }

    #[tokio::test]
    async fn test_empty_tier_a_falls_through_to_tier_b_image() {
        let fakes = Fakes::new();
        fakes.image.push(Ok(PredictResponse::default()));
        fakes.multimodal.push(Ok(content_response(vec![inline_part(
            "image/webp",
            PNG_B64,
        )])));

        let result = fakes.generator().generate("duplex").await.unwrap();

        match result {
            GenerationResult::Image { mime_type, .. } => assert_eq!(mime_type, "image/webp"),
            other => panic!("expected image, got {:?}", other),
        }
        assert_eq!(fakes.text.call_count(), 0);

        let calls = fakes.multimodal.calls.lock().unwrap();
        assert_eq!(
            calls[0].1,
            vec![ResponseModality::Text, ResponseModality::Image]
        );
    }

    #[tokio::test]
    async fn test_both_image_tiers_failing_degrades_to_text() {
        let fakes = Fakes::new();
        fakes.image.push(Err(status_error(Provider::Imagen, 503)));
        fakes.multimodal.push(Ok(GenerateContentResponse::default()));
        fakes.text.push(Ok("An open-plan living area...".to_string()));

        let result = fakes.generator().generate("bungalow").await.unwrap();

        let message = result.message();
        assert_eq!(result.kind(), "text");
        assert!(message.starts_with("⚠️ Image generation unavailable ("));
        assert!(message.contains("imagen: HTTP 503; gemini: returned no image"));
        assert!(message.ends_with("instead:\n\nAn open-plan living area..."));
        assert!(!message.contains("\"error\""));

        let request = fakes.text.last_call().unwrap();
        assert_eq!(request.max_tokens, 400);
        assert_eq!(request.temperature, None);
        assert_eq!(
            request.messages[1].content,
            "Describe a floor plan for: bungalow"
        );
    }

    #[tokio::test]
    async fn test_tier_c_failure_is_call_error() {
        let fakes = Fakes::new();
        fakes.image.push(Err(status_error(Provider::Imagen, 500)));
        fakes.multimodal.push(Err(status_error(Provider::Gemini, 429)));
        fakes.text.push(Err(status_error(Provider::OpenAi, 500)));

        let err = fakes.generator().generate("barn").await.unwrap_err();
        assert!(matches!(err, ChatError::UpstreamCall(_)));
    }

    #[tokio::test]
    async fn test_same_responses_give_same_result() {
        let run = || async {
            let fakes = Fakes::new();
            fakes.image.push(Ok(PredictResponse::default()));
            fakes.multimodal.push(Ok(content_response(vec![text_part("Two rooms.")])));
            fakes.generator().generate("cabin").await.unwrap()
        };
        assert_eq!(run().await, run().await);
    }

    #[tokio::test]
    async fn test_same_tier_a_image_gives_same_payload() {
        let run = || async {
            let fakes = Fakes::new();
            fakes.image.push(Ok(prediction("image/png", PNG_B64)));
            fakes.generator().generate("cabin").await.unwrap()
        };
        let (first, second) = (run().await, run().await);

        assert!(matches!(first, GenerationResult::Image { .. }));
        assert_eq!(first, second);

        let envelope = |result| {
            serde_json::to_string(&ResponseEnvelope::new(Intent::Diagram, result)).unwrap()
        };
        let (first, second) = (envelope(first), envelope(second));
        assert_eq!(first, second);
        assert!(first.contains("data:image/png;base64,aGVsbG8="));
    }

    #[tokio::test]
    async fn test_same_tier_b_image_gives_same_payload() {
        let run = || async {
            let fakes = Fakes::new();
            fakes.image.push(Err(status_error(Provider::Imagen, 500)));
            fakes.multimodal.push(Ok(content_response(vec![
                text_part("Plan attached."),
                inline_part("image/jpeg", PNG_B64),
            ])));
            fakes.generator().generate("cabin").await.unwrap()
        };
        let (first, second) = (run().await, run().await);

        match &first {
            GenerationResult::Image {
                image_data,
                mime_type,
                ..
            } => {
                assert_eq!(image_data, b"hello");
                assert_eq!(mime_type, "image/jpeg");
            }
            other => panic!("expected image, got {:?}", other),
        }
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_value(ResponseEnvelope::new(Intent::Diagram, first)).unwrap(),
            serde_json::to_value(ResponseEnvelope::new(Intent::Diagram, second)).unwrap()
        );
    }
}
