// src/chat/types.rs
// Request, intent, result and envelope types for the chat-report endpoint

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::llm::{ChatMessage, Role};

/// One prior message supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl From<&ConversationTurn> for ChatMessage {
    fn from(turn: &ConversationTurn) -> Self {
        ChatMessage {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

/// Inbound request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            history: Vec::new(),
        }
    }
}

/// The last `limit` turns of a history, oldest first
pub fn recent_turns(history: &[ConversationTurn], limit: usize) -> &[ConversationTurn] {
    &history[history.len().saturating_sub(limit)..]
}

/// What the user is asking for. Decided once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    #[serde(rename = "schematic")]
    Diagram,
    #[serde(rename = "pdf_report")]
    Document,
    #[serde(rename = "chat")]
    Conversation,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Diagram => "schematic",
            Intent::Document => "pdf_report",
            Intent::Conversation => "chat",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub intent: Intent,
    pub subject: String,
}

/// Output of exactly one generator
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult {
    Image {
        image_data: Vec<u8>,
        mime_type: String,
        message: String,
    },
    Text {
        message: String,
    },
    Document {
        artifact_id: String,
        artifact_url: String,
        message: String,
    },
}

impl GenerationResult {
    pub fn text(message: impl Into<String>) -> Self {
        GenerationResult::Text {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            GenerationResult::Image { message, .. }
            | GenerationResult::Text { message }
            | GenerationResult::Document { message, .. } => message,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GenerationResult::Image { .. } => "image",
            GenerationResult::Text { .. } => "text",
            GenerationResult::Document { .. } => "pdf",
        }
    }
}

/// Wire response: `{intent, type, message, ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub intent: Intent,
    #[serde(flatten)]
    pub body: EnvelopeBody,
}

/// Variant fields, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EnvelopeBody {
    Image {
        /// `data:<mime>;base64,<payload>`
        #[serde(rename = "imageUrl")]
        image_url: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
        message: String,
    },
    Text {
        message: String,
    },
    Pdf {
        #[serde(rename = "pdfUrl")]
        pdf_url: String,
        #[serde(rename = "pdfFilename")]
        pdf_filename: String,
        message: String,
    },
}

impl ResponseEnvelope {
    pub fn new(intent: Intent, result: GenerationResult) -> Self {
        let body = match result {
            GenerationResult::Image {
                image_data,
                mime_type,
                message,
            } => EnvelopeBody::Image {
                image_url: format!("data:{};base64,{}", mime_type, BASE64.encode(&image_data)),
                mime_type,
                message,
            },
            GenerationResult::Text { message } => EnvelopeBody::Text { message },
            GenerationResult::Document {
                artifact_id,
                artifact_url,
                message,
            } => EnvelopeBody::Pdf {
                pdf_url: artifact_url,
                pdf_filename: crate::report::artifact_file_name(&artifact_id),
                message,
            },
        };
        Self { intent, body }
    }

    pub fn message(&self) -> &str {
        match &self.body {
            EnvelopeBody::Image { message, .. }
            | EnvelopeBody::Text { message }
            | EnvelopeBody::Pdf { message, .. } => message,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self.body {
            EnvelopeBody::Image { .. } => "image",
            EnvelopeBody::Text { .. } => "text",
            EnvelopeBody::Pdf { .. } => "pdf",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn turn(i: usize) -> ConversationTurn {
        ConversationTurn {
            role: if i % 2 == 0 { Role::User } else { Role::Assistant },
            content: format!("turn {}", i),
        }
    }

    // ============================================================================
    // Request tests
    // ============================================================================

    #[test]
    fn test_request_history_defaults_to_empty() {
        let req: ChatRequest = serde_json::from_value(json!({"message": "hi"})).unwrap();
        assert!(req.history.is_empty());
    }

    #[test]
    fn test_request_rejects_unknown_role() {
        let result = serde_json::from_value::<ChatRequest>(json!({
            "message": "hi",
            "history": [{"role": "narrator", "content": "x"}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_recent_turns_keeps_tail() {
        let history: Vec<_> = (0..9).map(turn).collect();
        let recent = recent_turns(&history, 6);
        assert_eq!(recent.len(), 6);
        assert_eq!(recent[0].content, "turn 3");
        assert_eq!(recent[5].content, "turn 8");
        assert_eq!(recent_turns(&history[..2], 6).len(), 2);
        assert!(recent_turns(&[], 10).is_empty());
    }

    // ============================================================================
    // Intent tests
    // ============================================================================

    #[test]
    fn test_intent_wire_tags() {
        assert_eq!(serde_json::to_value(Intent::Diagram).unwrap(), "schematic");
        assert_eq!(serde_json::to_value(Intent::Document).unwrap(), "pdf_report");
        assert_eq!(serde_json::to_value(Intent::Conversation).unwrap(), "chat");
        assert!(serde_json::from_str::<Intent>("\"email\"").is_err());
    }

    // ============================================================================
    // Envelope tests
    // ============================================================================

    #[test]
    fn test_image_envelope_builds_data_url() {
        let envelope = ResponseEnvelope::new(
            Intent::Diagram,
            GenerationResult::Image {
                image_data: b"hello".to_vec(),
                mime_type: "image/png".to_string(),
                message: "Here is the schematic for: loft".to_string(),
            },
        );
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["intent"], "schematic");
        assert_eq!(json["type"], "image");
        assert_eq!(json["imageUrl"], "data:image/png;base64,aGVsbG8=");
        assert_eq!(json["mimeType"], "image/png");
        assert_eq!(json["message"], "Here is the schematic for: loft");
    }

    #[test]
    fn test_text_envelope_has_only_message() {
        let envelope =
            ResponseEnvelope::new(Intent::Conversation, GenerationResult::text("Cap rates vary."));
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            json!({"intent": "chat", "type": "text", "message": "Cap rates vary."})
        );
    }

    #[test]
    fn test_pdf_envelope_fields() {
        let envelope = ResponseEnvelope::new(
            Intent::Document,
            GenerationResult::Document {
                artifact_id: "report_0a1b2c3d".to_string(),
                artifact_url: "http://localhost:8000/generated/report_0a1b2c3d.pdf".to_string(),
                message: "ready".to_string(),
            },
        );
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["type"], "pdf");
        assert_eq!(json["pdfFilename"], "report_0a1b2c3d.pdf");
        assert_eq!(
            json["pdfUrl"],
            "http://localhost:8000/generated/report_0a1b2c3d.pdf"
        );
        assert_eq!(envelope.kind(), "pdf");
    }

    #[test]
    fn test_envelope_round_trips_through_json() {
        let envelope = ResponseEnvelope::new(Intent::Diagram, GenerationResult::text("fallback"));
        let json = serde_json::to_string(&envelope).unwrap();
        let back: ResponseEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back, envelope);
        assert_eq!(back.message(), "fallback");
    }
}
