// src/llm/gemini/extraction.rs
// Response extraction helpers for Gemini generateContent responses

use super::types::{ContentPart, GenerateContentResponse, InlineData};

fn first_candidate_parts(response: &GenerateContentResponse) -> &[ContentPart] {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|c| c.parts.as_slice())
        .unwrap_or(&[])
}

/// First inline-data part with a non-empty payload
pub fn extract_inline_image(response: &GenerateContentResponse) -> Option<&InlineData> {
    first_candidate_parts(response).iter().find_map(|part| match part {
        ContentPart::InlineData { inline_data } if !inline_data.data.is_empty() => {
            Some(inline_data)
        }
        _ => None,
    })
}

/// Why the first candidate stopped, when the provider says so
pub fn finish_reason(response: &GenerateContentResponse) -> Option<&str> {
    response
        .candidates
        .first()
        .and_then(|c| c.finish_reason.as_deref())
}

/// Text parts joined with a single space
pub fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let text_parts: Vec<&str> = first_candidate_parts(response)
        .iter()
        .filter_map(|part| match part {
            ContentPart::Text { text } => Some(text.as_str()),
            ContentPart::InlineData { .. } => None,
        })
        .collect();

    if text_parts.is_empty() {
        None
    } else {
        Some(text_parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Provider;
    use crate::llm::http_client::decode;

    fn parse(body: &str) -> GenerateContentResponse {
        decode(Provider::Gemini, body).unwrap()
    }

    // ============================================================================
    // extract_inline_image tests
    // ============================================================================

    #[test]
    fn test_inline_image_found_after_text() {
        let response = parse(
            r#"{"candidates": [{"content": {"role": "model", "parts": [
                {"text": "Here you go"},
                {"inlineData": {"mimeType": "image/png", "data": "aGVsbG8="}}
            ]}}]}"#,
        );
        let image = extract_inline_image(&response).unwrap();
        assert_eq!(image.mime_type.as_deref(), Some("image/png"));
        assert_eq!(image.data, "aGVsbG8=");
    }

    #[test]
    fn test_inline_image_skips_empty_data() {
        let response = parse(
            r#"{"candidates": [{"content": {"parts": [
                {"inlineData": {"mimeType": "image/png", "data": ""}}
            ]}}]}"#,
        );
        assert!(extract_inline_image(&response).is_none());
    }

    #[test]
    fn test_no_candidates() {
        let response = parse("{}");
        assert!(extract_inline_image(&response).is_none());
        assert!(extract_text(&response).is_none());
    }

    #[test]
    fn test_blocked_candidate_without_content() {
        let response = parse(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#);
        assert!(extract_inline_image(&response).is_none());
        assert!(extract_text(&response).is_none());
        assert_eq!(finish_reason(&response), Some("SAFETY"));
    }

    // ============================================================================
    // extract_text tests
    // ============================================================================

    #[test]
    fn test_text_parts_joined_with_space() {
        let response = parse(
            r#"{"candidates": [{"content": {"parts": [
                {"text": "I cannot draw that."},
                {"text": "Here is a description."}
            ]}}]}"#,
        );
        assert_eq!(
            extract_text(&response).as_deref(),
            Some("I cannot draw that. Here is a description.")
        );
    }

    // ============================================================================
    // Shape validation
    // ============================================================================

    #[test]
    fn test_unknown_part_shape_is_rejected() {
        let result = decode::<GenerateContentResponse>(
            Provider::Gemini,
            r#"{"candidates": [{"content": {"parts": [{"functionCall": {"name": "x"}}]}}]}"#,
        );
        assert!(result.is_err());
    }
}
