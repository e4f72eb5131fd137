//! Gemini `generateContent` request and response bodies.

use crate::image::GenerationRequest;
use serde::{Deserialize, Serialize};

/// Response modality that restricts the service to image output.
pub const IMAGE_MODALITY: &str = "IMAGE";

/// Body of a `generateContent` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns; always a single turn here.
    pub contents: Vec<Content>,
    /// Output constraints.
    pub generation_config: GenerationConfig,
}

/// One turn of request content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Ordered request parts.
    pub parts: Vec<RequestPart>,
}

/// A part in a request - either inline image data or text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestPart {
    /// Inline binary data.
    InlineData {
        /// The encoded bytes and their media type.
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    /// Plain text.
    Text {
        /// The text itself.
        text: String,
    },
}

/// Base64 bytes tagged with a media type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// Media type of the decoded bytes.
    #[serde(default)]
    pub mime_type: String,
    /// Standard base64 payload.
    #[serde(default)]
    pub data: String,
}

/// Generation settings sent with the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Accepted output modalities.
    pub response_modalities: Vec<String>,
}

impl GenerateContentRequest {
    /// Builds the wire body: image part first, then the prompt, image-only output.
    pub fn from_generation_request(req: &GenerationRequest) -> Self {
        let parts = vec![
            RequestPart::InlineData {
                inline_data: InlineData {
                    mime_type: req.image.mime_type.clone(),
                    data: req.image.data.clone(),
                },
            },
            RequestPart::Text {
                text: req.prompt.clone(),
            },
        ];

        Self {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_modalities: vec![IMAGE_MODALITY.to_string()],
            },
        }
    }

    /// Returns the inline image of the first turn, if any.
    pub fn inline_image(&self) -> Option<&InlineData> {
        self.contents.first()?.parts.iter().find_map(|p| match p {
            RequestPart::InlineData { inline_data } => Some(inline_data),
            RequestPart::Text { .. } => None,
        })
    }

    /// Returns the prompt text of the first turn, if any.
    pub fn prompt(&self) -> Option<&str> {
        self.contents.first()?.parts.iter().find_map(|p| match p {
            RequestPart::Text { text } => Some(text.as_str()),
            RequestPart::InlineData { .. } => None,
        })
    }
}

/// Body returned by `generateContent`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Alternative responses, in service order.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Set when the prompt itself was blocked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// One alternative response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Content of the candidate; absent when generation was stopped early.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<CandidateContent>,
    /// Why generation stopped (`STOP`, `IMAGE_SAFETY`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Parts of a candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateContent {
    /// Ordered response parts.
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// A part in a response. Any combination of fields may be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    /// Text output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Inline binary output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

/// Prompt-level feedback from the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Reason the prompt was blocked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

/// Finds the first inline image in the first candidate.
///
/// Parts are scanned in order and the first one carrying non-empty inline
/// data wins. Later candidates are never consulted.
pub fn first_inline_image(response: &GenerateContentResponse) -> Option<&InlineData> {
    response
        .candidates
        .first()?
        .content
        .as_ref()?
        .parts
        .iter()
        .filter_map(|p| p.inline_data.as_ref())
        .find(|d| !d.data.is_empty())
}

/// Best available explanation for a response without an image.
pub fn missing_image_reason(response: &GenerateContentResponse) -> Option<String> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_ref())
    {
        return Some(format!("prompt blocked: {reason}"));
    }

    match response.candidates.first() {
        None => Some("no candidates".to_string()),
        Some(candidate) => candidate
            .finish_reason
            .as_ref()
            .filter(|r| r.as_str() != "STOP")
            .map(|r| format!("finish reason: {r}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::EncodedImage;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new(
            EncodedImage {
                mime_type: "image/png".into(),
                data: "iVBORw0KGgo=".into(),
            },
            "Put this logo on a mug",
        )
    }

    #[test]
    fn test_request_serialization() {
        let body = GenerateContentRequest::from_generation_request(&request());
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "contents": [{
                    "parts": [
                        {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}},
                        {"text": "Put this logo on a mug"}
                    ]
                }],
                "generationConfig": {"responseModalities": ["IMAGE"]}
            })
        );
    }

    #[test]
    fn test_request_accessors() {
        let body = GenerateContentRequest::from_generation_request(&request());
        assert_eq!(body.inline_image().unwrap().data, "iVBORw0KGgo=");
        assert_eq!(body.prompt(), Some("Put this logo on a mug"));
    }

    #[test]
    fn test_first_inline_image_skips_text_parts() {
        let resp = parse(
            r#"{
                "candidates": [{
                    "content": {
                        "parts": [
                            {"text": "x"},
                            {"inlineData": {"data": "ABC", "mimeType": "image/png"}},
                            {"inlineData": {"data": "DEF", "mimeType": "image/png"}}
                        ]
                    },
                    "finishReason": "STOP"
                }]
            }"#,
        );
        let image = first_inline_image(&resp).unwrap();
        assert_eq!(image.data, "ABC");
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn test_first_inline_image_skips_empty_data() {
        let resp = parse(
            r#"{
                "candidates": [{
                    "content": {
                        "parts": [
                            {"inlineData": {"data": "", "mimeType": "image/png"}},
                            {"inlineData": {"data": "XYZ", "mimeType": "image/jpeg"}}
                        ]
                    }
                }]
            }"#,
        );
        assert_eq!(first_inline_image(&resp).unwrap().data, "XYZ");
    }

    #[test]
    fn test_zero_candidates() {
        let resp = parse(r#"{"candidates": []}"#);
        assert!(first_inline_image(&resp).is_none());
        assert_eq!(missing_image_reason(&resp).as_deref(), Some("no candidates"));

        let resp = parse("{}");
        assert!(first_inline_image(&resp).is_none());
    }

    #[test]
    fn test_only_first_candidate_is_consulted() {
        let resp = parse(
            r#"{
                "candidates": [
                    {"finishReason": "IMAGE_SAFETY"},
                    {"content": {"parts": [{"inlineData": {"data": "ABC", "mimeType": "image/png"}}]}}
                ]
            }"#,
        );
        assert!(first_inline_image(&resp).is_none());
        assert_eq!(
            missing_image_reason(&resp).as_deref(),
            Some("finish reason: IMAGE_SAFETY")
        );
    }

    #[test]
    fn test_text_only_candidate() {
        let resp = parse(
            r#"{
                "candidates": [{
                    "content": {"parts": [{"text": "I can't do that"}]},
                    "finishReason": "STOP"
                }]
            }"#,
        );
        assert!(first_inline_image(&resp).is_none());
        assert_eq!(missing_image_reason(&resp), None);
    }

    #[test]
    fn test_prompt_feedback_reason() {
        let resp = parse(
            r#"{
                "candidates": [],
                "promptFeedback": {"blockReason": "SAFETY"}
            }"#,
        );
        assert_eq!(
            missing_image_reason(&resp).as_deref(),
            Some("prompt blocked: SAFETY")
        );
    }
}
