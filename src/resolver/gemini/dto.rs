//! Gemini API Data Transfer Objects
//!
//! These types match what the `generateContent` and `streamGenerateContent`
//! endpoints send and receive. Only the fields we use are modelled; serde
//! ignores the rest.
//! DO NOT use these types outside the gemini module - convert to domain types.
//!
//! API Reference: https://ai.google.dev/api/generate-content
//!
//! Example response (one SSE event when streaming):
//! ```json
//! {
//!   "candidates": [{
//!     "content": { "role": "model", "parts": [{ "text": "Title: Abbey Road\n" }] },
//!     "groundingMetadata": {
//!       "groundingChunks": [{ "web": { "uri": "https://open.spotify.com/album/0ETFjACtuP2ADo6LFhL6HN", "title": "spotify.com" } }]
//!     }
//!   }]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Request body for both generate endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub tools: Vec<Tool>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Tool declaration; only Google Search grounding is used
#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GoogleSearch {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
}

/// Top-level response (or a single streamed event)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub grounding_metadata: Option<GroundingMetadata>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroundingChunk {
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebSource {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

/// Error envelope returned with non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    /// gRPC-style status, e.g. `PERMISSION_DENIED`
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some("hi".to_string()),
                }],
            }],
            tools: vec![Tool {
                google_search: GoogleSearch::default(),
            }],
            generation_config: GenerationConfig { temperature: 0.0 },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert!(json["tools"][0]["google_search"].is_object());
        assert_eq!(json["generationConfig"]["temperature"], 0.0);
    }

    #[test]
    fn test_response_parses_grounding() {
        let json = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Title: X"}]},
                "finishReason": "STOP",
                "groundingMetadata": {
                    "webSearchQueries": ["x"],
                    "groundingChunks": [{"web": {"uri": "https://tidal.com/browse/track/1", "title": "tidal.com"}}]
                }
            }],
            "usageMetadata": {"promptTokenCount": 10}
        }"#;

        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let candidate = &response.candidates[0];
        assert_eq!(candidate.finish_reason.as_deref(), Some("STOP"));
        let chunk = &candidate.grounding_metadata.as_ref().unwrap().grounding_chunks[0];
        assert_eq!(
            chunk.web.as_ref().unwrap().uri.as_deref(),
            Some("https://tidal.com/browse/track/1")
        );
    }

    #[test]
    fn test_minimal_stream_event_parses() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.candidates.is_empty());
        assert!(response.prompt_feedback.is_none());
    }
}
