//! Adapter layer: Convert Gemini DTOs to domain models
//!
//! This is the ONLY place where Gemini response types become [`RawChunk`]s
//! and HTTP failures become [`ResolveError`]s.

use super::dto;
use crate::resolver::domain::{Citation, RawChunk, ResolveError};

/// Convert one response (or streamed event) into a chunk.
///
/// Only the first candidate is read. Events without candidates (usage
/// metadata, keep-alives) become empty chunks.
pub fn to_chunk(response: dto::GenerateContentResponse) -> Result<RawChunk, ResolveError> {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(ResolveError::ApiError(format!("prompt blocked: {}", reason)));
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Ok(RawChunk::default());
    };

    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    let citations = candidate
        .grounding_metadata
        .map(|meta| {
            meta.grounding_chunks
                .into_iter()
                .filter_map(|chunk| chunk.web)
                .filter_map(|web| {
                    let uri = web.uri?;
                    Some(Citation {
                        uri,
                        title: web.title,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(RawChunk { text, citations })
}

/// Map a failed HTTP response to an error.
///
/// `body` is the raw response text; Gemini usually wraps failures in an
/// `{"error": {...}}` envelope, but proxies may not.
pub fn to_error(status: u16, body: &str) -> ResolveError {
    let detail = serde_json::from_str::<dto::ApiErrorResponse>(body)
        .map(|r| r.error)
        .unwrap_or_default();
    let message = if detail.message.is_empty() {
        body.chars().take(200).collect::<String>()
    } else {
        detail.message.clone()
    };

    let unauthorized = matches!(status, 401 | 403)
        || matches!(detail.status.as_str(), "UNAUTHENTICATED" | "PERMISSION_DENIED")
        || message.contains("API key");
    if unauthorized {
        return ResolveError::Unauthorized(message);
    }

    if status == 429 || detail.status == "RESOURCE_EXHAUSTED" {
        return ResolveError::RateLimited;
    }

    ResolveError::ApiError(format!("HTTP {}: {}", status, message))
}
