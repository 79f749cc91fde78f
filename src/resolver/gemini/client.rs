//! Gemini HTTP client
//!
//! Handles communication with the Generative Language API.
//! See: https://ai.google.dev/api/generate-content
//!
//! ## Notes
//!
//! - The key goes in the `x-goog-api-key` header rather than the `key` query
//!   parameter, so it never ends up in logged URLs.
//! - Grounding is enabled with the `google_search` tool; the citations it
//!   returns are what the link extractor trusts most.
//! - Streaming uses `streamGenerateContent?alt=sse`. Each SSE event is a
//!   full `GenerateContentResponse` holding only the newly generated text.
//! - An invalid key comes back as HTTP 400 `INVALID_ARGUMENT` with an
//!   "API key not valid" message, not as 401.

use std::time::Duration;

use super::{adapter, dto, sse};
use crate::resolver::domain::{RawChunk, ResolveError};
use crate::resolver::traits::ChunkStream;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Gemini API client
pub struct GeminiClient {
    api_key: String,
    model: String,
    http_client: reqwest::Client,
    base_url: String,
    temperature: f32,
}

impl GeminiClient {
    /// Create a new client for `model`.
    ///
    /// `timeout` bounds the whole request, including reading a streamed body.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ResolveError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| ResolveError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key: api_key.into(),
            model: model.into(),
            http_client,
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.0,
        })
    }

    /// Point the client at a different API root (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a prompt and return the complete response as one chunk.
    pub async fn generate_content(&self, prompt: &str) -> Result<RawChunk, ResolveError> {
        let response = self.send(prompt, "generateContent").await?;

        let body = response
            .json::<dto::GenerateContentResponse>()
            .await
            .map_err(|e| ResolveError::Parse(e.to_string()))?;
        adapter::to_chunk(body)
    }

    /// Send a prompt and return the response as a stream of chunks.
    pub async fn stream_generate_content(&self, prompt: &str) -> Result<ChunkStream, ResolveError> {
        let response = self.send(prompt, "streamGenerateContent?alt=sse").await?;
        Ok(sse::parse_sse_stream(response.bytes_stream()))
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.base_url,
            urlencoding::encode(&self.model),
            method
        )
    }

    fn request_body(&self, prompt: &str) -> dto::GenerateContentRequest {
        dto::GenerateContentRequest {
            contents: vec![dto::Content {
                role: Some("user".to_string()),
                parts: vec![dto::Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            tools: vec![dto::Tool {
                google_search: dto::GoogleSearch::default(),
            }],
            generation_config: dto::GenerationConfig {
                temperature: self.temperature,
            },
        }
    }

    /// Send the HTTP request and check the status
    async fn send(&self, prompt: &str, method: &str) -> Result<reqwest::Response, ResolveError> {
        tracing::debug!(model = %self.model, method, "Sending search request");

        let response = self
            .http_client
            .post(self.endpoint(method))
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| ResolveError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(adapter::to_error(status.as_u16(), &body));
        }

        Ok(response)
    }
}
