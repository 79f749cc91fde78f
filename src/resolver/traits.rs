//! Trait definitions for the search capability.
//!
//! The resolver only needs "send a prompt, get text and citations back",
//! either as one response or as a stream. This trait is that seam: the
//! Gemini client implements it for production, and tests substitute the
//! scripted mock below.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use super::domain::{RawChunk, ResolveError};

/// Stream of response chunks from the search service.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<RawChunk, ResolveError>> + Send>>;

/// A generative search service that answers with text and citations.
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Send a prompt and wait for the complete response.
    async fn generate(&self, prompt: &str) -> Result<RawChunk, ResolveError>;

    /// Send a prompt and receive the response incrementally.
    async fn generate_stream(&self, prompt: &str) -> Result<ChunkStream, ResolveError>;
}

#[async_trait]
impl SearchApi for super::gemini::GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<RawChunk, ResolveError> {
        self.generate_content(prompt).await
    }

    async fn generate_stream(&self, prompt: &str) -> Result<ChunkStream, ResolveError> {
        self.stream_generate_content(prompt).await
    }
}
