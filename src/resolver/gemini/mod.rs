//! Gemini API integration
//!
//! Gemini with Google Search grounding is the search capability behind the
//! resolver: it answers in prose and attaches the pages it found as
//! grounding citations.
//! API docs: https://ai.google.dev/api/generate-content

mod adapter;
mod client;
pub mod dto;
mod sse;

pub use adapter::{to_chunk, to_error};
pub use client::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient};
pub use sse::{SseDecoder, parse_sse_stream};
