//! Music link resolution - turns one streaming-service link into links on the others.
//!
//! # Architecture
//!
//! - **Platforms** (`platform.rs`) - the closed set of services and the
//!   deep-link pattern registry
//! - **Domain models** (`domain.rs`) - results, chunks, citations, errors
//! - **Extractors** (`fields.rs`, `links.rs`) - pull title/artist/type and
//!   platform links out of free text and citations
//! - **Session** (`session.rs`) - the per-request state machine that seeds,
//!   ingests chunks, emits snapshots and finishes
//! - **Search capability** (`traits.rs`, `gemini/`) - the seam to the
//!   generative search service and its Gemini implementation
//! - **Service** (`service.rs`) - high-level orchestration
//!
//! Extraction never trusts a single chunk: every update re-reads the whole
//! accumulated response, and anything already accepted stays put.
//!
//! # Usage
//!
//! ```ignore
//! use resolver::{ResolverService, ResolverConfig};
//!
//! let service = ResolverService::new(ResolverConfig {
//!     api_key: "your-api-key".to_string(),
//!     ..Default::default()
//! })?;
//!
//! let result = service
//!     .resolve_streaming("https://open.spotify.com/track/abc123", |snapshot| {
//!         println!("{} links so far", snapshot.links.len());
//!     })
//!     .await?;
//! ```

pub mod domain;
pub mod fields;
pub mod gemini;
pub mod links;
pub mod platform;
pub mod prompt;
pub mod service;
pub mod session;
pub mod traits;

pub use domain::{Citation, PlatformLink, RawChunk, ReleaseKind, ResolutionResult, ResolveError};
pub use platform::{PatternRegistry, Platform};
pub use service::{ResolverConfig, ResolverService};
pub use session::{Extractors, ResolutionSession, SessionState};
