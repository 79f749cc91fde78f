//! A single resolution request, from seed to final result.
//!
//! ```text
//! Seeded ──ingest──▶ Streaming ──finish──▶ Completed   (links found)
//!    │                   │          └────▶ Failed      (no links)
//!    └───────fail────────┴───────────────▶ Failed      (upstream error)
//! ```
//!
//! Each chunk is fully processed before the next one is accepted, and every
//! processed chunk yields a snapshot (a clone, so callers can't reach the
//! session's own state). Once terminal, the session ignores further input.

use futures::{Stream, StreamExt};

use super::domain::{Citation, RawChunk, ResolutionResult, ResolveError};
use super::fields::FieldExtractor;
use super::links::LinkExtractor;
use super::platform::{Platform, PatternRegistry};

/// Everything a session needs to read a response, compiled once.
#[derive(Debug, Clone)]
pub struct Extractors {
    pub registry: PatternRegistry,
    pub fields: FieldExtractor,
    pub links: LinkExtractor,
}

impl Extractors {
    pub fn new() -> Result<Self, ResolveError> {
        Ok(Self {
            registry: PatternRegistry::new()?,
            fields: FieldExtractor::new()?,
            links: LinkExtractor::new()?,
        })
    }
}

/// Lifecycle state of a [`ResolutionSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Seeded,
    Streaming,
    Completed,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// State for resolving one input URL.
pub struct ResolutionSession<'e> {
    extractors: &'e Extractors,
    state: SessionState,
    buffer: String,
    citations: Vec<Citation>,
    result: ResolutionResult,
    failure: Option<ResolveError>,
}

impl<'e> ResolutionSession<'e> {
    /// Start a session, seeding the result from the input URL itself when
    /// it is a deep link on exactly one platform.
    pub fn new(extractors: &'e Extractors, input_url: &str) -> Self {
        let mut result = ResolutionResult::default();
        let input = input_url.trim();

        match extractors.registry.classify(input) {
            Some(platform) => {
                result.accept_link(platform, input);
                tracing::info!(%platform, "Seeded result from input link");
            }
            None => tracing::debug!(input, "Input link not recognised, starting empty"),
        }

        Self {
            extractors,
            state: SessionState::Seeded,
            buffer: String::new(),
            citations: Vec::new(),
            result,
            failure: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Copy of the current result.
    pub fn snapshot(&self) -> ResolutionResult {
        self.result.clone()
    }

    /// Platform of the seeded link, if the input was recognised.
    pub fn seeded_platform(&self) -> Option<Platform> {
        self.result.links.first().map(|l| l.platform)
    }

    /// Fold one streamed chunk into the result.
    ///
    /// Returns the snapshot to emit, or `None` once the session is terminal.
    pub fn ingest(&mut self, chunk: RawChunk) -> Option<ResolutionResult> {
        if self.state.is_terminal() {
            tracing::debug!("Ignoring chunk after session end");
            return None;
        }
        self.state = SessionState::Streaming;

        self.buffer.push_str(&chunk.text);
        self.citations.extend(chunk.citations);

        let before = self.result.links.len();
        self.extract(false);
        tracing::debug!(
            buffered = self.buffer.len(),
            citations = self.citations.len(),
            new_links = self.result.links.len() - before,
            "Chunk processed"
        );

        Some(self.snapshot())
    }

    /// One-shot resolution: apply a complete response with the tiered
    /// fallback, then finish.
    pub fn resolve_complete(&mut self, response: RawChunk) -> Result<ResolutionResult, ResolveError> {
        if !self.state.is_terminal() {
            self.state = SessionState::Streaming;
            self.buffer.push_str(&response.text);
            self.citations.extend(response.citations);

            let ex = self.extractors;
            ex.fields.apply(&mut self.result, &self.buffer, true);
            ex.links
                .apply_tiered(&ex.registry, &mut self.result, &self.buffer, &self.citations);
        }
        self.finish()
    }

    /// End of stream: a final pass over the now-complete text, then
    /// `Completed` if any link was found, otherwise `Failed`.
    pub fn finish(&mut self) -> Result<ResolutionResult, ResolveError> {
        match self.state {
            SessionState::Completed => return Ok(self.snapshot()),
            SessionState::Failed => {
                return Err(self.failure.clone().unwrap_or(ResolveError::NoMatches));
            }
            SessionState::Seeded | SessionState::Streaming => {}
        }

        self.extract(true);

        if self.result.links.is_empty() {
            tracing::warn!("Response contained no usable platform links");
            self.state = SessionState::Failed;
            self.failure = Some(ResolveError::NoMatches);
            return Err(ResolveError::NoMatches);
        }

        self.state = SessionState::Completed;
        tracing::info!(
            links = self.result.links.len(),
            title = %self.result.title,
            artist = %self.result.artist,
            "Resolution completed"
        );
        Ok(self.snapshot())
    }

    /// Record an upstream failure. Terminal; the error is handed back.
    pub fn fail(&mut self, error: ResolveError) -> ResolveError {
        if !self.state.is_terminal() {
            tracing::warn!("Resolution failed: {}", error);
            self.state = SessionState::Failed;
            self.failure = Some(error.clone());
        }
        error
    }

    /// Consume a chunk stream to the end, emitting a snapshot per chunk.
    ///
    /// Dropping the returned future stops consumption: no further chunks are
    /// polled and no further snapshots are emitted.
    pub async fn drive<S, F>(
        &mut self,
        chunks: S,
        mut on_snapshot: F,
    ) -> Result<ResolutionResult, ResolveError>
    where
        S: Stream<Item = Result<RawChunk, ResolveError>>,
        F: FnMut(ResolutionResult),
    {
        let mut chunks = std::pin::pin!(chunks);

        while let Some(item) = chunks.next().await {
            match item {
                Ok(chunk) => {
                    if let Some(snapshot) = self.ingest(chunk) {
                        on_snapshot(snapshot);
                    }
                }
                Err(e) => return Err(self.fail(e)),
            }
        }

        self.finish()
    }

    fn extract(&mut self, complete: bool) {
        let ex = self.extractors;
        ex.fields.apply(&mut self.result, &self.buffer, complete);
        ex.links.apply(
            &ex.registry,
            &mut self.result,
            &self.buffer,
            &self.citations,
            complete,
        );
    }
}
