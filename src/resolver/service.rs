//! Resolver service - orchestrates one link resolution end to end
//!
//! 1. Seed the result from the input link itself
//! 2. Ask the search service for the equivalent links
//! 3. Fold the response (streamed or whole) into the result
//! 4. Succeed if at least one link was found

use std::time::Duration;

use crate::resolver::{
    domain::{ResolutionResult, ResolveError},
    gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient},
    platform::Platform,
    prompt,
    session::{Extractors, ResolutionSession},
    traits::SearchApi,
};

/// Configuration for the resolver service
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Gemini API key (get one at https://aistudio.google.com/apikey)
    pub api_key: String,
    /// Model name, e.g. `gemini-2.5-flash`
    pub model: String,
    /// API root
    pub base_url: String,
    /// Sampling temperature; 0 keeps answers repeatable
    pub temperature: f32,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.0,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Service for resolving a music link into links on other platforms
pub struct ResolverService<S = GeminiClient> {
    search: S,
    extractors: Extractors,
}

impl ResolverService<GeminiClient> {
    /// Create a service backed by Gemini.
    ///
    /// Fails with [`ResolveError::Configuration`] when no API key is set; no
    /// request is ever attempted without one.
    pub fn new(config: ResolverConfig) -> Result<Self, ResolveError> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(ResolveError::Configuration(
                "Gemini API key required. Use --api-key, set GEMINI_API_KEY, \
                 or add it to the config file."
                    .to_string(),
            ));
        }

        let client = GeminiClient::new(api_key, config.model, config.timeout)?
            .with_base_url(config.base_url)
            .with_temperature(config.temperature);
        Self::with_search(client)
    }
}

impl<S: SearchApi> ResolverService<S> {
    /// Create a service around any search implementation.
    pub fn with_search(search: S) -> Result<Self, ResolveError> {
        Ok(Self {
            search,
            extractors: Extractors::new()?,
        })
    }

    /// Which platform an input link belongs to, without any network call.
    pub fn classify(&self, url: &str) -> Option<Platform> {
        self.extractors.registry.classify(url.trim())
    }

    /// Resolve with a single, complete response.
    pub async fn resolve(&self, input_url: &str) -> Result<ResolutionResult, ResolveError> {
        let mut session = ResolutionSession::new(&self.extractors, input_url);
        tracing::info!(input = input_url, "Resolving (one-shot)");

        let response = match self.search.generate(&prompt::build_prompt(input_url)).await {
            Ok(response) => response,
            Err(e) => return Err(session.fail(e)),
        };
        session.resolve_complete(response)
    }

    /// Resolve with a streamed response, calling `on_snapshot` with the
    /// seeded result first and then after every chunk.
    ///
    /// Dropping the returned future cancels the resolution; no snapshot is
    /// emitted after that.
    pub async fn resolve_streaming<F>(
        &self,
        input_url: &str,
        mut on_snapshot: F,
    ) -> Result<ResolutionResult, ResolveError>
    where
        F: FnMut(ResolutionResult),
    {
        let mut session = ResolutionSession::new(&self.extractors, input_url);
        tracing::info!(input = input_url, "Resolving (streaming)");
        on_snapshot(session.snapshot());

        let chunks = match self
            .search
            .generate_stream(&prompt::build_prompt(input_url))
            .await
        {
            Ok(chunks) => chunks,
            Err(e) => return Err(session.fail(e)),
        };
        session.drive(chunks, on_snapshot).await
    }
}
