//! Internal domain models for link resolution.
//!
//! These types are OUR types - they don't change when the search service's
//! API changes. Upstream responses get converted into [`RawChunk`]s by the
//! Gemini adapter before the extractors ever see them.

use serde::Serialize;

use super::platform::Platform;

/// A validated deep link on one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformLink {
    pub platform: Platform,
    pub url: String,
}

/// What kind of entity the resolved link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseKind {
    Track,
    Album,
    Artist,
    #[default]
    Unknown,
}

impl ReleaseKind {
    /// Parse a lower-cased `Type:` value.
    pub fn from_label(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "track" => Some(Self::Track),
            "album" => Some(Self::Album),
            "artist" => Some(Self::Artist),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Album => "album",
            Self::Artist => "artist",
            Self::Unknown => "unknown",
        }
    }
}

/// In-progress (or final) resolution of one input link.
///
/// Handed to callers as a snapshot: a clone taken after each processed chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolutionResult {
    /// Track/album/artist title, empty until known
    pub title: String,
    /// Artist name, empty until known
    pub artist: String,
    /// Entity kind
    #[serde(rename = "type")]
    pub kind: ReleaseKind,
    /// Accepted links, in the order they were accepted
    pub links: Vec<PlatformLink>,
}

impl ResolutionResult {
    /// Link for a platform, if one has been accepted.
    pub fn link_for(&self, platform: Platform) -> Option<&PlatformLink> {
        self.links.iter().find(|l| l.platform == platform)
    }

    pub fn has_platform(&self, platform: Platform) -> bool {
        self.link_for(platform).is_some()
    }

    /// Accept a link unless the platform is already filled.
    ///
    /// Returns `true` if the link was added.
    pub fn accept_link(&mut self, platform: Platform, url: impl Into<String>) -> bool {
        if self.has_platform(platform) {
            return false;
        }
        self.links.push(PlatformLink {
            platform,
            url: url.into(),
        });
        true
    }
}

/// A grounding record attached to a search response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub uri: String,
    /// Page title reported by the search service (usually the domain)
    pub title: Option<String>,
}

impl Citation {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            title: None,
        }
    }
}

/// One unit of upstream data: a text fragment plus any citations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawChunk {
    pub text: String,
    pub citations: Vec<Citation>,
}

impl RawChunk {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            citations: Vec::new(),
        }
    }

    pub fn with_citations<I, U>(text: impl Into<String>, uris: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<String>,
    {
        Self {
            text: text.into(),
            citations: uris.into_iter().map(Citation::new).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.citations.is_empty()
    }
}

/// Errors that can occur during resolution
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolveError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Search service rejected the API key: {0}")]
    Unauthorized(String),

    #[error("Search service quota exceeded - try again later")]
    RateLimited,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error(
        "No matching streaming links found. The release might be exclusive to one platform \
         or the search could not find direct matches."
    )]
    NoMatches,
}

impl ResolveError {
    /// True for failures of the search service call itself.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized(_)
                | Self::RateLimited
                | Self::Network(_)
                | Self::ApiError(_)
                | Self::Parse(_)
        )
    }
}
