//! Test utilities and fixtures for music-linker tests.
//!
//! This module provides common test helpers and chunk factories to reduce
//! boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use music_linker::test_utils::{extractors, text_chunk};
//!
//! #[test]
//! fn test_something() {
//!     let ex = extractors();
//!     let mut session = ResolutionSession::new(&ex, "https://open.spotify.com/track/abc123");
//!     session.ingest(text_chunk("Title: X\n"));
//! }
//! ```

use crate::resolver::{Extractors, RawChunk};

/// Compiled extractors for building sessions in tests.
pub fn extractors() -> Extractors {
    Extractors::new().expect("Failed to compile extractors")
}

/// A text-only chunk.
pub fn text_chunk(text: &str) -> RawChunk {
    RawChunk::text(text)
}

/// A chunk carrying only citations.
///
/// ```ignore
/// let chunk = citation_chunk(&["https://open.spotify.com/album/789"]);
/// ```
pub fn citation_chunk(uris: &[&str]) -> RawChunk {
    RawChunk::with_citations("", uris.iter().copied())
}

/// A complete, well-formed answer in the shape the prompt asks for.
pub fn sample_answer() -> String {
    "\
Type: track
Title: Blue in Green
Artist: Miles Davis
Links:
- Spotify: https://open.spotify.com/track/0aWMVrwxPNYkKmFthzmpRi
- Apple Music: https://music.apple.com/us/album/kind-of-blue/268443092?i=268443097
- Tidal: https://tidal.com/browse/track/1166735
- YouTube Music: https://music.youtube.com/watch?v=PoPL7BExSQU
"
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{Platform, ReleaseKind, ResolutionSession};

    #[test]
    fn test_citation_chunk_has_no_text() {
        let chunk = citation_chunk(&["https://tidal.com/browse/track/1"]);
        assert!(chunk.text.is_empty());
        assert_eq!(chunk.citations.len(), 1);
    }

    #[test]
    fn test_sample_answer_resolves_every_platform() {
        let ex = extractors();
        let mut session = ResolutionSession::new(&ex, "https://open.spotify.com/track/0aWMVrwxPNYkKmFthzmpRi");
        session.ingest(text_chunk(&sample_answer()));
        let result = session.finish().unwrap();

        assert_eq!(result.kind, ReleaseKind::Track);
        assert_eq!(result.artist, "Miles Davis");
        let platforms: Vec<_> = result.links.iter().map(|l| l.platform).collect();
        assert_eq!(platforms, Platform::ALL.to_vec());
    }
}
