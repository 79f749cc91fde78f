//! Platform link extraction from citations and generated text.
//!
//! Two evidence channels feed the result, in priority order per platform:
//!
//! 1. **Citations** - grounding URIs attached by the search service. These
//!    come from actual search hits, so they beat anything the model wrote.
//! 2. **Text** - URL literals found in the generated answer.
//!
//! Both channels re-scan the entire accumulated state on every update, so
//! a URL split across two chunks is simply picked up once it is whole.
//! A platform that already has a link is never touched again.

use regex::Regex;

use super::domain::{Citation, ResolutionResult, ResolveError};
use super::platform::{Platform, PatternRegistry, is_search_url};

/// Punctuation that commonly trails a URL in prose.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ')'];

/// Where an accepted link came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSource {
    Citation,
    PlatformLine,
    Text,
}

/// Extracts per-platform deep links using a shared [`PatternRegistry`].
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    url_literal: Regex,
}

impl LinkExtractor {
    pub fn new() -> Result<Self, ResolveError> {
        let url_literal = Regex::new(r#"https?://[^\s"'<>]+"#)
            .map_err(|e| ResolveError::Configuration(format!("invalid URL pattern: {e}")))?;
        Ok(Self { url_literal })
    }

    /// URL literals in `text`, trailing punctuation trimmed.
    ///
    /// While streaming (`complete == false`) a URL that runs to the very end
    /// of the buffer may be cut off mid-chunk and is held back.
    pub fn text_urls<'t>(&self, text: &'t str, complete: bool) -> Vec<&'t str> {
        self.url_literal
            .find_iter(text)
            .filter(|m| complete || m.end() < text.len())
            .map(|m| m.as_str().trim_end_matches(TRAILING_PUNCTUATION))
            .collect()
    }

    /// Streaming update: citation channel, then text channel, per platform.
    ///
    /// Returns the number of links added.
    pub fn apply(
        &self,
        registry: &PatternRegistry,
        result: &mut ResolutionResult,
        text: &str,
        citations: &[Citation],
        complete: bool,
    ) -> usize {
        let candidates: Vec<(Platform, &str)> = self
            .text_urls(text, complete)
            .into_iter()
            .filter(|url| !is_search_url(url))
            .filter_map(|url| {
                let platform = registry.platform_for_host(url)?;
                registry
                    .deep_link_prefix(platform, url)
                    .map(|link| (platform, link))
            })
            .collect();

        let mut added = 0;
        for platform in Platform::ALL {
            if result.has_platform(platform) {
                continue;
            }

            let found = citation_match(registry, platform, citations)
                .map(|url| (url, LinkSource::Citation))
                .or_else(|| {
                    candidates
                        .iter()
                        .find(|(p, _)| *p == platform)
                        .map(|(_, url)| (*url, LinkSource::Text))
                });

            if let Some((url, source)) = found
                && result.accept_link(platform, url)
            {
                tracing::debug!(%platform, url, ?source, "Link accepted");
                added += 1;
            }
        }
        added
    }

    /// One-shot update over a complete response, with a three-tier fallback
    /// per platform: citation, a line naming the platform, then anywhere.
    ///
    /// Returns the number of links added.
    pub fn apply_tiered(
        &self,
        registry: &PatternRegistry,
        result: &mut ResolutionResult,
        text: &str,
        citations: &[Citation],
    ) -> usize {
        let mut added = 0;
        for platform in Platform::ALL {
            if result.has_platform(platform) {
                continue;
            }

            let found = citation_match(registry, platform, citations)
                .map(|url| (url, LinkSource::Citation))
                .or_else(|| {
                    platform_line_match(registry, platform, text)
                        .map(|url| (url, LinkSource::PlatformLine))
                })
                .or_else(|| {
                    registry
                        .extract_first_match(platform, text)
                        .map(|url| (url, LinkSource::Text))
                });

            if let Some((url, source)) = found
                && result.accept_link(platform, url)
            {
                tracing::debug!(%platform, url, ?source, "Link accepted");
                added += 1;
            }
        }
        added
    }
}

/// First citation URI that is a deep link for `platform`.
fn citation_match<'c>(
    registry: &PatternRegistry,
    platform: Platform,
    citations: &'c [Citation],
) -> Option<&'c str> {
    citations
        .iter()
        .map(|c| c.uri.trim())
        .find(|uri| registry.is_valid_deep_link(platform, uri))
}

/// Deep link on a line that mentions the platform by name.
fn platform_line_match<'t>(
    registry: &PatternRegistry,
    platform: Platform,
    text: &'t str,
) -> Option<&'t str> {
    let name = platform.display_name().to_lowercase();
    text.lines()
        .filter(|line| line.to_lowercase().contains(&name))
        .find_map(|line| registry.extract_first_match(platform, line))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (PatternRegistry, LinkExtractor) {
        (PatternRegistry::new().unwrap(), LinkExtractor::new().unwrap())
    }

    fn urls(result: &ResolutionResult) -> Vec<(Platform, &str)> {
        result
            .links
            .iter()
            .map(|l| (l.platform, l.url.as_str()))
            .collect()
    }

    #[test]
    fn test_text_urls_trim_punctuation() {
        let (_, ex) = setup();
        let text = "See (https://tidal.com/browse/track/1), or https://open.spotify.com/track/a. Done";
        assert_eq!(
            ex.text_urls(text, true),
            vec!["https://tidal.com/browse/track/1", "https://open.spotify.com/track/a"]
        );
    }

    #[test]
    fn test_text_urls_hold_back_trailing_url_while_streaming() {
        let (_, ex) = setup();
        let text = "Spotify: https://open.spotify.com/track/ab";
        assert!(ex.text_urls(text, false).is_empty());
        assert_eq!(ex.text_urls(text, true), vec!["https://open.spotify.com/track/ab"]);
    }

    #[test]
    fn test_citation_beats_text() {
        let (reg, ex) = setup();
        let mut result = ResolutionResult::default();
        let text = "Spotify: https://open.spotify.com/track/fromtext\n";
        let citations = vec![Citation::new("https://open.spotify.com/track/fromcitation")];

        let added = ex.apply(&reg, &mut result, text, &citations, false);

        assert_eq!(added, 1);
        assert_eq!(
            urls(&result),
            vec![(Platform::Spotify, "https://open.spotify.com/track/fromcitation")]
        );
    }

    #[test]
    fn test_all_platforms_from_text() {
        let (reg, ex) = setup();
        let mut result = ResolutionResult::default();
        let text = "\
Links:
- YouTube Music: https://music.youtube.com/watch?v=abc_123
- Tidal: https://tidal.com/browse/album/42.
- Apple Music: https://music.apple.com/us/album/x/123
- Spotify: [open](https://open.spotify.com/album/789)
";
        ex.apply(&reg, &mut result, text, &[], true);

        // Fixed platform order within one pass
        assert_eq!(
            urls(&result),
            vec![
                (Platform::Spotify, "https://open.spotify.com/album/789"),
                (Platform::AppleMusic, "https://music.apple.com/us/album/x/123"),
                (Platform::Tidal, "https://tidal.com/browse/album/42"),
                (Platform::YouTubeMusic, "https://music.youtube.com/watch?v=abc_123"),
            ]
        );
    }

    #[test]
    fn test_search_urls_rejected_on_both_channels() {
        let (reg, ex) = setup();
        let mut result = ResolutionResult::default();
        let text = "Spotify: https://open.spotify.com/search?q=X\n";
        let citations = vec![Citation::new("https://tidal.com/browse/track/1?src=search")];

        let added = ex.apply(&reg, &mut result, text, &citations, true);

        assert_eq!(added, 0);
        assert!(result.links.is_empty());
    }

    #[test]
    fn test_existing_link_not_replaced() {
        let (reg, ex) = setup();
        let mut result = ResolutionResult::default();
        result.accept_link(Platform::Spotify, "https://open.spotify.com/track/seed");

        ex.apply(
            &reg,
            &mut result,
            "https://open.spotify.com/track/other\n",
            &[Citation::new("https://open.spotify.com/track/cited")],
            true,
        );

        assert_eq!(urls(&result), vec![(Platform::Spotify, "https://open.spotify.com/track/seed")]);
    }

    #[test]
    fn test_non_deep_link_on_platform_host_ignored() {
        let (reg, ex) = setup();
        let mut result = ResolutionResult::default();
        ex.apply(
            &reg,
            &mut result,
            "https://open.spotify.com/show/podcast and https://tidal.com/\n",
            &[],
            true,
        );
        assert!(result.links.is_empty());
    }

    #[test]
    fn test_tiered_prefers_platform_line() {
        let (reg, ex) = setup();
        let mut result = ResolutionResult::default();
        let text = "\
Related: https://music.apple.com/us/album/other/1
Apple Music: https://music.apple.com/us/album/x/2
";
        ex.apply_tiered(&reg, &mut result, text, &[]);
        assert_eq!(
            urls(&result),
            vec![(Platform::AppleMusic, "https://music.apple.com/us/album/x/2")]
        );
    }

    #[test]
    fn test_tiered_falls_back_to_global_match() {
        let (reg, ex) = setup();
        let mut result = ResolutionResult::default();
        let text = "I found it here: https://music.youtube.com/playlist?list=OLAK5uy_x\n";
        ex.apply_tiered(&reg, &mut result, text, &[]);
        assert_eq!(
            urls(&result),
            vec![(Platform::YouTubeMusic, "https://music.youtube.com/playlist?list=OLAK5uy_x")]
        );
    }

    #[test]
    fn test_tiered_skips_search_on_platform_line() {
        let (reg, ex) = setup();
        let mut result = ResolutionResult::default();
        let text = "Tidal: https://tidal.com/browse/track/9?q=search\nalso https://tidal.com/browse/track/10\n";
        ex.apply_tiered(&reg, &mut result, text, &[]);
        assert_eq!(urls(&result), vec![(Platform::Tidal, "https://tidal.com/browse/track/10")]);
    }
}
