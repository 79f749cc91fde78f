//! Platform definitions and the deep-link pattern registry.
//!
//! Each supported streaming service has one structural URL matcher. The
//! registry is built once at startup and handed to the extractors by
//! reference, so nothing here is global state.

use regex::Regex;
use serde::Serialize;

use super::domain::ResolveError;

/// A supported streaming platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Platform {
    Spotify,
    AppleMusic,
    Tidal,
    YouTubeMusic,
}

impl Platform {
    /// All platforms in their fixed extraction order.
    pub const ALL: [Platform; 4] = [
        Platform::Spotify,
        Platform::AppleMusic,
        Platform::Tidal,
        Platform::YouTubeMusic,
    ];

    /// Human-readable name, as it appears in prompts and response lines.
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Spotify => "Spotify",
            Platform::AppleMusic => "Apple Music",
            Platform::Tidal => "Tidal",
            Platform::YouTubeMusic => "YouTube Music",
        }
    }

    /// Canonical host used when asking the search service for links.
    pub fn canonical_host(self) -> &'static str {
        match self {
            Platform::Spotify => "open.spotify.com",
            Platform::AppleMusic => "music.apple.com",
            Platform::Tidal => "tidal.com",
            Platform::YouTubeMusic => "music.youtube.com",
        }
    }

    /// Host substrings that identify a URL as belonging to this platform.
    fn host_markers(self) -> &'static [&'static str] {
        match self {
            Platform::Spotify => &["spotify.com"],
            Platform::AppleMusic => &["music.apple.com", "itunes.apple.com"],
            Platform::Tidal => &["tidal.com"],
            Platform::YouTubeMusic => &["music.youtube.com"],
        }
    }

    /// Structural deep-link pattern (unanchored, case-insensitive).
    fn pattern(self) -> &'static str {
        match self {
            Platform::Spotify => {
                r"(?i)https?://open\.spotify\.com/(?:intl-[a-z]{2}/)?(?:track|album|playlist|artist)/[a-zA-Z0-9]+(?:\?[a-zA-Z0-9=_&\-]*)?"
            }
            Platform::AppleMusic => {
                r"(?i)https?://(?:music|itunes)\.apple\.com/[a-z]{2}/(?:album|song|playlist|artist)/[a-zA-Z0-9\-_/%]+(?:\?[a-zA-Z0-9=_&\-]*)?"
            }
            Platform::Tidal => {
                r"(?i)https?://(?:[a-z0-9\-]+\.)?tidal\.com/(?:browse/)?(?:track|album|playlist|artist)/[0-9a-zA-Z_\-]+(?:\?[a-zA-Z0-9=_&\-]*)?"
            }
            Platform::YouTubeMusic => {
                r"(?i)https?://music\.youtube\.com/(?:watch\?v=|playlist\?list=)[a-zA-Z0-9_\-]+(?:&[a-zA-Z0-9=_&\-]*)?"
            }
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// True if the URL points at a search-results page rather than an entity.
pub fn is_search_url(url: &str) -> bool {
    url.to_ascii_lowercase().contains("search")
}

/// The whitespace/quote-delimited token starting at `start`.
fn url_token(text: &str, start: usize) -> &str {
    let rest = &text[start..];
    let end = rest
        .find(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>'))
        .unwrap_or(rest.len());
    &rest[..end]
}

/// Compiled deep-link matchers for every platform.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    patterns: Vec<(Platform, Regex)>,
}

impl PatternRegistry {
    /// Compile the matchers for all platforms.
    pub fn new() -> Result<Self, ResolveError> {
        let patterns = Platform::ALL
            .iter()
            .map(|&platform| {
                Regex::new(platform.pattern())
                    .map(|re| (platform, re))
                    .map_err(|e| {
                        ResolveError::Configuration(format!(
                            "invalid {} pattern: {}",
                            platform, e
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    fn regex(&self, platform: Platform) -> &Regex {
        // Every platform is compiled in `new`, in `Platform::ALL` order.
        &self.patterns[platform as usize].1
    }

    /// Whether `url` is a deep link for `platform`.
    ///
    /// The structural match must start at the beginning of `url`; any URL
    /// containing "search" is rejected regardless of shape.
    pub fn is_valid_deep_link(&self, platform: Platform, url: &str) -> bool {
        self.deep_link_prefix(platform, url).is_some()
    }

    /// The deep-link portion at the start of `url`, if it has one.
    ///
    /// Text candidates can carry trailing junk such as markdown
    /// (`https://...](https://...)`); only the structural match is kept.
    pub fn deep_link_prefix<'u>(&self, platform: Platform, url: &'u str) -> Option<&'u str> {
        if is_search_url(url) {
            return None;
        }
        self.regex(platform)
            .find(url)
            .filter(|m| m.start() == 0)
            .map(|m| m.as_str())
    }

    /// First non-search deep link for `platform` anywhere in `text`.
    ///
    /// The search check covers the whole URL token, not just the structural
    /// match, so `.../track/9?q=search` is rejected too.
    pub fn extract_first_match<'t>(&self, platform: Platform, text: &'t str) -> Option<&'t str> {
        self.regex(platform)
            .find_iter(text)
            .find(|m| !is_search_url(url_token(text, m.start())))
            .map(|m| m.as_str())
    }

    /// The single platform whose deep-link shape `url` has.
    ///
    /// Returns `None` when no platform (or, impossibly, more than one)
    /// accepts the URL.
    pub fn classify(&self, url: &str) -> Option<Platform> {
        let mut matches = Platform::ALL
            .iter()
            .copied()
            .filter(|&p| self.is_valid_deep_link(p, url));
        let first = matches.next()?;
        match matches.next() {
            Some(_) => None,
            None => Some(first),
        }
    }

    /// Classify a URL by host substring only.
    pub fn platform_for_host(&self, url: &str) -> Option<Platform> {
        let lower = url.to_ascii_lowercase();
        Platform::ALL
            .iter()
            .copied()
            .find(|p| p.host_markers().iter().any(|m| lower.contains(m)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> PatternRegistry {
        PatternRegistry::new().unwrap()
    }

    #[test]
    fn test_platform_order_matches_discriminants() {
        for (i, p) in Platform::ALL.iter().enumerate() {
            assert_eq!(*p as usize, i);
        }
    }

    #[test]
    fn test_spotify_deep_links() {
        let r = registry();
        assert!(r.is_valid_deep_link(Platform::Spotify, "https://open.spotify.com/track/abc123"));
        assert!(r.is_valid_deep_link(
            Platform::Spotify,
            "https://open.spotify.com/album/4aawyAB9vmqN3uQ7FjRGTy?si=xyz"
        ));
        assert!(r.is_valid_deep_link(Platform::Spotify, "https://open.spotify.com/intl-de/artist/0OdUWJ0sBjDrqHygGUXeCF"));
        assert!(!r.is_valid_deep_link(Platform::Spotify, "https://open.spotify.com/show/abc"));
        assert!(!r.is_valid_deep_link(Platform::Spotify, "https://spotify.com/track/abc"));
    }

    #[test]
    fn test_apple_music_deep_links() {
        let r = registry();
        assert!(r.is_valid_deep_link(Platform::AppleMusic, "https://music.apple.com/us/album/x/123"));
        assert!(r.is_valid_deep_link(
            Platform::AppleMusic,
            "https://itunes.apple.com/gb/album/abbey-road/1441164426?i=1441164430"
        ));
        assert!(!r.is_valid_deep_link(Platform::AppleMusic, "https://music.apple.com/album/x/123"));
    }

    #[test]
    fn test_tidal_deep_links() {
        let r = registry();
        assert!(r.is_valid_deep_link(Platform::Tidal, "https://tidal.com/browse/track/12345"));
        assert!(r.is_valid_deep_link(Platform::Tidal, "https://listen.tidal.com/album/99"));
        assert!(r.is_valid_deep_link(Platform::Tidal, "http://www.tidal.com/artist/7"));
        assert!(!r.is_valid_deep_link(Platform::Tidal, "https://tidal.com/browse/mix/7"));
    }

    #[test]
    fn test_youtube_music_deep_links() {
        let r = registry();
        assert!(r.is_valid_deep_link(Platform::YouTubeMusic, "https://music.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(r.is_valid_deep_link(
            Platform::YouTubeMusic,
            "https://music.youtube.com/playlist?list=OLAK5uy_abc"
        ));
        assert!(!r.is_valid_deep_link(Platform::YouTubeMusic, "https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
    }

    #[test]
    fn test_search_urls_never_valid() {
        let r = registry();
        assert!(!r.is_valid_deep_link(Platform::Spotify, "https://open.spotify.com/search?q=X"));
        assert!(!r.is_valid_deep_link(
            Platform::Tidal,
            "https://tidal.com/browse/track/123?from=SEARCH"
        ));
        assert!(!r.is_valid_deep_link(
            Platform::YouTubeMusic,
            "https://music.youtube.com/watch?v=abc&feature=search"
        ));
    }

    #[test]
    fn test_match_must_start_at_beginning() {
        let r = registry();
        let wrapped = "see https://open.spotify.com/track/abc123";
        assert!(!r.is_valid_deep_link(Platform::Spotify, wrapped));
        assert_eq!(
            r.extract_first_match(Platform::Spotify, wrapped),
            Some("https://open.spotify.com/track/abc123")
        );
    }

    #[test]
    fn test_extract_first_match_skips_search_urls() {
        let r = registry();
        let text = "a https://tidal.com/browse/track/1?q=search b https://tidal.com/browse/track/2";
        assert_eq!(
            r.extract_first_match(Platform::Tidal, text),
            Some("https://tidal.com/browse/track/2")
        );
        assert_eq!(r.extract_first_match(Platform::Spotify, text), None);
    }

    #[test]
    fn test_classify() {
        let r = registry();
        assert_eq!(r.classify("https://open.spotify.com/track/abc123"), Some(Platform::Spotify));
        assert_eq!(r.classify("https://music.apple.com/us/album/x/123"), Some(Platform::AppleMusic));
        assert_eq!(r.classify("https://example.com/track/1"), None);
        assert_eq!(r.classify("not a url"), None);
    }

    #[test]
    fn test_platform_for_host() {
        let r = registry();
        assert_eq!(r.platform_for_host("https://open.spotify.com/x"), Some(Platform::Spotify));
        assert_eq!(r.platform_for_host("https://itunes.apple.com/x"), Some(Platform::AppleMusic));
        assert_eq!(r.platform_for_host("https://listen.TIDAL.com/x"), Some(Platform::Tidal));
        assert_eq!(r.platform_for_host("https://www.youtube.com/x"), None);
    }
}
