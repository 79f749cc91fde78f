//! Labeled-line extraction of title, artist and entity type.
//!
//! The search service is asked to answer with `Type:`, `Title:` and
//! `Artist:` lines, but the answer is free text and often wrapped in
//! markdown. Every update re-reads the full accumulated text; a field that
//! has already been accepted is never touched again.

use regex::Regex;

use super::domain::{ReleaseKind, ResolutionResult, ResolveError};

/// Values the model uses to say "I don't know".
const ABSENT_TITLE: &[&str] = &["n/a"];
const ABSENT_ARTIST: &[&str] = &["n/a", "none"];

/// Fields found in one pass over the text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub kind: Option<ReleaseKind>,
}

/// Compiled labeled-line matchers.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    title: Regex,
    artist: Regex,
    kind: Regex,
}

fn label_regex(label: &str) -> Result<Regex, ResolveError> {
    // Optional list/quote/emphasis markup, the label, optional emphasis, colon,
    // then the rest of the line.
    let pattern = format!(r"(?im)^[ \t>*_#\-]*{label}[ \t*_]*:[ \t]*(.*)$");
    Regex::new(&pattern)
        .map_err(|e| ResolveError::Configuration(format!("invalid {label} pattern: {e}")))
}

/// Strip emphasis markup and surrounding whitespace.
fn clean_value(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '*' | '_'))
        .collect::<String>()
        .trim()
        .to_string()
}

impl FieldExtractor {
    pub fn new() -> Result<Self, ResolveError> {
        Ok(Self {
            title: label_regex("title")?,
            artist: label_regex("artist")?,
            kind: label_regex("type")?,
        })
    }

    /// Extract fields from `text`.
    ///
    /// When `complete` is false the text is still streaming, so a labeled
    /// line that is not yet newline-terminated is ignored.
    pub fn extract(&self, text: &str, complete: bool) -> ExtractedFields {
        ExtractedFields {
            title: first_value(&self.title, text, complete, |v| accept_name(v, ABSENT_TITLE)),
            artist: first_value(&self.artist, text, complete, |v| accept_name(v, ABSENT_ARTIST)),
            kind: first_value(&self.kind, text, complete, parse_kind),
        }
    }

    /// Fill any still-empty fields of `result` from `text`.
    pub fn apply(&self, result: &mut ResolutionResult, text: &str, complete: bool) {
        let fields = self.extract(text, complete);

        if result.title.is_empty()
            && let Some(title) = fields.title
        {
            tracing::debug!(%title, "Title identified");
            result.title = title;
        }
        if result.artist.is_empty()
            && let Some(artist) = fields.artist
        {
            tracing::debug!(%artist, "Artist identified");
            result.artist = artist;
        }
        if result.kind == ReleaseKind::Unknown
            && let Some(kind) = fields.kind
        {
            tracing::debug!(kind = kind.as_str(), "Type identified");
            result.kind = kind;
        }
    }
}

/// First labeled line whose value `accept` turns into a field value.
fn first_value<T>(
    re: &Regex,
    text: &str,
    complete: bool,
    accept: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if !complete && whole.end() == text.len() {
            // Last line may still be growing
            break;
        }
        if let Some(value) = caps.get(1).and_then(|m| accept(m.as_str())) {
            return Some(value);
        }
    }
    None
}

fn accept_name(raw: &str, absent: &[&str]) -> Option<String> {
    let value = clean_value(raw);
    if value.is_empty() || absent.iter().any(|a| value.eq_ignore_ascii_case(a)) {
        return None;
    }
    Some(value)
}

fn parse_kind(raw: &str) -> Option<ReleaseKind> {
    let value = clean_value(raw);
    let word = value
        .split(|c: char| !c.is_ascii_alphabetic())
        .find(|w| !w.is_empty())?;
    ReleaseKind::from_label(word)
}
