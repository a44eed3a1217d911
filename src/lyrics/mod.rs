pub mod document;
pub mod lrc;
pub mod normalize;

pub use document::LyricsDocument;
pub use lrc::{generate, SubtitleLine, SubtitleTrack};
pub use normalize::{compact_slug, fold_ascii, normalize, slugify};

use serde::{Deserialize, Serialize};

/// Normalized (artist, title) pair handed to every provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupQuery {
    artist: String,
    title: String,
}

impl LookupQuery {
    /// Build a query; both fields pass through `normalize`
    pub fn new(artist: &str, title: &str) -> Self {
        Self {
            artist: normalize(artist),
            title: normalize(title),
        }
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist_slug(&self) -> String {
        slugify(&self.artist)
    }

    pub fn title_slug(&self) -> String {
        slugify(&self.title)
    }
}

impl std::fmt::Display for LookupQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.artist.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{} - {}", self.artist, self.title)
        }
    }
}

/// Which strategy produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderSource {
    Api,
    DirectUrl,
    SearchFallback,
    Scrape,
}

impl std::fmt::Display for ProviderSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderSource::Api => write!(f, "API"),
            ProviderSource::DirectUrl => write!(f, "Direct URL"),
            ProviderSource::SearchFallback => write!(f, "Search"),
            ProviderSource::Scrape => write!(f, "Scrape"),
        }
    }
}

/// Lyrics as returned by a provider. An empty body means "not found".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResult {
    pub source: ProviderSource,
    pub host_label: String,
    pub raw_lyrics: String,
}

impl ProviderResult {
    pub fn has_lyrics(&self) -> bool {
        !self.raw_lyrics.trim().is_empty()
    }
}

/// Result of one strategy call. Errors never escape a strategy: they become
/// `Empty` with a diagnostic for the event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Found(T),
    Empty(String),
}

impl<T> Outcome<T> {
    pub fn empty(reason: impl Into<String>) -> Self {
        Outcome::Empty(reason.into())
    }

    pub fn found(self) -> Option<T> {
        match self {
            Outcome::Found(value) => Some(value),
            Outcome::Empty(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_normalized_once() {
        let query = LookupQuery::new("  Daft Punk ", "Get Lucky (feat. Pharrell Williams)");
        assert_eq!(query.artist(), "Daft Punk");
        assert_eq!(query.title(), "Get Lucky");
        assert_eq!(query.artist_slug(), "daft-punk");
        assert_eq!(query.to_string(), "Daft Punk - Get Lucky");
    }

    #[test]
    fn whitespace_body_is_not_found() {
        let result = ProviderResult {
            source: ProviderSource::Scrape,
            host_label: "Genius".to_string(),
            raw_lyrics: " \n ".to_string(),
        };
        assert!(!result.has_lyrics());
    }
}
