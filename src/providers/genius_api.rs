use super::hosts::GENIUS;
use super::scraper::extract_lyrics;
use super::LyricsApi;
use crate::errors::{LyricsFinderError, Result};
use crate::lyrics::document::strip_embed_artifacts;
use crate::lyrics::{compact_slug, LookupQuery, Outcome, ProviderResult, ProviderSource};
use crate::utils::HttpFetch;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

pub const GENIUS_API_BASE: &str = "https://api.genius.com";

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: SearchResponse,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "type")]
    kind: String,
    result: SongHit,
}

/// Non-song hits share the envelope but not these fields
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SongHit {
    url: String,
    title: String,
    primary_artist: ArtistHit,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ArtistHit {
    name: String,
}

impl SongHit {
    /// Same loose containment rule as URL matching, applied to metadata
    fn matches(&self, query: &LookupQuery) -> bool {
        let title = compact_slug(query.title());
        let artist = compact_slug(query.artist());
        let hit_title = compact_slug(&self.title);
        let hit_artist = compact_slug(&self.primary_artist.name);

        let overlaps = |wanted: &str, found: &str| {
            !found.is_empty() && (found.contains(wanted) || wanted.contains(found))
        };

        !title.is_empty() && overlaps(&title, &hit_title) && (artist.is_empty() || overlaps(&artist, &hit_artist))
    }
}

/// Authenticated Genius search followed by a fetch of the matched song page
pub struct GeniusApi {
    http: Arc<dyn HttpFetch>,
    token: String,
    api_base: String,
}

impl GeniusApi {
    pub fn new(http: Arc<dyn HttpFetch>, token: impl Into<String>) -> Self {
        Self {
            http,
            token: token.into(),
            api_base: GENIUS_API_BASE.to_string(),
        }
    }

    async fn find_song(&self, query: &LookupQuery) -> Result<Option<SongHit>> {
        let terms = format!("{} {}", query.title(), query.artist());
        let url = format!(
            "{}/search?q={}",
            self.api_base,
            urlencoding::encode(terms.trim())
        );

        let response = self.http.get_authorized(&url, &self.token).await?;
        if !response.is_ok() {
            return Err(LyricsFinderError::HttpStatus {
                status: response.status,
                url,
            });
        }

        let envelope: SearchEnvelope = serde_json::from_str(&response.body)?;
        Ok(envelope
            .response
            .hits
            .into_iter()
            .filter(|hit| hit.kind == "song")
            .map(|hit| hit.result)
            .find(|song| song.matches(query)))
    }

    async fn fetch_song(&self, query: &LookupQuery) -> Result<Option<String>> {
        let Some(song) = self.find_song(query).await? else {
            return Ok(None);
        };
        tracing::debug!("Genius API matched {} - {} at {}", song.primary_artist.name, song.title, song.url);

        let page = self.http.get(&song.url).await?;
        if !page.is_ok() {
            return Err(LyricsFinderError::HttpStatus {
                status: page.status,
                url: song.url,
            });
        }
        let lyrics = extract_lyrics(&page.body, &GENIUS.container)?;
        Ok(Some(strip_embed_artifacts(&lyrics)))
    }
}

#[async_trait]
impl LyricsApi for GeniusApi {
    async fn resolve(&self, query: &LookupQuery) -> Outcome<ProviderResult> {
        match self.fetch_song(query).await {
            Ok(Some(lyrics)) if !lyrics.is_empty() => Outcome::Found(ProviderResult {
                source: ProviderSource::Api,
                host_label: GENIUS.label.to_string(),
                raw_lyrics: lyrics,
            }),
            Ok(Some(_)) => Outcome::empty("Genius API: matched song has no lyrics"),
            Ok(None) => Outcome::empty("Genius API: no matching song"),
            Err(e) => Outcome::empty(format!("Genius API: {}", e)),
        }
    }
}
