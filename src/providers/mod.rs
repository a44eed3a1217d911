//! Lyrics provider strategies and the resolver that orders them.
//!
//! Each strategy is a trait so the resolver can be driven with mocks in tests.
//! Strategies never return errors: network and parse failures are folded
//! into `Outcome::Empty` with a diagnostic.

pub mod direct;
pub mod genius_api;
pub mod hosts;
pub mod resolver;
pub mod scraper;
pub mod search;

pub use direct::DirectUrlProbe;
pub use genius_api::GeniusApi;
pub use hosts::{default_hosts, ContainerRule, HostRule};
pub use resolver::{LyricsResolver, Resolution};
pub use scraper::{extract_lyrics, PageScraper};
pub use search::SearchFallback;

use crate::batch::EventSink;
use crate::lyrics::{LookupQuery, Outcome, ProviderResult, ProviderSource};
use async_trait::async_trait;

/// Authenticated lyrics lookup, tried before anything else
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LyricsApi: Send + Sync {
    async fn resolve(&self, query: &LookupQuery) -> Outcome<ProviderResult>;
}

/// Finds a candidate song-page URL on one host
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlLocator: Send + Sync {
    fn source(&self) -> ProviderSource;

    async fn locate(&self, query: &LookupQuery, host: &HostRule) -> Outcome<String>;
}

/// Fetches a song page and pulls the lyric body out of it
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LyricsScraper: Send + Sync {
    async fn scrape(&self, url: &str, host: &HostRule) -> Outcome<ProviderResult>;
}

/// Full provider chain for one track
#[async_trait]
pub trait TrackResolver: Send + Sync {
    async fn resolve(&self, query: &LookupQuery, events: &dyn EventSink) -> Resolution;
}
