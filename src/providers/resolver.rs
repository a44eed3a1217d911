use super::direct::DirectUrlProbe;
use super::genius_api::GeniusApi;
use super::hosts::{default_hosts, HostRule};
use super::scraper::PageScraper;
use super::search::SearchFallback;
use super::{LyricsApi, LyricsScraper, TrackResolver, UrlLocator};
use crate::batch::EventSink;
use crate::config::SearchConfig;
use crate::lyrics::{LookupQuery, Outcome, ProviderResult};
use crate::utils::{HttpFetch, Logger};
use async_trait::async_trait;
use std::sync::Arc;

/// Result of running the whole provider chain for one track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(ProviderResult),
    Exhausted,
}

/// Runs the provider chain: API first, then per host a direct probe, a
/// search only when the probe found nothing, and a scrape of whichever URL
/// survived validation. The first non-empty body wins.
pub struct LyricsResolver {
    api: Option<Arc<dyn LyricsApi>>,
    direct: Arc<dyn UrlLocator>,
    search: Arc<dyn UrlLocator>,
    scraper: Arc<dyn LyricsScraper>,
    hosts: Vec<HostRule>,
}

impl LyricsResolver {
    /// Production wiring over one shared HTTP session
    pub fn with_session(http: Arc<dyn HttpFetch>, token: Option<String>, search: &SearchConfig) -> Self {
        let api = token.map(|token| Arc::new(GeniusApi::new(http.clone(), token)) as Arc<dyn LyricsApi>);

        Self {
            api,
            direct: Arc::new(DirectUrlProbe::new(http.clone())),
            search: Arc::new(SearchFallback::new(http.clone(), search.clone())),
            scraper: Arc::new(PageScraper::new(http)),
            hosts: default_hosts(),
        }
    }

    pub fn with_strategies(
        api: Option<Arc<dyn LyricsApi>>,
        direct: Arc<dyn UrlLocator>,
        search: Arc<dyn UrlLocator>,
        scraper: Arc<dyn LyricsScraper>,
        hosts: Vec<HostRule>,
    ) -> Self {
        Self {
            api,
            direct,
            search,
            scraper,
            hosts,
        }
    }

    async fn try_api(&self, query: &LookupQuery, events: &dyn EventSink) -> Option<ProviderResult> {
        let Some(api) = &self.api else {
            events.status("Genius API: no credential configured, skipping");
            return None;
        };

        events.status("Trying Genius API...");
        match api.resolve(query).await {
            Outcome::Found(result) if result.has_lyrics() => Some(result),
            Outcome::Found(_) => {
                report_miss(events, "API", "Genius API: empty lyrics body");
                None
            }
            Outcome::Empty(reason) => {
                report_miss(events, "API", &reason);
                None
            }
        }
    }

    /// A URL from `locator` that passes the host's structural rule
    async fn locate(
        &self,
        locator: &dyn UrlLocator,
        query: &LookupQuery,
        host: &HostRule,
        events: &dyn EventSink,
    ) -> Option<String> {
        let provider = locator.source().to_string();
        match locator.locate(query, host).await {
            Outcome::Found(url) if host.is_song_page(&url) => {
                events.status(&format!("{}: candidate {}", provider, url));
                Some(url)
            }
            Outcome::Found(url) => {
                report_miss(events, &provider, &format!("{}: rejected non-song page {}", host.label, url));
                None
            }
            Outcome::Empty(reason) => {
                report_miss(events, &provider, &reason);
                None
            }
        }
    }

    async fn try_host(&self, query: &LookupQuery, host: &HostRule, events: &dyn EventSink) -> Option<ProviderResult> {
        let url = match self.locate(self.direct.as_ref(), query, host, events).await {
            Some(url) => url,
            None => self.locate(self.search.as_ref(), query, host, events).await?,
        };

        match self.scraper.scrape(&url, host).await {
            Outcome::Found(result) if result.has_lyrics() => Some(result),
            Outcome::Found(_) => {
                report_miss(events, "Scrape", &format!("{}: empty lyrics body", host.label));
                None
            }
            Outcome::Empty(reason) => {
                report_miss(events, "Scrape", &reason);
                None
            }
        }
    }
}

fn report_miss(events: &dyn EventSink, provider: &str, reason: &str) {
    Logger::log_provider_miss(provider, reason);
    events.status(reason);
}

#[async_trait]
impl TrackResolver for LyricsResolver {
    async fn resolve(&self, query: &LookupQuery, events: &dyn EventSink) -> Resolution {
        if query.title().is_empty() {
            events.status("No title to search for");
            return Resolution::Exhausted;
        }

        if let Some(result) = self.try_api(query, events).await {
            return Resolution::Found(result);
        }

        for host in &self.hosts {
            events.status(&format!("Trying {}...", host.label));
            if let Some(result) = self.try_host(query, host, events).await {
                return Resolution::Found(result);
            }
        }

        Resolution::Exhausted
    }
}
