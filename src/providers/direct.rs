use super::hosts::HostRule;
use super::UrlLocator;
use crate::lyrics::{LookupQuery, Outcome, ProviderSource};
use crate::utils::HttpFetch;
use async_trait::async_trait;
use std::sync::Arc;

/// Builds the canonical song URL for a host and confirms it with a HEAD request
pub struct DirectUrlProbe {
    http: Arc<dyn HttpFetch>,
}

impl DirectUrlProbe {
    pub fn new(http: Arc<dyn HttpFetch>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl UrlLocator for DirectUrlProbe {
    fn source(&self) -> ProviderSource {
        ProviderSource::DirectUrl
    }

    async fn locate(&self, query: &LookupQuery, host: &HostRule) -> Outcome<String> {
        let Some(url) = host.direct_url(query) else {
            return Outcome::empty(format!("{}: no artist/title slug for direct URL", host.label));
        };

        match self.http.head(&url).await {
            Ok(200) => Outcome::Found(url),
            Ok(status) => Outcome::empty(format!("{}: HEAD {} returned {}", host.label, url, status)),
            Err(e) => Outcome::empty(format!("{}: HEAD {} failed: {}", host.label, url, e)),
        }
    }
}
