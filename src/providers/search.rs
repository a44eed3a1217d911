use super::hosts::HostRule;
use super::UrlLocator;
use crate::config::{MatchMode, SearchConfig};
use crate::lyrics::{LookupQuery, Outcome, ProviderSource};
use crate::utils::net::extract_domain;
use crate::utils::HttpFetch;
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;
use std::sync::LazyLock;

static RESULT_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href="([^"]+)""#).expect("valid href pattern"));

/// Site-restricted web search, used when the direct probe finds nothing
pub struct SearchFallback {
    http: Arc<dyn HttpFetch>,
    config: SearchConfig,
}

impl SearchFallback {
    pub fn new(http: Arc<dyn HttpFetch>, config: SearchConfig) -> Self {
        Self { http, config }
    }

    /// `site:domain "artist" "title" lyrics`, percent-encoded onto the endpoint
    fn search_url(&self, query: &LookupQuery, host: &HostRule) -> String {
        let terms = if query.artist().is_empty() {
            format!("site:{} \"{}\" lyrics", host.domain, query.title())
        } else {
            format!("site:{} \"{}\" \"{}\" lyrics", host.domain, query.artist(), query.title())
        };
        format!("{}{}", self.config.endpoint, urlencoding::encode(&terms))
    }

    fn select(&self, candidates: &[String], query: &LookupQuery, host: &HostRule) -> Option<String> {
        let mut song_pages = candidates.iter().filter(|url| host.is_song_page(url));
        match self.config.match_mode {
            MatchMode::Strict => song_pages.find(|url| host.matches_query(url, query)).cloned(),
            MatchMode::FirstResult => song_pages.next().cloned(),
        }
    }
}

#[async_trait]
impl UrlLocator for SearchFallback {
    fn source(&self) -> ProviderSource {
        ProviderSource::SearchFallback
    }

    async fn locate(&self, query: &LookupQuery, host: &HostRule) -> Outcome<String> {
        if query.title().is_empty() {
            return Outcome::empty(format!("{}: nothing to search for", host.label));
        }

        let search_url = self.search_url(query, host);
        self.http.pace().await;

        let response = match self.http.get(&search_url).await {
            Ok(response) if response.is_ok() => response,
            Ok(response) => {
                return Outcome::empty(format!("{}: search returned {}", host.label, response.status))
            }
            Err(e) => return Outcome::empty(format!("{}: search failed: {}", host.label, e)),
        };

        let engine_domain = extract_domain(&self.config.endpoint);
        let candidates = extract_result_links(&response.body, engine_domain.as_deref(), self.config.max_results);
        tracing::debug!("{} search candidates for {}: {:?}", host.label, query, candidates);

        match self.select(&candidates, query, host) {
            Some(url) => Outcome::Found(url),
            None => Outcome::empty(format!(
                "{}: no matching result among {} candidates",
                host.label,
                candidates.len()
            )),
        }
    }
}

/// Result links from a search page, in page order, deduplicated.
///
/// Redirect wrappers (`/l/?uddg=<target>`) are unwrapped to their target and
/// links back to the engine itself are dropped.
pub fn extract_result_links(html: &str, engine_domain: Option<&str>, limit: usize) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();

    for capture in RESULT_HREF.captures_iter(html) {
        let href = capture[1].replace("&amp;", "&");
        let Some(target) = unwrap_redirect(&href) else {
            continue;
        };

        let is_engine_link = match (extract_domain(&target), engine_domain) {
            (Some(domain), Some(engine)) => same_site(&domain, engine),
            (None, _) => true,
            _ => false,
        };
        if is_engine_link || links.contains(&target) {
            continue;
        }

        links.push(target);
        if links.len() >= limit {
            break;
        }
    }

    links
}

/// Either domain is the other or a subdomain of it
fn same_site(a: &str, b: &str) -> bool {
    a == b || a.ends_with(&format!(".{}", b)) || b.ends_with(&format!(".{}", a))
}

/// Absolute target URL of a result href
fn unwrap_redirect(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    let parsed = url::Url::parse(&absolute).ok()?;
    if parsed.path().starts_with("/l/") {
        return parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned());
    }
    Some(absolute)
}
