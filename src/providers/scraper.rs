use super::hosts::{ContainerRule, HostRule};
use super::LyricsScraper;
use crate::errors::{LyricsFinderError, Result};
use crate::lyrics::{LyricsDocument, Outcome, ProviderResult, ProviderSource};
use crate::utils::HttpFetch;
use async_trait::async_trait;
use regex::{Captures, Regex};
use std::sync::Arc;
use std::sync::LazyLock;

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|</(?:p|div|li)>").expect("valid break pattern"));

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment pattern"));

static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag pattern"));

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("valid entity pattern")
});

/// Marks page furniture (headers, ads) nested inside a lyrics container
static EXCLUDED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<div[^>]*data-exclude-from-selection="true"[^>]*>"#)
        .expect("valid exclusion pattern")
});

/// Fetches song pages and extracts the lyric body
pub struct PageScraper {
    http: Arc<dyn HttpFetch>,
}

impl PageScraper {
    pub fn new(http: Arc<dyn HttpFetch>) -> Self {
        Self { http }
    }

    async fn fetch_lyrics(&self, url: &str, host: &HostRule) -> Result<String> {
        let response = self.http.get(url).await?;
        if !response.is_ok() {
            return Err(LyricsFinderError::HttpStatus {
                status: response.status,
                url: url.to_string(),
            });
        }
        extract_lyrics(&response.body, &host.container)
    }
}

#[async_trait]
impl LyricsScraper for PageScraper {
    async fn scrape(&self, url: &str, host: &HostRule) -> Outcome<ProviderResult> {
        match self.fetch_lyrics(url, host).await {
            Ok(lyrics) if !lyrics.is_empty() => Outcome::Found(ProviderResult {
                source: ProviderSource::Scrape,
                host_label: host.label.to_string(),
                raw_lyrics: lyrics,
            }),
            Ok(_) => Outcome::empty(format!("{}: no lyrics container on {}", host.label, url)),
            Err(e) => Outcome::empty(format!("{}: scrape failed: {}", host.label, e)),
        }
    }
}

/// Pull the lyric text out of a page.
///
/// Every element matching the container rule contributes, in page order.
/// Markup becomes line breaks and plain text, then the body is de-noised.
/// Returns an empty string when no container is present.
pub fn extract_lyrics(html: &str, rule: &ContainerRule) -> Result<String> {
    let anchor = Regex::new(&format!("(?i){}", rule.anchor))?;
    let element = element_pattern(rule.tag)?;

    let mut blocks = Vec::new();
    let mut cursor = 0;
    while let Some(found) = anchor.find_at(html, cursor) {
        let (content_end, outer_end) = element_end(html, found.end(), &element);
        let inner = strip_excluded(&html[found.end()..content_end])?;
        blocks.push(html_to_text(&inner));
        cursor = outer_end;
    }

    let document = LyricsDocument::from_raw(&blocks.join("\n"));
    Ok(document.plain_text().to_string())
}

fn element_pattern(tag: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(r"(?i)<(/?){}\b[^>]*>", regex::escape(tag)))?)
}

/// Find where the element open before `from` closes, counting nested
/// elements of the same tag. Returns (content end, end of closing tag);
/// an unclosed element runs to the end of the page.
fn element_end(html: &str, from: usize, element: &Regex) -> (usize, usize) {
    let mut depth = 1usize;
    for captures in element.captures_iter(&html[from..]) {
        let Some(tag) = captures.get(0) else {
            continue;
        };
        let closing = captures.get(1).is_some_and(|slash| !slash.as_str().is_empty());
        if closing {
            depth -= 1;
            if depth == 0 {
                return (from + tag.start(), from + tag.end());
            }
        } else if !tag.as_str().ends_with("/>") {
            depth += 1;
        }
    }
    (html.len(), html.len())
}

/// Remove nested `data-exclude-from-selection` blocks
fn strip_excluded(fragment: &str) -> Result<String> {
    let element = element_pattern("div")?;
    let mut kept = String::with_capacity(fragment.len());
    let mut cursor = 0;
    while let Some(found) = EXCLUDED_BLOCK.find_at(fragment, cursor) {
        kept.push_str(&fragment[cursor..found.start()]);
        let (_, outer_end) = element_end(fragment, found.end(), &element);
        cursor = outer_end;
    }
    kept.push_str(&fragment[cursor..]);
    Ok(kept)
}

fn html_to_text(fragment: &str) -> String {
    let without_comments = COMMENT.replace_all(fragment, "");
    let with_breaks = LINE_BREAK.replace_all(&without_comments, "\n");
    let text = ANY_TAG.replace_all(&with_breaks, "");
    decode_entities(&text)
}

fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                    u32::from_str_radix(&entity[2..], 16).ok().and_then(char::from_u32)
                }
                _ if entity.starts_with('#') => entity[1..].parse().ok().and_then(char::from_u32),
                _ => None,
            };
            decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}
