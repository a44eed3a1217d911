//! Known lyrics hosts and the rules that decide whether a URL is a song page.
//!
//! Every URL acceptance decision for the direct probe and the search
//! fallback goes through this table.

use crate::lyrics::{compact_slug, fold_ascii, LookupQuery};
use crate::utils::net::extract_domain;

/// Where the lyric body sits inside a host's page.
///
/// `anchor` is matched first; the content runs from the end of the anchor to
/// the close of the enclosing `tag` element, counting nested elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerRule {
    pub anchor: &'static str,
    pub tag: &'static str,
}

/// A lyrics host with its URL template and validation rules
#[derive(Clone, Copy)]
pub struct HostRule {
    pub label: &'static str,
    pub domain: &'static str,
    /// Substring every song-page path contains
    pub required_marker: &'static str,
    /// First path segments of index, album or search pages
    pub index_segments: &'static [&'static str],
    /// Song pages have at least this many path segments
    pub min_path_segments: usize,
    pub container: ContainerRule,
    url_template: fn(&LookupQuery) -> String,
}

pub const GENIUS: HostRule = HostRule {
    label: "Genius",
    domain: "genius.com",
    required_marker: "-lyrics",
    index_segments: &["albums", "artists", "search", "videos", "discussions"],
    min_path_segments: 1,
    container: ContainerRule {
        anchor: r#"<div[^>]*data-lyrics-container="true"[^>]*>"#,
        tag: "div",
    },
    url_template: genius_url,
};

pub const AZLYRICS: HostRule = HostRule {
    label: "AZLyrics",
    domain: "azlyrics.com",
    required_marker: "/lyrics/",
    index_segments: &["search.php", "lyricsdb"],
    min_path_segments: 3,
    container: ContainerRule {
        anchor: r"<!-- Usage of azlyrics\.com content[^>]*-->",
        tag: "div",
    },
    url_template: azlyrics_url,
};

pub const SONGLYRICS: HostRule = HostRule {
    label: "SongLyrics",
    domain: "songlyrics.com",
    required_marker: "-lyrics",
    index_segments: &["news", "index.php", "top-songs", "search"],
    min_path_segments: 2,
    container: ContainerRule {
        anchor: r#"<p[^>]*id="songLyricsDiv"[^>]*>"#,
        tag: "p",
    },
    url_template: songlyrics_url,
};

impl std::fmt::Debug for HostRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostRule")
            .field("label", &self.label)
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}

/// Hosts in the order the resolver tries them
pub fn default_hosts() -> Vec<HostRule> {
    vec![GENIUS, AZLYRICS, SONGLYRICS]
}

/// genius.com/Artist-name-song-title-lyrics (first letter capitalized)
fn genius_url(query: &LookupQuery) -> String {
    let slug = format!("{}-{}-lyrics", query.artist_slug(), query.title_slug());
    let mut chars = slug.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    };
    format!("https://genius.com/{}", capitalized)
}

/// azlyrics.com/lyrics/artistname/songtitle.html
fn azlyrics_url(query: &LookupQuery) -> String {
    format!(
        "https://www.azlyrics.com/lyrics/{}/{}.html",
        compact_slug(query.artist()),
        compact_slug(query.title())
    )
}

/// songlyrics.com/artist-name/song-title-lyrics/
fn songlyrics_url(query: &LookupQuery) -> String {
    format!(
        "https://www.songlyrics.com/{}/{}-lyrics/",
        query.artist_slug(),
        query.title_slug()
    )
}

impl HostRule {
    /// Candidate URL for a direct probe; `None` without both artist and title slugs
    pub fn direct_url(&self, query: &LookupQuery) -> Option<String> {
        if query.artist_slug().is_empty() || query.title_slug().is_empty() {
            return None;
        }
        Some((self.url_template)(query))
    }

    /// Host is this domain or one of its subdomains
    pub fn matches_host(&self, url: &str) -> bool {
        extract_domain(url)
            .map(|host| host == self.domain || host.ends_with(&format!(".{}", self.domain)))
            .unwrap_or(false)
    }

    /// Structural check: right host, song-page marker present, not an index page
    pub fn is_song_page(&self, url: &str) -> bool {
        if !self.matches_host(url) {
            return false;
        }
        let Ok(parsed) = url::Url::parse(url) else {
            return false;
        };
        let path = parsed.path().to_lowercase();

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let is_index = segments
            .first()
            .is_some_and(|first| self.index_segments.iter().any(|index| *index == *first));

        path.contains(self.required_marker) && segments.len() >= self.min_path_segments && !is_index
    }

    /// Token check: the path spells both the artist and the title.
    /// An empty artist only requires the title.
    pub fn matches_query(&self, url: &str, query: &LookupQuery) -> bool {
        let Ok(parsed) = url::Url::parse(url) else {
            return false;
        };
        let decoded_path = urlencoding::decode(parsed.path())
            .map(|path| path.into_owned())
            .unwrap_or_else(|_| parsed.path().to_string());
        let path = fold_ascii(&decoded_path);

        let title = compact_slug(query.title());
        let artist = compact_slug(query.artist());

        !title.is_empty() && path.contains(&title) && (artist.is_empty() || path.contains(&artist))
    }
}
