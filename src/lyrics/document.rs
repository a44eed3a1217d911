use regex::Regex;
use std::sync::LazyLock;

/// Trailing share-widget text Genius appends to lyric bodies
static EMBED_ARTIFACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d*EmbedShare URLCopyEmbedCopy|\d*Embed\s*$)").expect("valid embed pattern")
});

/// Section headers such as "[Chorus]" or "[Verse 2: Someone]"
static SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]\n]*\]").expect("valid header pattern"));

/// Lines that page templates inject between lyric blocks
const NOISE_LINES: &[&str] = &["You might also like"];

/// Normalized lyric body, built once per successful resolution
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LyricsDocument {
    plain_text: String,
    lines: Vec<String>,
}

impl LyricsDocument {
    /// De-noise a raw provider body
    pub fn from_raw(raw: &str) -> Self {
        let text = raw.replace("\r\n", "\n").replace('\r', "\n");
        let text = strip_embed_artifacts(&text);
        let text = SECTION_HEADER.replace_all(&text, "");

        let lines: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| !NOISE_LINES.contains(line))
            .map(str::to_string)
            .collect();

        Self {
            plain_text: lines.join("\n"),
            lines,
        }
    }

    pub fn plain_text(&self) -> &str {
        &self.plain_text
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Remove Genius share-widget residue from the end of a lyric body
pub fn strip_embed_artifacts(text: &str) -> String {
    EMBED_ARTIFACT.replace_all(text.trim_end(), "").trim().to_string()
}
