//! Canonical forms of free-text artist and title strings.

use any_ascii::any_ascii;
use regex::Regex;
use std::sync::LazyLock;

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\(\[].*?[\)\]]").expect("valid bracket pattern"));

static DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{M}\p{N}\s'-]").expect("valid charset pattern"));

static FEATURING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\b(?:feat|ft|with|featuring)\b.*").expect("valid featuring pattern")
});

static NON_SLUG_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug pattern"));

/// Canonicalize an artist or title for use as a query.
///
/// Drops bracketed annotations, a trailing "feat./ft./with/featuring" clause,
/// characters other than letters, digits, whitespace, apostrophes and
/// hyphens, then collapses whitespace. Characters are stripped before the
/// featuring clause is cut so that a second pass never exposes a new token.
pub fn normalize(raw: &str) -> String {
    let without_brackets = BRACKETED.replace_all(raw, "");
    let allowed = DISALLOWED_CHARS.replace_all(&without_brackets, "");
    let without_featuring = FEATURING.replace(&allowed, "");
    collapse_whitespace(&without_featuring)
}

/// Lowercase, ASCII-only, hyphen-separated form used in URL paths.
pub fn slugify(raw: &str) -> String {
    let ascii = any_ascii(&normalize(raw)).to_lowercase();
    let without_apostrophes: String = ascii.chars().filter(|c| *c != '\'').collect();
    NON_SLUG_RUN
        .replace_all(&without_apostrophes, "-")
        .trim_matches('-')
        .to_string()
}

/// Slug with the separators removed, for containment checks across hosts
/// that spell paths with or without hyphens.
pub fn compact_slug(raw: &str) -> String {
    slugify(raw).replace('-', "")
}

/// ASCII letters and digits only, lowercased, without normalizing first.
/// Used on URL paths, where "with" or brackets are part of the slug.
pub fn fold_ascii(raw: &str) -> String {
    any_ascii(raw)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "   ",
        "Hello (Remastered 2011)",
        "Song [Live] feat. Someone Else",
        "Artist ft. Other",
        "Stay With Me",
        "Featuring Nobody",
        "wi.th you",
        "Beyoncé & JAY-Z",
        "Don't Stop Me Now",
        "  lots   of\tspace\n here ",
        "Тату — Нас не догонят",
        "東京 (Tokyo)",
        "(only brackets)",
        "a(b",
        "100% Pure_Love!",
        "Sigur Rós - Hoppípolla",
    ];

    #[test]
    fn strips_annotations_and_featuring() {
        assert_eq!(normalize("Hello (Remastered 2011)"), "Hello");
        assert_eq!(normalize("Song [Live] feat. Someone Else"), "Song");
        assert_eq!(normalize("Artist ft. Other"), "Artist");
        assert_eq!(normalize("Don't Stop Me Now"), "Don't Stop Me Now");
        assert_eq!(normalize("  lots   of\tspace\n here "), "lots of space here");
        assert_eq!(normalize("100% Pure_Love!"), "100 PureLove");
    }

    #[test]
    fn with_is_treated_as_featuring() {
        assert_eq!(normalize("Stay With Me"), "Stay");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(slugify(""), "");
        assert_eq!(normalize("(only brackets)"), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for sample in SAMPLES {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn slug_charset_and_edges() {
        for sample in SAMPLES {
            let slug = slugify(sample);
            assert!(
                slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "bad slug {:?} for {:?}",
                slug,
                sample
            );
            assert!(!slug.starts_with('-') && !slug.ends_with('-'));
            assert!(!slug.contains("--"));
        }
    }

    #[test]
    fn slug_transliterates() {
        assert_eq!(slugify("Beyoncé & JAY-Z"), "beyonce-jay-z");
        assert_eq!(slugify("Sigur Rós - Hoppípolla"), "sigur-ros-hoppipolla");
        assert_eq!(slugify("Don't Stop Me Now"), "dont-stop-me-now");
        assert_eq!(compact_slug("Don't Stop Me Now"), "dontstopmenow");
    }

    #[test]
    fn folding_keeps_every_word() {
        assert_eq!(fold_ascii("/Sam-smith-stay-with-me-lyrics"), "samsmithstaywithmelyrics");
        assert_eq!(fold_ascii("/lyrics/björk/joga.html"), "lyricsbjorkjogahtml");
    }
}
