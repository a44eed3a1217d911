use super::AudioFormat;
use crate::lyrics::{normalize, LookupQuery};
use crate::utils::FileUtils;
use std::path::{Path, PathBuf};

/// Separator between artist and title in file names ("Artist - Title.mp3")
const FILENAME_SEPARATOR: &str = " - ";

/// Who and what a file is, derived once per file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackIdentity {
    pub artist: String,
    pub title: String,
    pub source_path: PathBuf,
    pub format: AudioFormat,
}

impl TrackIdentity {
    /// Read tags and fall back to the file name when artist or title is missing.
    /// Returns `None` for unsupported extensions.
    pub fn from_path(path: &Path) -> Option<Self> {
        let format = AudioFormat::from_path(path)?;
        let tags = format.read_identity(path);

        let (artist, title) = if tags.artist.trim().is_empty() || tags.title.trim().is_empty() {
            split_file_stem(&FileUtils::file_stem(path))
        } else {
            (tags.artist, tags.title)
        };

        Some(Self {
            artist: normalize(&artist),
            title: normalize(&title),
            source_path: path.to_path_buf(),
            format,
        })
    }

    /// A normalized title is required before any provider is consulted
    pub fn is_searchable(&self) -> bool {
        !self.title.is_empty()
    }

    pub fn query(&self) -> LookupQuery {
        LookupQuery::new(&self.artist, &self.title)
    }

    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// "Artist - Title" → (artist, title); without a separator the whole stem is the title
fn split_file_stem(stem: &str) -> (String, String) {
    match stem.split_once(FILENAME_SEPARATOR) {
        Some((artist, title)) => (artist.trim().to_string(), title.trim().to_string()),
        None => (String::new(), stem.trim().to_string()),
    }
}
