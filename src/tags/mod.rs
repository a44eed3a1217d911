//! Per-container read of track identity and read/write of embedded lyrics.

pub mod id3_codec;
pub mod identity;
pub mod mp4_codec;
pub mod vorbis_codec;

pub use identity::TrackIdentity;

use crate::errors::{LyricsFinderError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Artist and title as stored in a tag; empty strings when absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIdentity {
    pub artist: String,
    pub title: String,
}

/// Format-specific tag access
pub trait TagCodec: Send + Sync {
    fn name(&self) -> &'static str;

    /// Read artist/title from the native tag
    fn read_identity(&self, path: &Path) -> Result<TagIdentity>;

    /// Whether the lyrics field is present and non-empty
    fn has_embedded_lyrics(&self, path: &Path) -> Result<bool>;

    /// Replace any existing lyrics field with `text` and persist the file
    fn write_lyrics(&self, path: &Path, text: &str) -> Result<()>;
}

/// Containers without a defined tag codec (WAV, AIFF)
pub struct UntaggedCodec;

impl TagCodec for UntaggedCodec {
    fn name(&self) -> &'static str {
        "untagged"
    }

    fn read_identity(&self, _path: &Path) -> Result<TagIdentity> {
        Ok(TagIdentity::default())
    }

    fn has_embedded_lyrics(&self, _path: &Path) -> Result<bool> {
        Ok(false)
    }

    fn write_lyrics(&self, path: &Path, _text: &str) -> Result<()> {
        Err(LyricsFinderError::tag_write(
            path,
            "embedding is not supported for this container",
        ))
    }
}

/// Supported audio containers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioFormat {
    Mp3,
    Flac,
    Mp4,
    Ogg,
    Wav,
    Aiff,
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioFormat::Mp3 => write!(f, "mp3"),
            AudioFormat::Flac => write!(f, "flac"),
            AudioFormat::Mp4 => write!(f, "m4a"),
            AudioFormat::Ogg => write!(f, "ogg"),
            AudioFormat::Wav => write!(f, "wav"),
            AudioFormat::Aiff => write!(f, "aiff"),
        }
    }
}

static ID3: id3_codec::Id3Codec = id3_codec::Id3Codec;
static MP4: mp4_codec::Mp4Codec = mp4_codec::Mp4Codec;
static VORBIS: vorbis_codec::VorbisCodec = vorbis_codec::VorbisCodec;
static UNTAGGED: UntaggedCodec = UntaggedCodec;

impl AudioFormat {
    /// Map a file extension (case-insensitive) to a format
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "flac" => Some(AudioFormat::Flac),
            "m4a" | "mp4" => Some(AudioFormat::Mp4),
            "ogg" => Some(AudioFormat::Ogg),
            "wav" => Some(AudioFormat::Wav),
            "aiff" | "aif" => Some(AudioFormat::Aiff),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// The codec bound to this container
    pub fn codec(&self) -> &'static dyn TagCodec {
        match self {
            AudioFormat::Mp3 => &ID3,
            AudioFormat::Mp4 => &MP4,
            AudioFormat::Flac | AudioFormat::Ogg => &VORBIS,
            AudioFormat::Wav | AudioFormat::Aiff => &UNTAGGED,
        }
    }

    pub fn supports_embedding(&self) -> bool {
        !matches!(self, AudioFormat::Wav | AudioFormat::Aiff)
    }

    /// Tag identity, or empty strings when the tag is missing or unreadable
    pub fn read_identity(&self, path: &Path) -> TagIdentity {
        self.codec().read_identity(path).unwrap_or_else(|e| {
            tracing::debug!("No readable {} tags in {}: {}", self, path.display(), e);
            TagIdentity::default()
        })
    }

    /// Presence of embedded lyrics; read failures count as absent
    pub fn has_embedded_lyrics(&self, path: &Path) -> bool {
        self.codec().has_embedded_lyrics(path).unwrap_or_else(|e| {
            tracing::debug!("Could not inspect lyrics in {}: {}", path.display(), e);
            false
        })
    }

    pub fn write_lyrics(&self, path: &Path, text: &str) -> Result<()> {
        self.codec().write_lyrics(path, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_map_to_formats() {
        assert_eq!(AudioFormat::from_extension("MP3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_extension("m4a"), Some(AudioFormat::Mp4));
        assert_eq!(AudioFormat::from_extension("aiff"), Some(AudioFormat::Aiff));
        assert_eq!(AudioFormat::from_extension("lrc"), None);
        assert_eq!(AudioFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn codecs_are_bound_per_format() {
        assert_eq!(AudioFormat::Mp3.codec().name(), "id3");
        assert_eq!(AudioFormat::Mp4.codec().name(), "mp4");
        assert_eq!(AudioFormat::Flac.codec().name(), "vorbis");
        assert_eq!(AudioFormat::Ogg.codec().name(), "vorbis");
        assert_eq!(AudioFormat::Wav.codec().name(), "untagged");
    }

    #[test]
    fn corrupt_containers_fail_open() {
        let dir = tempfile::tempdir().unwrap();
        for (name, format) in [
            ("bad.m4a", AudioFormat::Mp4),
            ("bad.flac", AudioFormat::Flac),
            ("bad.ogg", AudioFormat::Ogg),
            ("bad.mp3", AudioFormat::Mp3),
        ] {
            let path = dir.path().join(name);
            std::fs::write(&path, b"definitely not audio").unwrap();
            assert!(!format.has_embedded_lyrics(&path), "{}", name);
            assert_eq!(format.read_identity(&path), TagIdentity::default(), "{}", name);
        }
    }

    #[test]
    fn untagged_containers_refuse_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.wav");
        std::fs::write(&path, b"RIFF").unwrap();
        assert!(matches!(
            AudioFormat::Wav.write_lyrics(&path, "text"),
            Err(LyricsFinderError::TagWrite { .. })
        ));
    }
}
