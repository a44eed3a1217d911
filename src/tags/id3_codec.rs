use super::{TagCodec, TagIdentity};
use crate::errors::{LyricsFinderError, Result};
use id3::frame::Lyrics;
use id3::{ErrorKind, Tag, TagLike, Version};
use std::path::Path;

/// MP3: TPE1/TIT2 for identity, USLT for lyrics
pub struct Id3Codec;

impl TagCodec for Id3Codec {
    fn name(&self) -> &'static str {
        "id3"
    }

    fn read_identity(&self, path: &Path) -> Result<TagIdentity> {
        let tag = Tag::read_from_path(path)?;
        Ok(TagIdentity {
            artist: tag.artist().unwrap_or_default().to_string(),
            title: tag.title().unwrap_or_default().to_string(),
        })
    }

    fn has_embedded_lyrics(&self, path: &Path) -> Result<bool> {
        let tag = Tag::read_from_path(path)?;
        let has_lyrics = tag.lyrics().any(|lyrics| !lyrics.text.trim().is_empty());
        Ok(has_lyrics)
    }

    fn write_lyrics(&self, path: &Path, text: &str) -> Result<()> {
        // A missing tag starts fresh; any other read error must not wipe existing frames
        let mut tag = match Tag::read_from_path(path) {
            Ok(tag) => tag,
            Err(e) if matches!(e.kind, ErrorKind::NoTag) => Tag::new(),
            Err(e) => return Err(LyricsFinderError::tag_write(path, e)),
        };

        tag.remove_all_lyrics();
        tag.add_frame(Lyrics {
            lang: "eng".to_string(),
            description: String::new(),
            text: text.to_string(),
        });

        tag.write_to_path(path, Version::Id3v24)
            .map_err(|e| LyricsFinderError::tag_write(path, e))
    }
}
