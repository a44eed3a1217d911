use super::{TagCodec, TagIdentity};
use crate::errors::{LyricsFinderError, Result};
use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFile, TaggedFileExt};
use lofty::read_from_path;
use lofty::tag::{Accessor, ItemKey, Tag as LoftyTag};
use std::path::Path;

/// FLAC and Ogg Vorbis: ARTIST/TITLE and a LYRICS comment
pub struct VorbisCodec;

fn read_file(path: &Path) -> Result<TaggedFile> {
    read_from_path(path).map_err(|e| LyricsFinderError::Lofty(e.to_string()))
}

impl TagCodec for VorbisCodec {
    fn name(&self) -> &'static str {
        "vorbis"
    }

    fn read_identity(&self, path: &Path) -> Result<TagIdentity> {
        let tagged_file = read_file(path)?;
        let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
            return Ok(TagIdentity::default());
        };

        Ok(TagIdentity {
            artist: tag.artist().map(|s| s.into_owned()).unwrap_or_default(),
            title: tag.title().map(|s| s.into_owned()).unwrap_or_default(),
        })
    }

    fn has_embedded_lyrics(&self, path: &Path) -> Result<bool> {
        let tagged_file = read_file(path)?;
        let has_lyrics = tagged_file
            .primary_tag()
            .and_then(|tag| tag.get_string(&ItemKey::Lyrics))
            .is_some_and(|lyrics| !lyrics.trim().is_empty());
        Ok(has_lyrics)
    }

    fn write_lyrics(&self, path: &Path, text: &str) -> Result<()> {
        let mut tagged_file = read_file(path).map_err(|e| LyricsFinderError::tag_write(path, e))?;

        if tagged_file.primary_tag().is_none() {
            let tag_type = tagged_file.primary_tag_type();
            tagged_file.insert_tag(LoftyTag::new(tag_type));
        }

        let tag = tagged_file
            .primary_tag_mut()
            .ok_or_else(|| LyricsFinderError::tag_write(path, "no writable tag"))?;
        // insert_text replaces an existing LYRICS item rather than appending
        tag.insert_text(ItemKey::Lyrics, text.to_string());

        tagged_file
            .save_to_path(path, WriteOptions::default())
            .map_err(|e| LyricsFinderError::tag_write(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::minimal_flac;

    fn lyrics_items(path: &Path) -> Vec<String> {
        let tagged_file = read_file(path).unwrap();
        tagged_file
            .primary_tag()
            .map(|tag| tag.get_strings(&ItemKey::Lyrics).map(str::to_string).collect())
            .unwrap_or_default()
    }

    #[test]
    fn writing_twice_leaves_one_lyrics_comment() {
        let dir = tempfile::tempdir().unwrap();
        let path = minimal_flac(dir.path(), "song.flac");

        VorbisCodec.write_lyrics(&path, "first").unwrap();
        VorbisCodec.write_lyrics(&path, "Line one\nLine two").unwrap();

        assert_eq!(lyrics_items(&path), vec!["Line one\nLine two".to_string()]);
    }

    #[test]
    fn lyrics_presence_follows_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = minimal_flac(dir.path(), "song.flac");

        assert!(!VorbisCodec.has_embedded_lyrics(&path).unwrap());
        VorbisCodec.write_lyrics(&path, "Is this the real life?").unwrap();
        assert!(VorbisCodec.has_embedded_lyrics(&path).unwrap());
    }

    #[test]
    fn untagged_flac_has_empty_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = minimal_flac(dir.path(), "bare.flac");
        assert_eq!(VorbisCodec.read_identity(&path).unwrap(), TagIdentity::default());
    }
}
