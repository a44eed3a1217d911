use super::{TagCodec, TagIdentity};
use crate::errors::{LyricsFinderError, Result};
use std::path::Path;

/// MP4/M4A: ©ART/©nam for identity, ©lyr for lyrics
pub struct Mp4Codec;

fn read_tag(path: &Path) -> Result<mp4ameta::Tag> {
    mp4ameta::Tag::read_from_path(path).map_err(|e| LyricsFinderError::Mp4(e.to_string()))
}

impl TagCodec for Mp4Codec {
    fn name(&self) -> &'static str {
        "mp4"
    }

    fn read_identity(&self, path: &Path) -> Result<TagIdentity> {
        let tag = read_tag(path)?;
        Ok(TagIdentity {
            artist: tag.artist().unwrap_or_default().to_string(),
            title: tag.title().unwrap_or_default().to_string(),
        })
    }

    fn has_embedded_lyrics(&self, path: &Path) -> Result<bool> {
        let tag = read_tag(path)?;
        Ok(tag.lyrics().is_some_and(|lyrics| !lyrics.trim().is_empty()))
    }

    fn write_lyrics(&self, path: &Path, text: &str) -> Result<()> {
        let mut tag = read_tag(path).map_err(|e| LyricsFinderError::tag_write(path, e))?;
        // ©lyr is single-valued: setting replaces the previous atom
        tag.set_lyrics(text);
        tag.write_to_path(path)
            .map_err(|e| LyricsFinderError::tag_write(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::minimal_m4a;

    #[test]
    fn writing_twice_leaves_one_lyrics_atom() {
        let dir = tempfile::tempdir().unwrap();
        let path = minimal_m4a(dir.path(), "song.m4a");

        Mp4Codec.write_lyrics(&path, "first").unwrap();
        Mp4Codec.write_lyrics(&path, "Line one\nLine two").unwrap();

        let tag = mp4ameta::Tag::read_from_path(&path).unwrap();
        let lyrics: Vec<&str> = tag.strings_of(&mp4ameta::ident::LYRICS).collect();
        assert_eq!(lyrics, vec!["Line one\nLine two"]);
    }

    #[test]
    fn lyrics_presence_follows_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = minimal_m4a(dir.path(), "song.m4a");

        assert!(!Mp4Codec.has_embedded_lyrics(&path).unwrap());
        Mp4Codec.write_lyrics(&path, "Is this the real life?").unwrap();
        assert!(Mp4Codec.has_embedded_lyrics(&path).unwrap());
    }

    #[test]
    fn write_keeps_identity_atoms() {
        let dir = tempfile::tempdir().unwrap();
        let path = minimal_m4a(dir.path(), "tagged.m4a");

        let mut tag = mp4ameta::Tag::read_from_path(&path).unwrap();
        tag.set_artist("Queen");
        tag.set_title("Bohemian Rhapsody");
        tag.write_to_path(&path).unwrap();

        Mp4Codec.write_lyrics(&path, "Is this the real life?").unwrap();

        let identity = Mp4Codec.read_identity(&path).unwrap();
        assert_eq!(identity.artist, "Queen");
        assert_eq!(identity.title, "Bohemian Rhapsody");
    }
}
