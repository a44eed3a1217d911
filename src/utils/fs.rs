use crate::errors::{LyricsFinderError, Result};
use crate::tags::AudioFormat;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name prefix of AppleDouble metadata files ("._song.mp3")
const METADATA_FILE_PREFIX: &str = "._";

/// File system utilities
pub struct FileUtils;

impl FileUtils {
    /// Recursively list supported audio files under `root`, in a stable order
    pub fn discover_audio_files(root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(LyricsFinderError::FolderNotFound(root.to_path_buf()));
        }

        let files = WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| Self::is_eligible(path))
            .collect();

        Ok(files)
    }

    /// Supported extension and not a platform metadata sidecar
    pub fn is_eligible(path: &Path) -> bool {
        let is_sidecar = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with(METADATA_FILE_PREFIX));

        !is_sidecar && AudioFormat::from_path(path).is_some()
    }

    /// Sibling subtitle path: same directory and stem, `.lrc` extension
    pub fn lrc_path_for(audio_path: &Path) -> PathBuf {
        audio_path.with_extension("lrc")
    }

    /// File stem as UTF-8, lossy
    pub fn file_stem(path: &Path) -> String {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Write UTF-8 text, replacing any existing file
    pub fn write_string_to_file(path: &Path, content: &str) -> Result<()> {
        std::fs::write(path, content).map_err(LyricsFinderError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"").unwrap();
    }

    #[test]
    fn discovers_supported_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b - two.flac"));
        touch(&dir.path().join("a - one.mp3"));
        touch(&dir.path().join("nested/c - three.M4A"));
        touch(&dir.path().join("nested/cover.jpg"));
        touch(&dir.path().join("._a - one.mp3"));
        touch(&dir.path().join("notes.lrc"));

        let files = FileUtils::discover_audio_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a - one.mp3", "b - two.flac", "c - three.M4A"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_are_still_eligible() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let name = OsStr::from_bytes(b"Artist - Caf\xe9.mp3");
        touch(&dir.path().join(name));
        touch(&dir.path().join(OsStr::from_bytes(b"._Caf\xe9.mp3")));

        assert!(FileUtils::is_eligible(&dir.path().join(name)));
        let files = FileUtils::discover_audio_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join(name)]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            FileUtils::discover_audio_files(&missing),
            Err(LyricsFinderError::FolderNotFound(_))
        ));
    }

    #[test]
    fn lrc_path_replaces_extension() {
        let path = Path::new("/music/Artist - Title.mp3");
        assert_eq!(
            FileUtils::lrc_path_for(path),
            PathBuf::from("/music/Artist - Title.lrc")
        );
    }
}
