use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the lyrics finder
#[derive(Error, Debug)]
pub enum LyricsFinderError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("ID3 tagging error: {0}")]
    Id3(#[from] id3::Error),

    #[error("Lofty tagging error: {0}")]
    Lofty(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("MP4 tagging error: {0}")]
    Mp4(String),

    #[error("Failed to write lyrics to {}: {reason}", path.display())]
    TagWrite { path: PathBuf, reason: String },

    #[error("Unexpected HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("A batch run is already in progress")]
    BatchAlreadyRunning,

    #[error("Folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, LyricsFinderError>;

impl LyricsFinderError {
    /// Wrap any codec failure as a write error for `path`
    pub fn tag_write(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        LyricsFinderError::TagWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
