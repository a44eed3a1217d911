use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::errors::{LyricsFinderError, Result};

/// Environment variable consulted for the Genius API credential
pub const GENIUS_TOKEN_ENV: &str = "GENIUS_API_KEY";

/// What a batch run produces for every resolved track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPolicy {
    /// Write a sibling `.lrc` file
    pub write_lrc: bool,
    /// Embed the lyrics into the audio container
    pub embed_in_file: bool,
    /// Skip files that already carry embedded lyrics (only when embedding)
    pub skip_if_embedded: bool,
    /// Skip files whose `.lrc` already exists (only when not embedding)
    pub skip_if_lrc_exists: bool,
}

impl Default for OutputPolicy {
    fn default() -> Self {
        Self {
            write_lrc: true,
            embed_in_file: false,
            skip_if_embedded: true,
            skip_if_lrc_exists: true,
        }
    }
}

/// HTTP timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub get_timeout_secs: u64,
    pub head_timeout_secs: u64,
    /// Lower bound of the random pause before each search-engine request
    pub search_delay_min_ms: u64,
    /// Upper bound of the random pause before each search-engine request
    pub search_delay_max_ms: u64,
    /// Pause between two tracks of a batch
    pub track_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            get_timeout_secs: 15,
            head_timeout_secs: 10,
            search_delay_min_ms: 1500,
            search_delay_max_ms: 3000,
            track_delay_ms: 1000,
        }
    }
}

impl HttpConfig {
    pub fn get_timeout(&self) -> Duration {
        Duration::from_secs(self.get_timeout_secs)
    }

    pub fn head_timeout(&self) -> Duration {
        Duration::from_secs(self.head_timeout_secs)
    }

    pub fn track_delay(&self) -> Duration {
        Duration::from_millis(self.track_delay_ms)
    }

    /// Pacing window as an ordered pair of durations
    pub fn search_delay_window(&self) -> (Duration, Duration) {
        let min = self.search_delay_min_ms.min(self.search_delay_max_ms);
        let max = self.search_delay_min_ms.max(self.search_delay_max_ms);
        (Duration::from_millis(min), Duration::from_millis(max))
    }
}

/// How search-engine results are matched against the query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Host, structural marker and both artist and title tokens must match
    Strict,
    /// Host and structural marker only; accepts the first such link.
    /// Higher wrong-song rate, kept as a degraded fallback.
    FirstResult,
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMode::Strict => write!(f, "strict"),
            MatchMode::FirstResult => write!(f, "first_result"),
        }
    }
}

/// Search-engine fallback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// HTML search endpoint; the query is appended URL-encoded
    pub endpoint: String,
    /// Number of result links inspected per search
    pub max_results: usize,
    pub match_mode: MatchMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://html.duckduckgo.com/html/?q=".to_string(),
            max_results: 5,
            match_mode: MatchMode::Strict,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub genius_access_token: Option<String>,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputPolicy,
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Get the configuration directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| LyricsFinderError::Config("Could not find config directory".to_string()))
            .map(|dir| dir.join("lyrics-finder"))
    }

    /// Get the settings file path (TOML format)
    pub fn settings_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get the JSON mirror path
    pub fn json_settings_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load configuration from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        let settings_path = Self::settings_path()?;

        if !settings_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        Self::load_from_path(&settings_path)
    }

    /// Load configuration from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LyricsFinderError::Config(format!("Failed to read settings file: {}", e)))?;

        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to the default location (TOML plus JSON mirror)
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)
            .map_err(|e| LyricsFinderError::Config(format!("Failed to create config directory: {}", e)))?;

        self.save_to_path(&Self::settings_path()?)?;

        let json_content = serde_json::to_string_pretty(self)?;
        std::fs::write(Self::json_settings_path()?, json_content)
            .map_err(|e| LyricsFinderError::Config(format!("Failed to write JSON settings file: {}", e)))?;

        Ok(())
    }

    /// Save configuration as TOML to `path`
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)
            .map_err(|e| LyricsFinderError::Config(format!("Failed to write TOML settings file: {}", e)))?;
        Ok(())
    }

    /// Resolve the API credential: explicit override, then environment, then file.
    /// Blank values count as absent.
    pub fn resolve_token(&self, cli_override: Option<&str>) -> Option<String> {
        let env_token = std::env::var(GENIUS_TOKEN_ENV).ok();
        [
            cli_override.map(str::to_string),
            env_token,
            self.genius_access_token.clone(),
        ]
        .into_iter()
        .flatten()
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_round_trip_keeps_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.output.embed_in_file = true;
        config.search.match_mode = MatchMode::FirstResult;
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert!(loaded.output.embed_in_file);
        assert_eq!(loaded.search.match_mode, MatchMode::FirstResult);
        assert_eq!(loaded.http.get_timeout_secs, 15);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "genius_access_token = \"abc\"\n").unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.genius_access_token.as_deref(), Some("abc"));
        assert_eq!(loaded.http.head_timeout_secs, 10);
        assert_eq!(loaded.search.max_results, 5);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[http]\ntrack_delay_ms = 0\n\n[output]\nembed_in_file = true\n\n[search]\nmatch_mode = \"first_result\"\n",
        )
        .unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.http.track_delay_ms, 0);
        assert_eq!(loaded.http.get_timeout_secs, 15);
        assert!(loaded.output.embed_in_file);
        assert!(loaded.output.write_lrc);
        assert_eq!(loaded.search.match_mode, MatchMode::FirstResult);
        assert_eq!(loaded.search.max_results, 5);
    }

    #[test]
    fn malformed_file_is_a_toml_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[http\ntrack_delay_ms = ").unwrap();

        assert!(matches!(
            Config::load_from_path(&path),
            Err(LyricsFinderError::Toml(_))
        ));
    }

    #[test]
    fn cli_override_wins_and_blank_is_ignored() {
        let config = Config {
            genius_access_token: Some("from-file".to_string()),
            ..Config::default()
        };
        assert_eq!(config.resolve_token(Some("cli")).as_deref(), Some("cli"));

        let blank = Config {
            genius_access_token: Some("   ".to_string()),
            ..Config::default()
        };
        // Whatever the environment holds, a blank value is never returned
        assert!(blank
            .resolve_token(Some("  "))
            .map_or(true, |token| !token.is_empty()));
    }

    #[test]
    fn delay_window_is_ordered() {
        let http = HttpConfig {
            search_delay_min_ms: 3000,
            search_delay_max_ms: 1000,
            ..HttpConfig::default()
        };
        let (min, max) = http.search_delay_window();
        assert!(min <= max);
    }
}
