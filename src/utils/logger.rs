use crate::errors::{LyricsFinderError, Result};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// Logger utility for the application
pub struct Logger;

impl Logger {
    /// Initialize the logger with specified level
    pub fn init_with_level(level: Level) -> Result<()> {
        Self::init_with_filter(&level.to_string())
    }

    /// Initialize the logger with custom filter; `RUST_LOG` takes precedence
    pub fn init_with_filter(filter: &str) -> Result<()> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter));

        fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| LyricsFinderError::Unknown(format!("Failed to install logger: {}", e)))
    }

    /// Log batch start
    pub fn log_batch_start(root: &str, total: usize) {
        info!("Starting batch: {} ({} files)", root, total);
    }

    /// Log track lookup start
    pub fn log_track_start(artist: &str, title: &str, path: &str) {
        info!("Resolving lyrics: {} - {} ({})", artist, title, path);
    }

    /// Log a strategy that came back empty
    pub fn log_provider_miss(provider: &str, reason: &str) {
        debug!("[{}] no result: {}", provider, reason);
    }

    /// Log a successful resolution
    pub fn log_track_resolved(artist: &str, title: &str, source: &str) {
        info!("Lyrics found: {} - {} via {}", artist, title, source);
    }

    /// Log an exhausted provider chain
    pub fn log_track_exhausted(artist: &str, title: &str) {
        warn!("No lyrics found: {} - {}", artist, title);
    }

    /// Log network request
    pub fn log_network_operation(operation: &str, url: &str) {
        debug!("Network operation: {} -> {}", operation, url);
    }

    /// Log file operation error
    pub fn log_file_operation_error(operation: &str, path: &str, error: &str) {
        error!("File operation error: {} -> {} - Error: {}", operation, path, error);
    }
}
