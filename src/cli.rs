use clap::{Parser, Subcommand};
use lyrics_finder::batch::{BatchController, BatchEvent, BatchRun, BatchRunner, RunOutcome, TracingSink};
use lyrics_finder::config::{Config, GENIUS_TOKEN_ENV};
use lyrics_finder::errors::Result;
use lyrics_finder::lyrics::{generate, LookupQuery, LyricsDocument};
use lyrics_finder::providers::{LyricsResolver, Resolution, TrackResolver};
use lyrics_finder::utils::{HttpFetch, HttpSession};
use std::path::PathBuf;
use std::sync::Arc;

/// Lyrics Finder - fetch lyrics for a music folder and save them as LRC files or embedded tags
#[derive(Parser)]
#[command(name = "lyrics-finder")]
#[command(about = "Resolve lyrics from several sources and save them next to or inside audio files")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find lyrics for every audio file under a folder
    Scan {
        /// Music folder (searched recursively)
        folder: PathBuf,

        /// Do not write .lrc files
        #[arg(long)]
        no_lrc: bool,

        /// Embed lyrics into the audio files' tags
        #[arg(long)]
        embed: bool,

        /// Re-fetch lyrics even when a file already has embedded lyrics
        #[arg(long)]
        no_skip_embedded: bool,

        /// Replace existing .lrc files
        #[arg(long)]
        overwrite_lrc: bool,

        /// Genius API access token (overrides environment and config)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Look up lyrics for a single song and print them
    Lookup {
        /// Artist name
        #[arg(short, long, default_value = "")]
        artist: String,

        /// Song title
        #[arg(short, long)]
        title: String,

        /// Print as LRC instead of plain text
        #[arg(long)]
        lrc: bool,

        /// Genius API access token (overrides environment and config)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Configure application settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Store the Genius API access token
    SetToken {
        /// Access token
        token: String,
    },

    /// Remove the stored Genius API access token
    ClearToken,

    /// Reset to default settings
    Reset,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse() -> Self {
        <Cli as clap::Parser>::parse()
    }

    /// Execute the CLI command
    pub async fn execute(self, config: Config) -> Result<()> {
        match self.command {
            Commands::Scan {
                folder,
                no_lrc,
                embed,
                no_skip_embedded,
                overwrite_lrc,
                api_key,
            } => {
                let mut policy = config.output;
                policy.write_lrc &= !no_lrc;
                policy.embed_in_file |= embed;
                policy.skip_if_embedded &= !no_skip_embedded;
                policy.skip_if_lrc_exists &= !overwrite_lrc;

                let run = BatchRun {
                    root_folder: folder,
                    output_policy: policy,
                };
                handle_scan(&config, run, api_key.as_deref()).await
            }
            Commands::Lookup {
                artist,
                title,
                lrc,
                api_key,
            } => handle_lookup(&config, &artist, &title, lrc, api_key.as_deref()).await,
            Commands::Config { command } => handle_config(config, command),
        }
    }
}

fn build_resolver(config: &Config, api_key: Option<&str>) -> Result<LyricsResolver> {
    let token = config.resolve_token(api_key);
    if token.is_none() {
        tracing::info!("No Genius API token set; the API source is disabled");
    }

    let session: Arc<dyn HttpFetch> = Arc::new(HttpSession::new(&config.http)?);
    Ok(LyricsResolver::with_session(session, token, &config.search))
}

async fn handle_scan(config: &Config, run: BatchRun, api_key: Option<&str>) -> Result<()> {
    println!("Scanning: {}", run.root_folder.display());
    println!("Write LRC files: {}", run.output_policy.write_lrc);
    println!("Embed lyrics: {}", run.output_policy.embed_in_file);

    let resolver = build_resolver(config, api_key)?;
    let controller = Arc::new(BatchController::new(Arc::new(resolver), config.http.track_delay()));

    let runner = BatchRunner::new();
    let mut handle = runner.start(controller, run)?;

    let cancel = handle.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Stop requested, finishing the current track...");
            cancel.cancel();
        }
    });

    while let Some(event) = handle.next_event().await {
        if let BatchEvent::Status(message) = event {
            println!("{}", message);
        }
    }

    match handle.wait().await? {
        RunOutcome::Completed(summary) => println!("Completed: {}", summary),
        RunOutcome::Stopped(summary) => println!("Stopped by user: {}", summary),
    }

    Ok(())
}

async fn handle_lookup(config: &Config, artist: &str, title: &str, lrc: bool, api_key: Option<&str>) -> Result<()> {
    let query = LookupQuery::new(artist, title);
    if query.title().is_empty() {
        eprintln!("Nothing to look up: the title is empty after cleanup");
        return Ok(());
    }

    let resolver = build_resolver(config, api_key)?;
    match resolver.resolve(&query, &TracingSink).await {
        Resolution::Found(result) => {
            let document = LyricsDocument::from_raw(&result.raw_lyrics);
            eprintln!("Found lyrics for {} via {} ({})", query, result.host_label, result.source);
            if lrc {
                println!("{}", generate(&document).render());
            } else {
                println!("{}", document.plain_text());
            }
        }
        Resolution::Exhausted => eprintln!("No lyrics found for {}", query),
    }

    Ok(())
}

fn handle_config(mut config: Config, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            println!("Current configuration ({}):", Config::settings_path()?.display());
            let token_state = if config.genius_access_token.is_some() {
                "Set"
            } else if std::env::var(GENIUS_TOKEN_ENV).is_ok() {
                "From environment"
            } else {
                "Not set"
            };
            println!("  Genius API token: {}", token_state);
            println!("  Write LRC files: {}", config.output.write_lrc);
            println!("  Embed lyrics: {}", config.output.embed_in_file);
            println!("  Skip files with embedded lyrics: {}", config.output.skip_if_embedded);
            println!("  Skip files with existing LRC: {}", config.output.skip_if_lrc_exists);
            println!(
                "  Search pacing: {}-{} ms",
                config.http.search_delay_min_ms, config.http.search_delay_max_ms
            );
            println!("  Delay between tracks: {} ms", config.http.track_delay_ms);
            println!("  Search endpoint: {}", config.search.endpoint);
            println!("  Search match mode: {}", config.search.match_mode);
        }
        ConfigCommands::SetToken { token } => {
            config.genius_access_token = Some(token);
            config.save()?;
            println!("Genius API token saved");
        }
        ConfigCommands::ClearToken => {
            config.genius_access_token = None;
            config.save()?;
            println!("Genius API token removed");
        }
        ConfigCommands::Reset => {
            Config::default().save()?;
            println!("Configuration reset to defaults");
        }
    }

    Ok(())
}
