mod cli;

use cli::Cli;
use lyrics_finder::config::Config;
use lyrics_finder::errors::Result;
use lyrics_finder::utils::Logger;
use tracing::Level;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    Logger::init_with_level(if cli.verbose { Level::DEBUG } else { Level::INFO })?;

    let config = Config::load()?;

    cli.execute(config).await
}
