//! Pictag CLI - fetch images from object storage, tag them with a vision
//! service, and search the tag index.
//!
//! Each stage is an independent command; nothing is shared between runs
//! except files on disk and the search index.
//!
//! # Usage
//!
//! ```bash
//! # Download everything under a prefix into the current directory
//! pictag fetch --bucket holiday-photos --prefix images/
//!
//! # Label one stored image
//! pictag tag --bucket holiday-photos --image images/beach.jpg
//!
//! # Search tagged images
//! pictag search nature
//!
//! # View configuration
//! pictag config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// Pictag - fetch, tag and search images.
#[derive(Parser, Debug)]
#[command(name = "pictag")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "PICTAG_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Download every object under a key prefix to a local directory
    Fetch(cli::fetch::FetchArgs),

    /// Label an image stored in a bucket
    Tag(cli::tag::TagArgs),

    /// Search the image index by tag
    Search(cli::search::SearchArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match &cli.config {
        Some(path) => pictag_core::Config::load_from(path)?,
        None => match pictag_core::Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `pictag config path`."
                );
                pictag_core::Config::default()
            }
        },
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Pictag v{}", pictag_core::VERSION);

    match cli.command {
        Commands::Fetch(args) => cli::fetch::execute(args, &config).await,
        Commands::Tag(args) => cli::tag::execute(args, &config).await,
        Commands::Search(args) => cli::search::execute(args, &config).await,
        Commands::Config(args) => cli::config::execute(args, &config, cli.config.as_deref()).await,
    }
}
