//! Corpus-Crawler main entry point
//!
//! This is the command-line interface for the Corpus-Crawler link crawler
//! and text scraper.

use anyhow::Context;
use clap::{Parser, Subcommand};
use corpus_crawler::api::{self, AppState};
use corpus_crawler::config::{load_config_with_hash, Config};
use corpus_crawler::crawler::{build_engine, CrawlRequest, ProcessDetail};
use corpus_crawler::output::{print_statistics, realtime_stats};
use corpus_crawler::storage::SqliteStorage;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Corpus-Crawler: a link-frontier crawler and text scraper
///
/// Corpus-Crawler discovers links from a seed page into a persistent
/// frontier, queues content-looking pages, and scrapes their readable text
/// into a local corpus.
#[derive(Parser, Debug)]
#[command(name = "corpus-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A link-frontier crawler and text scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the frontier, seeding it first if it is empty
    Crawl {
        /// Seed URL, used only when the frontier is empty
        #[arg(long)]
        url: Option<String>,

        /// Number of crawl steps (defaults to crawl.default-depth)
        #[arg(long)]
        depth: Option<u32>,
    },

    /// Scrape every pending content link
    Process,

    /// Show statistics from the database and exit
    Stats,

    /// Serve the HTTP API
    Serve {
        /// Address to bind (defaults to server.bind-address)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_ref())?;

    match cli.command {
        Command::Crawl { url, depth } => handle_crawl(&config, url, depth).await,
        Command::Process => handle_process(&config).await,
        Command::Stats => handle_stats(&config),
        Command::Serve { bind } => handle_serve(&config, bind).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("corpus_crawler=info,warn"),
            1 => EnvFilter::new("corpus_crawler=debug,info"),
            2 => EnvFilter::new("corpus_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn load_configuration(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Handles the crawl command: one depth-bounded crawl invocation
async fn handle_crawl(
    config: &Config,
    url: Option<String>,
    depth: Option<u32>,
) -> anyhow::Result<()> {
    let mut engine = build_engine(config).context("failed to initialize crawler")?;

    let request = CrawlRequest {
        url,
        depth: depth.unwrap_or(config.crawl.default_depth),
    };

    let outcome = engine
        .recursive_crawl(request)
        .await
        .context("crawl failed")?;

    println!("{}\n", outcome.message());
    for step in &outcome.steps {
        match &step.error {
            Some(error) => println!("  ✗ [depth {}] {}: {}", step.depth, step.url, error),
            None => println!(
                "  ✓ [depth {}] {}: {} links, {} new, {} queued",
                step.depth,
                step.url,
                step.links_found,
                step.links_added_to_crawl,
                step.links_added_to_process
            ),
        }
    }

    let stats = outcome.stats;
    println!();
    println!("Links to crawl: {}", stats.links_to_crawl);
    println!("Links crawled: {}", stats.links_crawled);
    println!("Links to scrape: {}", stats.links_to_scrape);
    println!("Links scraped: {}", stats.links_scraped);

    Ok(())
}

/// Handles the process command: scrapes every pending content link
async fn handle_process(config: &Config) -> anyhow::Result<()> {
    let mut engine = build_engine(config).context("failed to initialize crawler")?;

    let result = engine
        .process_all_links()
        .await
        .context("processing failed")?;

    println!("{}\n", result.message());
    for detail in &result.details {
        match detail {
            ProcessDetail::Success {
                link,
                content_length,
                title,
                ..
            } => println!("  ✓ {} ({} chars): {}", link, content_length, title),
            ProcessDetail::Failure { link, error } => println!("  ✗ {}: {}", link, error),
        }
    }

    Ok(())
}

/// Handles the stats command: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.storage.database_path);

    // Open the database
    let storage = SqliteStorage::new(Path::new(&config.storage.database_path))
        .context("failed to open database")?;

    let stats = realtime_stats(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the serve command: runs the HTTP API until interrupted
async fn handle_serve(config: &Config, bind: Option<SocketAddr>) -> anyhow::Result<()> {
    let bind_address = match bind {
        Some(address) => address,
        None => config
            .server
            .bind_address
            .parse()
            .with_context(|| format!("invalid bind address {}", config.server.bind_address))?,
    };

    let engine = build_engine(config).context("failed to initialize crawler")?;
    let stats_reader = SqliteStorage::new(Path::new(&config.storage.database_path))
        .context("failed to open database for stats")?;
    let state = AppState::new(engine, stats_reader, config.crawl.default_depth);

    api::serve(state, bind_address).await?;
    Ok(())
}
