use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod feed;

use config::Config;
use note_render::{ContentPipeline, Post, ProfileStore};

#[derive(Parser)]
#[command(name = "notefeed")]
#[command(about = "Render a nostr note feed to HTML")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "notefeed.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Render top-level posts with their reply counts
    Render {
        /// Feed file (JSON array or one event per line); stdin if omitted
        feed: Option<PathBuf>,
        /// Print one JSON object per post instead of text
        #[arg(long)]
        json: bool,
    },
    /// Merge the feed's metadata and list known authors
    Profiles {
        /// Feed file; stdin if omitted
        feed: Option<PathBuf>,
    },
    /// Validate configuration and exit
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_from_file(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config))?;
    config.expand_paths();

    init_logging(&config.logging.level)?;

    config
        .validate()
        .with_context(|| "Configuration validation failed")?;

    match cli.command.unwrap_or(Commands::Render {
        feed: None,
        json: false,
    }) {
        Commands::Render { feed, json } => render(&config, feed.as_deref(), json),
        Commands::Profiles { feed } => profiles(&config, feed.as_deref()),
        Commands::Check => {
            println!("Configuration OK");
            Ok(())
        }
    }
}

fn read_feed(path: Option<&Path>) -> Result<Vec<Post>> {
    let input = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read feed: {}", path.display()))?,
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .with_context(|| "Failed to read feed from stdin")?;
            input
        }
    };
    feed::parse_feed(&input)
}

/// Profile store for this run, seeded from the snapshot if one is configured.
fn load_profiles(config: &Config, posts: &[Post]) -> Result<ProfileStore> {
    let store = match config.cache_path() {
        Some(path) => ProfileStore::load(&path)
            .with_context(|| format!("Failed to load profiles from {}", path.display()))?,
        None => ProfileStore::new(),
    };

    let report = store.merge_metadata(posts);
    tracing::info!(
        "Merged metadata: {} applied, {} stale, {} failed",
        report.applied,
        report.stale,
        report.failures.len()
    );
    Ok(store)
}

fn save_profiles(config: &Config, store: &ProfileStore) -> Result<()> {
    if let Some(path) = config.cache_path() {
        store
            .save(&path)
            .with_context(|| format!("Failed to save profiles to {}", path.display()))?;
        tracing::info!("Saved {} profiles to {}", store.len(), path.display());
    }
    Ok(())
}

fn render(config: &Config, path: Option<&Path>, json: bool) -> Result<()> {
    let posts = read_feed(path)?;
    let store = load_profiles(config, &posts)?;
    let pipeline = ContentPipeline::new(store.clone(), &config.render);

    let threads = feed::build_threads(&posts);
    tracing::info!("Rendering {} threads from {} events", threads.len(), posts.len());

    let now = chrono::Local::now();
    for post in feed::render_feed(&pipeline, &threads, &now) {
        if json {
            println!("{}", serde_json::to_string(&post)?);
        } else {
            println!("{}\n", post.to_text());
        }
    }

    save_profiles(config, &store)
}

fn profiles(config: &Config, path: Option<&Path>) -> Result<()> {
    let posts = read_feed(path)?;
    let store = load_profiles(config, &posts)?;

    let mut authors: Vec<&str> = posts.iter().map(|post| post.pubkey.as_str()).collect();
    authors.sort_unstable();
    authors.dedup();
    for pubkey in authors {
        println!("{}  {}", pubkey, store.display_name_or_short(pubkey));
    }

    save_profiles(config, &store)
}

fn init_logging(level: &str) -> Result<()> {
    let filter = match level.to_lowercase().as_str() {
        "error" => tracing::Level::ERROR,
        "warn" => tracing::Level::WARN,
        "info" => tracing::Level::INFO,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter.to_string())),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    Ok(())
}
