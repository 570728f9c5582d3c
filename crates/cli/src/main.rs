// ABOUTME: CLI that fetches a podcast feed and writes a canonical episodes JSON file.
// ABOUTME: Runs fetch -> parse -> normalize/sort -> write as one linear pipeline.

mod fetch;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use episodes_feed::{build_payload, parse_feed_bytes, write_payload, BuildOptions};
use tracing_subscriber::EnvFilter;

use crate::fetch::{fetch_feed_bytes, FetchOptions};

/// Fetch a podcast RSS/Atom feed and generate an episodes JSON file.
#[derive(Parser, Debug)]
#[command(name = "fetch-episodes")]
#[command(about = "Fetch podcast RSS and generate episodes JSON", long_about = None)]
struct Args {
    /// Podcast RSS feed URL
    #[arg(long = "rss-url")]
    rss_url: String,

    /// Output JSON path
    #[arg(long, default_value = "resources/episodes.json")]
    out: PathBuf,

    /// Optional max number of feed entries to consider
    #[arg(long)]
    limit: Option<usize>,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

/// Everything one run needs, resolved from the command line.
#[derive(Debug, Clone)]
struct RunConfig {
    rss_url: String,
    out: PathBuf,
    build: BuildOptions,
    fetch: FetchOptions,
}

impl From<Args> for RunConfig {
    fn from(args: Args) -> Self {
        Self {
            rss_url: args.rss_url,
            out: args.out,
            build: BuildOptions { limit: args.limit },
            fetch: FetchOptions {
                timeout: Duration::from_secs(args.timeout),
                ..FetchOptions::default()
            },
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = RunConfig::from(Args::parse());
    let count = run(&config)?;

    println!("Wrote {} episodes to {}", count, config.out.display());
    Ok(())
}

/// Runs the pipeline and returns the number of episodes written.
fn run(config: &RunConfig) -> Result<usize> {
    let bytes = fetch_feed_bytes(&config.rss_url, &config.fetch)?;

    let feed = parse_feed_bytes(&bytes)
        .with_context(|| format!("parsing feed from {}", config.rss_url))?;

    let payload = build_payload(&feed, &config.rss_url, Utc::now(), &config.build);

    write_payload(&config.out, &payload)
        .with_context(|| format!("writing {}", config.out.display()))?;

    Ok(payload.episodes.len())
}
