use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use newswire::config::Settings;
use newswire::plan::{plan, Overrides};
use newswire::{collect, feed, output};

#[derive(Parser, Debug)]
#[command(
    name = "newswire",
    about = "Google News RSS fetcher with optional article detail enrichment"
)]
struct Args {
    /// Path to settings.json
    #[arg(long, value_name = "FILE", default_value = "config/settings.json")]
    config: PathBuf,

    /// Search query (supports operators like intitle:, site:, after:, before:)
    #[arg(long)]
    query: Option<String>,

    /// Predefined topic name (e.g. technology, business)
    #[arg(long)]
    topic: Option<String>,

    /// Full hashed topic id from a Google News URL
    #[arg(long)]
    hashed_topic: Option<String>,

    /// Language code, e.g. en
    #[arg(long)]
    language: Option<String>,

    /// Region code, e.g. US
    #[arg(long)]
    region: Option<String>,

    /// First day to search, YYYY-MM-DD (inclusive)
    #[arg(long, value_name = "YYYY-MM-DD")]
    date_from: Option<String>,

    /// Last day to search, YYYY-MM-DD (inclusive)
    #[arg(long, value_name = "YYYY-MM-DD")]
    date_to: Option<String>,

    /// Maximum number of items to return across all feeds
    #[arg(long)]
    max_items: Option<usize>,

    /// Disable article detail enrichment
    #[arg(long)]
    no_details: bool,

    /// Override the HTTP User-Agent
    #[arg(long)]
    user_agent: Option<String>,

    /// File with one search query per line
    #[arg(long, value_name = "FILE")]
    inputs: Option<PathBuf>,

    /// Output file (JSON). Prints to stdout when omitted.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            query: self.query.clone(),
            topic: self.topic.clone(),
            hashed_topic: self.hashed_topic.clone(),
            language: self.language.clone(),
            region: self.region.clone(),
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
            max_items: self.max_items,
            fetch_details: self.no_details.then_some(false),
            user_agent: self.user_agent.clone(),
            inputs: self.inputs.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout is reserved for the JSON document
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let settings = Settings::load(&args.config)
        .with_context(|| format!("Failed to load settings from {}", args.config.display()))?;

    let tasks = plan(&settings, &args.overrides()).context("Failed to plan fetch tasks")?;
    tracing::info!(tasks = tasks.len(), "Planned fetch tasks");

    let client = feed::build_client().context("Failed to build HTTP client")?;
    let records = collect::run(&client, &tasks).await;
    tracing::info!(records = records.len(), "Collection finished");

    output::write_output(&records, args.output.as_deref())?;
    Ok(())
}
