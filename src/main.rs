use clap::Parser;
use netnews::config::{
    env_tunables, filter_feed_tasks, load_feed_tasks, resolve_pipeline_config, TunableOverrides,
};
use netnews::fetcher::HttpFetcher;
use netnews::pipeline::NewsPipeline;
use netnews::store::NewsStore;
use netnews::summarizer::{OpenAiChat, Summarizer};
use netnews::types::NewsError;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "netnews", about = "NetNews - RSS feed summarizer using AI")]
struct Cli {
    /// Path to the RSS feeds configuration file
    #[arg(long, default_value = "RSSFeeds.toml")]
    config: PathBuf,

    /// Path to the SQLite database file
    #[arg(long, default_value = "netnews.db")]
    db: PathBuf,

    /// Path to a .env file with credentials
    #[arg(long)]
    env: Option<PathBuf>,

    /// Timeout for RSS feed requests in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Number of days to keep entries
    #[arg(long)]
    retention: Option<u32>,

    /// Model to use for summarization
    #[arg(long)]
    model: Option<String>,

    /// Maximum number of summarization call retries
    #[arg(long)]
    max_retries: Option<u32>,

    /// Specific feeds to process, by name
    #[arg(long, num_args = 1..)]
    feeds: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    match &args.env {
        Some(path) => {
            dotenvy::from_path(path).ok();
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting NetNews feed processor");

    // No useful work is possible without the credential, so fail before any
    // feed processing begins.
    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| NewsError::MissingCredential("OPENAI_API_KEY".to_string()))?;

    let flags = TunableOverrides {
        timeout_secs: args.timeout,
        retention_days: args.retention,
        model: args.model,
        max_retries: args.max_retries,
    };
    let config = resolve_pipeline_config(flags, env_tunables());

    info!("Reading configuration from {}", args.config.display());
    let tasks = load_feed_tasks(&args.config)?;
    let tasks = filter_feed_tasks(tasks, &args.feeds);
    info!("Processing {} configured feeds", tasks.len());

    let store = NewsStore::open(&args.db).await?;

    let chat = OpenAiChat::new(api_key, config.model.clone());
    let summarizer = Summarizer::from_config(Box::new(chat), &config);
    let pipeline = NewsPipeline::new(
        store,
        Box::new(summarizer),
        Box::new(HttpFetcher::new()),
        config,
    );

    let totals = pipeline.run(&tasks).await?;
    info!(
        "NetNews run finished: processed={}, added={}, skipped={}, failed={}",
        totals.processed, totals.added, totals.skipped, totals.failed
    );

    Ok(())
}
