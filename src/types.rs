use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One summarized story as stored in the `news` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryRecord {
    pub id: i64,
    pub feed: String,
    /// The dedup key: at most one stored record per distinct title.
    pub title: String,
    pub link: String,
    pub summary: String,
    pub created_date: NaiveDate,
}

/// A story about to be persisted. `created_date` is assigned by the store
/// at insert time.
#[derive(Debug, Clone)]
pub struct NewStory {
    pub feed: String,
    pub title: String,
    pub link: String,
    pub summary: String,
}

/// A resolved processing unit: one configured feed with its per-run entry
/// budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedTask {
    pub name: String,
    pub url: String,
    /// How many entries are examined per run, not how many are added.
    pub story_limit: usize,
}

/// Per-feed outcome counters, reported via logs at feed completion.
///
/// `skipped` means summarization was never attempted (malformed entry or
/// duplicate title); `failed` means summarization or persistence was
/// attempted and did not complete. `processed == added + skipped + failed`
/// holds at feed completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub processed: usize,
    pub added: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunStats {
    pub fn merge(&mut self, other: RunStats) {
        self.processed += other.processed;
        self.added += other.added;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// One story entry as it came out of the feed, before validation.
#[derive(Debug, Clone, Default)]
pub struct RawEntry {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

/// Result of fetching and parsing one feed URL.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Entries in feed-supplied order.
    Fetched(Vec<RawEntry>),
    /// The fetch and parse did not complete within the time budget.
    TimedOut,
    /// Any other transport or parse failure.
    Failed(String),
}

/// Tunables for one pipeline run, resolved upstream of the core.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub feed_timeout: Duration,
    pub retention_days: u32,
    pub max_retries: u32,
    pub initial_retry_delay: Duration,
    pub model: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            feed_timeout: Duration::from_secs(30),
            retention_days: 30,
            max_retries: 3,
            initial_retry_delay: Duration::from_secs(2),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NewsError>;
