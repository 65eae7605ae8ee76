use crate::types::{FetchOutcome, NewsError, RawEntry, Result};
use async_trait::async_trait;
use feed_rs::parser;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Retrieves and parses a single feed URL under a time budget.
#[async_trait]
pub trait FetchFeed: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchOutcome;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("netnews/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }

    async fn fetch_inner(&self, url: &str) -> Result<Vec<RawEntry>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let content = response.text().await?;
        entries_from_response(status, &content)
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FetchFeed for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchOutcome {
        debug!("Fetching feed: {}", url);

        // The budget covers the whole fetch and parse, not just connection
        // setup.
        match tokio::time::timeout(timeout, self.fetch_inner(url)).await {
            Ok(Ok(entries)) => {
                info!("Fetched {} entries from {}", entries.len(), url);
                FetchOutcome::Fetched(entries)
            }
            Ok(Err(e)) => FetchOutcome::Failed(e.to_string()),
            Err(_) => FetchOutcome::TimedOut,
        }
    }
}

/// Turn one HTTP response into entries. Some feed servers return partial
/// content with a non-success status; whatever parses is still usable, so
/// the status only warns.
pub fn entries_from_response(
    status: reqwest::StatusCode,
    content: &str,
) -> Result<Vec<RawEntry>> {
    if !status.is_success() {
        warn!("Feed returned non-success status: {}", status);
    }
    parse_entries(content)
}

/// Parse RSS/Atom content into raw entries, preserving feed order. Fields
/// stay optional here; validation is the processor's job.
pub fn parse_entries(content: &str) -> Result<Vec<RawEntry>> {
    let feed = parser::parse(content.as_bytes())
        .map_err(|e| NewsError::Parse(format!("failed to parse feed: {e}")))?;

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| RawEntry {
            link: entry.links.first().map(|l| l.href.clone()),
            title: entry.title.map(|t| t.content),
            description: entry.summary.map(|s| s.content),
        })
        .collect();

    Ok(entries)
}
