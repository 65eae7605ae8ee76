use crate::fetcher::FetchFeed;
use crate::store::NewsStore;
use crate::summarizer::Summarize;
use crate::types::{FeedTask, FetchOutcome, NewStory, Result, RunStats};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Process a single feed: fetch it under the time budget, walk the first
/// `task.story_limit` entries, skip malformed and already-seen ones,
/// summarize the rest and persist the successes.
///
/// Fetch failures end this feed's processing for the run but contribute
/// nothing beyond a log entry. The limit bounds how many entries are
/// examined, not how many are added, so a feed with duplicates near the top
/// can yield fewer stories than the limit.
pub async fn process_feed(
    task: &FeedTask,
    store: &NewsStore,
    summarizer: &dyn Summarize,
    fetcher: &dyn FetchFeed,
    timeout: Duration,
) -> Result<RunStats> {
    info!("Starting to process feed: {}", task.name);
    let mut stats = RunStats::default();

    let entries = match fetcher.fetch(&task.url, timeout).await {
        FetchOutcome::Fetched(entries) => entries,
        FetchOutcome::TimedOut => {
            error!(
                "Timeout when fetching feed {} from {}",
                task.name, task.url
            );
            return Ok(stats);
        }
        FetchOutcome::Failed(detail) => {
            error!(
                "Error when fetching feed {} from {}: {}",
                task.name, task.url, detail
            );
            return Ok(stats);
        }
    };

    if entries.is_empty() {
        warn!("No entries found in feed: {}", task.name);
        return Ok(stats);
    }

    info!(
        "Found {} entries in feed, processing up to {}",
        entries.len(),
        task.story_limit
    );

    for (i, entry) in entries.iter().enumerate() {
        if i >= task.story_limit {
            break;
        }

        stats.processed += 1;

        let (title, description) = match (&entry.title, &entry.description) {
            (Some(title), Some(description)) => (title, description),
            _ => {
                warn!(
                    "Entry {} in {} missing title or description, skipping",
                    i, task.name
                );
                stats.skipped += 1;
                continue;
            }
        };

        if store.exists(title).await? {
            debug!("Entry already exists: {}", title);
            stats.skipped += 1;
            continue;
        }

        debug!("Generating summary for: {}", title);
        match summarizer.summarize(description).await {
            Some(summary) => {
                let story = NewStory {
                    feed: task.name.clone(),
                    title: title.clone(),
                    link: entry.link.clone().unwrap_or_default(),
                    summary,
                };
                match store.insert(&story).await {
                    Ok(()) => {
                        debug!("Added summary for: {}", title);
                        stats.added += 1;
                    }
                    Err(e) => {
                        error!("Database error when adding entry {}: {}", title, e);
                        stats.failed += 1;
                    }
                }
            }
            None => {
                warn!("Failed to generate summary for: {}", title);
                stats.failed += 1;
            }
        }
    }

    info!(
        "Feed {} stats: processed={}, added={}, skipped={}, failed={}",
        task.name, stats.processed, stats.added, stats.skipped, stats.failed
    );

    Ok(stats)
}
