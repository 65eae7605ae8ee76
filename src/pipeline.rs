use crate::fetcher::FetchFeed;
use crate::processor::process_feed;
use crate::store::NewsStore;
use crate::summarizer::Summarize;
use crate::types::{FeedTask, PipelineConfig, Result, RunStats};
use tracing::{error, info};

/// Sequential pipeline driver.
///
/// Feeds are processed one at a time, in configured order. Only one logical
/// actor ever touches the store during a run, so `exists` followed by
/// `insert` for the same title is race-free without locks.
pub struct NewsPipeline {
    store: NewsStore,
    summarizer: Box<dyn Summarize>,
    fetcher: Box<dyn FetchFeed>,
    config: PipelineConfig,
}

impl NewsPipeline {
    pub fn new(
        store: NewsStore,
        summarizer: Box<dyn Summarize>,
        fetcher: Box<dyn FetchFeed>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            summarizer,
            fetcher,
            config,
        }
    }

    pub fn store(&self) -> &NewsStore {
        &self.store
    }

    /// Run one full pipeline invocation: schema setup, retention sweep,
    /// then every configured feed exactly once. A fault in one feed never
    /// prevents subsequent feeds from being attempted; only setup errors
    /// propagate.
    pub async fn run(&self, tasks: &[FeedTask]) -> Result<RunStats> {
        self.store.ensure_schema().await?;

        // Cleanup before processing, so this run's newly added records are
        // never purged by their own sweep.
        let purged = self.store.purge_older_than(self.config.retention_days).await?;
        info!(
            "Retention sweep removed {} entries older than {} days",
            purged, self.config.retention_days
        );

        let mut totals = RunStats::default();
        for task in tasks {
            match process_feed(
                task,
                &self.store,
                self.summarizer.as_ref(),
                self.fetcher.as_ref(),
                self.config.feed_timeout,
            )
            .await
            {
                Ok(stats) => totals.merge(stats),
                Err(e) => {
                    error!(
                        "Error when processing feed {} from {}: {}",
                        task.name, task.url, e
                    );
                }
            }
        }

        info!(
            "Run complete: processed={}, added={}, skipped={}, failed={}",
            totals.processed, totals.added, totals.skipped, totals.failed
        );

        Ok(totals)
    }
}
