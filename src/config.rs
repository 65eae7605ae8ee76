use crate::types::{FeedTask, NewsError, PipelineConfig, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use url::Url;

#[derive(Debug, Deserialize)]
struct FeedsFile {
    #[serde(rename = "feed", default)]
    feeds: Vec<FeedEntryConfig>,
}

#[derive(Debug, Deserialize)]
struct FeedEntryConfig {
    name: String,
    url: String,
    #[serde(default = "default_story_limit")]
    story_limit: usize,
}

fn default_story_limit() -> usize {
    5
}

/// Load the feed list from a TOML file:
///
/// ```toml
/// [[feed]]
/// name = "tech"
/// url = "https://example.com/feed.xml"
/// story_limit = 5
/// ```
pub fn load_feed_tasks(path: &Path) -> Result<Vec<FeedTask>> {
    let raw = std::fs::read_to_string(path)?;
    parse_feed_tasks(&raw)
}

pub fn parse_feed_tasks(raw: &str) -> Result<Vec<FeedTask>> {
    let file: FeedsFile =
        toml::from_str(raw).map_err(|e| NewsError::Config(format!("invalid feeds file: {e}")))?;

    if file.feeds.is_empty() {
        return Err(NewsError::Config("no feeds configured".to_string()));
    }

    let mut tasks = Vec::with_capacity(file.feeds.len());
    for feed in file.feeds {
        if feed.name.trim().is_empty() {
            return Err(NewsError::Config(format!(
                "feed with url {} has an empty name",
                feed.url
            )));
        }
        Url::parse(&feed.url)?;
        tasks.push(FeedTask {
            name: feed.name,
            url: feed.url,
            story_limit: feed.story_limit,
        });
    }

    Ok(tasks)
}

/// Keep only the named feeds, preserving configured order. Names match
/// case-insensitively; an empty filter keeps everything.
pub fn filter_feed_tasks(tasks: Vec<FeedTask>, names: &[String]) -> Vec<FeedTask> {
    if names.is_empty() {
        return tasks;
    }
    tasks
        .into_iter()
        .filter(|task| names.iter().any(|name| name.eq_ignore_ascii_case(&task.name)))
        .collect()
}

/// Tunable overrides from one source (CLI flags or environment), applied on
/// top of compiled defaults.
#[derive(Debug, Default)]
pub struct TunableOverrides {
    pub timeout_secs: Option<u64>,
    pub retention_days: Option<u32>,
    pub model: Option<String>,
    pub max_retries: Option<u32>,
}

/// Read tunable overrides from the process environment.
pub fn env_tunables() -> TunableOverrides {
    env_tunables_from(|key| std::env::var(key).ok())
}

/// Same, but against an arbitrary lookup so resolution is testable without
/// touching process-global state. Unparseable numeric values are ignored.
pub fn env_tunables_from(lookup: impl Fn(&str) -> Option<String>) -> TunableOverrides {
    TunableOverrides {
        timeout_secs: lookup("FEED_TIMEOUT").and_then(|v| v.parse().ok()),
        retention_days: lookup("RETENTION_DAYS").and_then(|v| v.parse().ok()),
        model: lookup("AI_MODEL"),
        max_retries: lookup("MAX_RETRIES").and_then(|v| v.parse().ok()),
    }
}

/// Merge tunables into a pipeline configuration: a flag wins over its
/// environment variable, which wins over the compiled default.
pub fn resolve_pipeline_config(flags: TunableOverrides, env: TunableOverrides) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    if let Some(secs) = flags.timeout_secs.or(env.timeout_secs) {
        config.feed_timeout = Duration::from_secs(secs);
    }
    if let Some(days) = flags.retention_days.or(env.retention_days) {
        config.retention_days = days;
    }
    if let Some(model) = flags.model.or(env.model) {
        config.model = model;
    }
    if let Some(retries) = flags.max_retries.or(env.max_retries) {
        config.max_retries = retries;
    }
    config
}
