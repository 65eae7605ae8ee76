use crate::types::{NewsError, PipelineConfig, Result};
use async_trait::async_trait;
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Upper bound on text sent to the summarization service, in characters.
pub const MAX_INPUT_CHARS: usize = 4000;

const SYSTEM_PROMPT: &str = "You are a highly skilled AI trained in language comprehension and \
summarization. I would like you to read the following text and summarize it into a concise \
abstract paragraph. Aim to retain the most important points, providing a coherent and readable \
summary that could help a person understand the main points of the discussion without needing \
to read the entire text. Please avoid unnecessary details or tangential points.";

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Low-level seam over the chat-completion endpoint. One call, one attempt;
/// retry policy lives in [`Summarizer`].
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn complete(&self, text: &str) -> Result<String>;
}

/// Summarization interface consumed by the feed processor. All failures are
/// absorbed below this boundary and reported as "no summary produced".
#[async_trait]
pub trait Summarize: Send + Sync {
    async fn summarize(&self, text: &str) -> Option<String>;
}

pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiChat {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[async_trait]
impl ChatApi for OpenAiChat {
    async fn complete(&self, text: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| NewsError::Parse("completion response contained no choices".to_string()))
    }
}

/// Summarizer client: caps input length, then attempts the service call up
/// to `max_retries` times with exponential backoff, converting exhaustion
/// into `None`. This is the dominant latency and failure surface of the
/// pipeline and must never crash the driver.
pub struct Summarizer {
    api: Box<dyn ChatApi>,
    max_retries: u32,
    initial_delay: Duration,
}

impl Summarizer {
    pub fn new(api: Box<dyn ChatApi>) -> Self {
        Self {
            api,
            max_retries: 3,
            initial_delay: Duration::from_secs(2),
        }
    }

    pub fn with_retry_policy(mut self, max_retries: u32, initial_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.initial_delay = initial_delay;
        self
    }

    pub fn from_config(api: Box<dyn ChatApi>, config: &PipelineConfig) -> Self {
        Self::new(api).with_retry_policy(config.max_retries, config.initial_retry_delay)
    }
}

#[async_trait]
impl Summarize for Summarizer {
    async fn summarize(&self, text: &str) -> Option<String> {
        let text = if text.chars().count() > MAX_INPUT_CHARS {
            warn!(
                "Text too long ({} chars), truncating to {} chars",
                text.chars().count(),
                MAX_INPUT_CHARS
            );
            text.chars().take(MAX_INPUT_CHARS).collect()
        } else {
            text.to_string()
        };

        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: self.initial_delay,
            initial_interval: self.initial_delay,
            randomization_factor: 0.0,
            multiplier: 2.0,
            max_interval: self.initial_delay * 32,
            max_elapsed_time: None,
            ..Default::default()
        };

        for attempt in 1..=self.max_retries {
            match self.api.complete(&text).await {
                Ok(summary) => return Some(summary),
                Err(e) => {
                    warn!(
                        "Summarization call failed (attempt {}/{}): {}",
                        attempt, self.max_retries, e
                    );
                    if attempt < self.max_retries {
                        if let Some(delay) = backoff.next_backoff() {
                            debug!("Retrying in {:?}", delay);
                            tokio::time::sleep(delay).await;
                        }
                    }
                }
            }
        }

        error!("All {} summarization attempts failed", self.max_retries);
        None
    }
}
