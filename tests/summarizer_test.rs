use async_trait::async_trait;
use netnews::summarizer::{ChatApi, Summarize, Summarizer, MAX_INPUT_CHARS};
use netnews::types::{NewsError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Fails the first `failures_before_success` calls, then succeeds.
struct FlakyApi {
    failures_before_success: usize,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ChatApi for FlakyApi {
    async fn complete(&self, _text: &str) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failures_before_success {
            Err(NewsError::Parse("service unavailable".to_string()))
        } else {
            Ok("a concise abstract".to_string())
        }
    }
}

/// Records every payload it is asked to summarize.
struct RecordingApi {
    sent: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ChatApi for RecordingApi {
    async fn complete(&self, text: &str) -> Result<String> {
        self.sent.lock().unwrap().push(text.to_string());
        Ok("a concise abstract".to_string())
    }
}

fn summarizer_with(api: Box<dyn ChatApi>, max_retries: u32) -> Summarizer {
    // Zero initial delay keeps backoff out of the test clock.
    Summarizer::new(api).with_retry_policy(max_retries, Duration::ZERO)
}

#[tokio::test]
async fn exhausts_exactly_max_retries_then_returns_none() {
    let calls = Arc::new(AtomicUsize::new(0));
    let api = FlakyApi {
        failures_before_success: usize::MAX,
        calls: calls.clone(),
    };

    let summarizer = summarizer_with(Box::new(api), 3);
    let summary = summarizer.summarize("some story text").await;

    assert!(summary.is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn recovers_after_transient_failures() {
    let calls = Arc::new(AtomicUsize::new(0));
    let api = FlakyApi {
        failures_before_success: 2,
        calls: calls.clone(),
    };

    let summarizer = summarizer_with(Box::new(api), 3);
    let summary = summarizer.summarize("some story text").await;

    assert_eq!(summary.as_deref(), Some("a concise abstract"));
    assert_eq!(calls.load(Ordering::SeqCst), 3, "two failures plus the success");
}

#[tokio::test]
async fn first_attempt_success_makes_a_single_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let api = FlakyApi {
        failures_before_success: 0,
        calls: calls.clone(),
    };

    let summarizer = summarizer_with(Box::new(api), 3);
    let summary = summarizer.summarize("some story text").await;

    assert!(summary.is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn over_limit_input_is_capped_before_sending() {
    let sent = Arc::new(Mutex::new(Vec::new()));
    let api = RecordingApi { sent: sent.clone() };

    let summarizer = summarizer_with(Box::new(api), 3);
    let input = "x".repeat(MAX_INPUT_CHARS + 500);
    let summary = summarizer.summarize(&input).await;

    assert!(summary.is_some());
    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].chars().count(), MAX_INPUT_CHARS);
}

#[tokio::test]
async fn input_at_the_limit_is_sent_unmodified() {
    let sent = Arc::new(Mutex::new(Vec::new()));
    let api = RecordingApi { sent: sent.clone() };

    let summarizer = summarizer_with(Box::new(api), 3);
    let input = "y".repeat(MAX_INPUT_CHARS);
    summarizer.summarize(&input).await;

    let sent = sent.lock().unwrap();
    assert_eq!(sent[0], input);
}
