pub mod config;
pub mod fetcher;
pub mod pipeline;
pub mod processor;
pub mod store;
pub mod summarizer;
pub mod types;

pub use fetcher::{FetchFeed, HttpFetcher};
pub use pipeline::NewsPipeline;
pub use processor::process_feed;
pub use store::NewsStore;
pub use summarizer::{ChatApi, OpenAiChat, Summarize, Summarizer};
pub use types::*;
