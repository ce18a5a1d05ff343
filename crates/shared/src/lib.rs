// Public modules
pub mod claude;
pub mod config;
pub mod error;
pub mod feeds;
pub mod generator;
pub mod models;
pub mod pipeline;
pub mod prompt;
pub mod selector;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use claude::ClaudeClient;
pub use config::Config;
pub use error::{DraftError, FeedError};
pub use feeds::{collect_entries, FeedOutcome, FeedReader};
pub use generator::{DraftGenerator, GenerationRequest, TextGenerator};
pub use models::{DraftMetadata, DraftResult, FeedEntry};
pub use pipeline::{compose, run, DraftReport};
pub use selector::select_topic;
pub use writer::{build_slug, slugify, DraftWriter};
